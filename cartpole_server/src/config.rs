//! Simulation and controller settings, read from an optional JSON file.
//!
//! Every field has a default, so `{}` is a complete configuration.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(
        "zones must satisfy 0 < dead_zone < moderate_zone, \
         got dead_zone={dead_zone} moderate_zone={moderate_zone}"
    )]
    InvalidZones { dead_zone: f64, moderate_zone: f64 },
}

/// Angle thresholds of the zone controller, in radians.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// ~2.9 degrees
    pub dead_zone: f64,
    /// ~8.6 degrees
    pub moderate_zone: f64,
    /// Clear the action history between episodes. The history otherwise
    /// lives as long as the controller.
    pub reset_history_per_episode: bool,
}
impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            dead_zone: 0.05,
            moderate_zone: 0.15,
            reset_history_per_episode: false,
        }
    }
}
impl ControllerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // written so that NaN thresholds are rejected too
        if !(self.dead_zone > 0.0 && self.dead_zone < self.moderate_zone) {
            return Err(ConfigError::InvalidZones {
                dead_zone: self.dead_zone,
                moderate_zone: self.moderate_zone,
            });
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_steps: u64,
    pub episodes: u64,
    /// Wall-clock pacing of the physics engine; 0 runs unthrottled.
    pub tick_ms: u64,
    /// Seeds both the initial states and the controller. Entropy when unset.
    pub seed: Option<u64>,
    pub render: bool,
    pub controller: ControllerConfig,
}
impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_steps: 2000,
            episodes: 1,
            tick_ms: 0,
            seed: None,
            render: true,
            controller: ControllerConfig::default(),
        }
    }
}
impl SimulationConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(content)?;
        config.controller.validate()?;
        Ok(config)
    }
}
