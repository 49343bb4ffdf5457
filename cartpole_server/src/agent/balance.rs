use super::{ActionHistory, Controller};
use crate::config::{ConfigError, ControllerConfig};
use crate::domain::Transition;
use cartpole_codec::{Action, State};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Angular velocity above which the dead zone stops ignoring the pole.
const SIGNIFICANT_RATE: f64 = 0.1;
/// Chance of inverting a push that repeats the last two.
const EASE_OFF_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Nearly upright; only angular velocity matters.
    Dead,
    /// Tilting; correct hard only while still falling.
    Moderate,
    /// Badly tilted; always push against the tilt.
    Critical,
}

/// Hand-tuned bang-bang controller that classifies the pole angle into
/// three zones and smooths repeated pushes with a random ease-off.
///
/// Each instance owns its random source and its action history.
#[derive(Debug, Clone)]
pub struct ZoneBalanceController<R = ChaCha8Rng> {
    dead_zone: f64,
    moderate_zone: f64,
    reset_history: bool,
    history: ActionHistory,
    rng: R,
}

impl ZoneBalanceController<ChaCha8Rng> {
    /// Seeded controller; `None` draws the seed from the OS.
    pub fn new(config: &ControllerConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        ZoneBalanceController::with_rng(config, rng)
    }
}

impl<R: Rng> ZoneBalanceController<R> {
    pub fn with_rng(config: &ControllerConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(ZoneBalanceController {
            dead_zone: config.dead_zone,
            moderate_zone: config.moderate_zone,
            reset_history: config.reset_history_per_episode,
            history: ActionHistory::default(),
            rng,
        })
    }

    pub fn dead_zone(&self) -> f64 { self.dead_zone }

    pub fn moderate_zone(&self) -> f64 { self.moderate_zone }

    pub fn history(&self) -> &ActionHistory { &self.history }

    pub fn zone(&self, theta: f64) -> Zone {
        let abs_theta = theta.abs();
        if abs_theta < self.dead_zone {
            Zone::Dead
        } else if abs_theta < self.moderate_zone {
            Zone::Moderate
        } else {
            Zone::Critical
        }
    }

    fn select(&mut self, state: &State) -> Action {
        let State { theta, theta_dot, .. } = *state;
        match self.zone(theta) {
            Zone::Dead => self.stabilizing_action(theta, theta_dot),
            Zone::Moderate => {
                // theta == 0 cannot reach here while dead_zone > 0, but it
                // would take the second arm like a negative tilt.
                if theta > 0.0 {
                    if theta_dot > 0.0 {
                        Action::Right
                    } else {
                        self.gentle_action(theta)
                    }
                } else if theta_dot < 0.0 {
                    Action::Left
                } else {
                    self.gentle_action(theta)
                }
            },
            Zone::Critical => {
                if theta > 0.0 {
                    Action::Right
                } else {
                    Action::Left
                }
            },
        }
    }

    fn stabilizing_action(&mut self, theta: f64, theta_dot: f64) -> Action {
        if theta_dot.abs() > SIGNIFICANT_RATE {
            if theta_dot > 0.0 {
                Action::Right
            } else {
                Action::Left
            }
        } else {
            self.gentle_action(theta)
        }
    }

    /// Push toward the tilt, but after two identical pushes in that
    /// direction invert it 30% of the time.
    fn gentle_action(&mut self, theta: f64) -> Action {
        let desired = if theta > 0.0 { Action::Right } else { Action::Left };
        let repeated = self.history.len() >= 2 && self.history.recent(2).all(|a| a == desired);
        if repeated && self.rng.gen::<f64>() < EASE_OFF_PROBABILITY {
            return desired.opposite();
        }
        desired
    }
}

impl<R: Rng> Controller for ZoneBalanceController<R> {
    fn act(&mut self, state: &State) -> Action {
        let action = self.select(state);
        self.history.push(action);
        action
    }

    fn update(&mut self, _transition: &Transition) {}

    fn reset(&mut self) {
        if self.reset_history {
            self.history.clear();
        }
    }
}
