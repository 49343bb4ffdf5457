#[macro_use]
extern crate slog;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use cartpole_server::agent::ZoneBalanceController;
use cartpole_server::config::SimulationConfig;
use cartpole_server::domain::CartPole;
use cartpole_server::render::{Headless, Renderer, TerminalRenderer};
use cartpole_server::{experiment, logging};

const TRACK_COLUMNS: usize = 60;

/// Balance a pole on a cart with a hand-tuned zone controller.
#[derive(Parser, Debug)]
#[command(name = "cartpole")]
struct Args {
    /// JSON configuration file; defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    episodes: Option<u64>,
    #[arg(long)]
    max_steps: Option<u64>,
    /// Seed for initial states and the controller's random ease-off.
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds per physics step; 0 runs as fast as possible.
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Do not draw the cart.
    #[arg(long)]
    headless: bool,
    /// Print episode results as JSON when done.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn simulation_config(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)?,
            None => SimulationConfig::default(),
        };
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.headless {
            config.render = false;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (drain, _guard) = logging::terminal();
    let logger = logging::root(drain);
    let config = args.simulation_config().context("loading configuration")?;

    let mut agent = ZoneBalanceController::new(&config.controller, config.seed)?;
    let tick = Duration::from_millis(config.tick_ms);
    let seed = config.seed;
    let domain_builder =
        |episode: u64| CartPole::new(seed.map(|s| s.wrapping_add(episode)), tick, &logger);
    let mut renderer: Box<dyn Renderer> = if config.render {
        Box::new(TerminalRenderer::new(std::io::stdout(), TRACK_COLUMNS))
    } else {
        Box::new(Headless)
    };

    info!(logger, "starting simulation";
        "episodes" => config.episodes,
        "max_steps" => config.max_steps,
        "dead_zone" => config.controller.dead_zone,
        "moderate_zone" => config.controller.moderate_zone);

    let results = experiment::run(
        &mut agent,
        domain_builder,
        &mut *renderer,
        config.episodes,
        config.max_steps,
        &logger,
    )
    .context("simulation failed")?;
    if config.render {
        println!();
    }

    let total_steps: u64 = results.iter().map(|r| r.steps).sum();
    info!(logger, "simulation complete";
        "episodes" => results.len(),
        "total_steps" => total_steps,
        "max_steps" => config.max_steps);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(())
}
