//! Command-line runner for the predator-prey simulation.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use predprey_core::SimulationConfig;
use predprey_world::Simulator;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "predprey", version, about = "Foxes and rabbits on a grid")]
struct Args {
    /// JSON simulation config; missing keys take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of steps to run
    #[arg(short, long)]
    steps: Option<u64>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Field rows
    #[arg(long)]
    depth: Option<usize>,

    /// Field columns
    #[arg(long)]
    width: Option<usize>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied
    fn resolve_config(&self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(steps) = self.steps {
            config.num_steps = steps;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(width) = self.width {
            config.width = width;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.json_logs)?;

    let config = args.resolve_config()?;
    info!(
        depth = config.depth,
        width = config.width,
        seed = config.seed,
        num_steps = config.num_steps,
        "Starting predator-prey simulation"
    );

    let num_steps = config.num_steps;
    let mut simulator = Simulator::new(config)?;
    let report = simulator.simulate(num_steps);

    if !report.viable {
        info!(final_step = report.final_step, "Simulation ended early: field no longer viable");
    }

    Ok(())
}
