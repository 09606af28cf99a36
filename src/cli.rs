//! Command-line interface for the wave simulator
//!
//! The binary is headless-only; every run is driven by a scenario config.

use clap::Parser;
use std::path::PathBuf;

/// Headless wave combat simulator
#[derive(Parser, Debug)]
#[command(name = "wavesim")]
#[command(about = "Headless wave combat simulator")]
#[command(version)]
pub struct Args {
    /// Scenario JSON config file to run
    #[arg(long, value_name = "CONFIG_FILE")]
    pub scenario: PathBuf,

    /// Output path for the combat log (overrides the config)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Random seed for deterministic reproduction (overrides the config)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum scenario duration in seconds (overrides the config)
    #[arg(long)]
    pub max_duration: Option<f32>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
