//! Headless scenario mode
//!
//! Runs wave scenarios without any graphical output, suitable for automated
//! testing and balance analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless scenario
//! cargo run --release -- --scenario scenario_config.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "waves": [
//!     { "difficulty": 1, "enemies": ["Fighter", "Fighter"] },
//!     { "difficulty": 2, "enemies": ["Fighter"], "spawn_delay_secs": 2.0 }
//!   ],
//!   "subject_strikes": { "interval_secs": 0.5, "damage": 20 },
//!   "max_duration_secs": 120
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{
    run_headless_scenario, EnemyOutcome, ScenarioOutcome, ScenarioPlugin, ScenarioResult,
    ScenarioState,
};
