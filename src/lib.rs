//! wavesim - Headless wave combat simulation core
//!
//! The combat-entity simulation core of a bullet-pattern action game: enemy
//! health and death, wave membership, pause-aware motion, rotation steering,
//! and cooldown-gated burst fire, driven by a headless scenario runner.
//!
//! This library exposes the core simulation modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod headless;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::CombatPlugin;
pub use headless::{run_headless_scenario, ScenarioConfig, ScenarioResult};
