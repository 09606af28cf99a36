//! JSON configuration parsing for headless scenarios
//!
//! Parses JSON scenario descriptions: the waves to run, the subject's
//! placement and scripted strikes, an optional scripted pause window, and the
//! run limits.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::behaviors::EnemyKind;

/// Headless scenario configuration loaded from JSON
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Waves to run, in order; the next wave spawns once the previous clears
    pub waves: Vec<WaveConfig>,
    /// World position of the tracked subject (default: origin)
    #[serde(default)]
    pub subject_position: (f32, f32),
    /// Scripted subject strikes against the nearest enemy (None = passive subject)
    #[serde(default)]
    pub subject_strikes: Option<SubjectStrikeConfig>,
    /// Scripted pause window exercising the velocity guard (optional)
    #[serde(default)]
    pub pause_window: Option<PauseWindowConfig>,
    /// Maximum scenario duration in seconds before declaring a timeout (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic scenario reproduction
    /// If provided, spawn placement and every derived decision replays identically
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Custom output path for the combat log (None = no export)
    #[serde(default)]
    pub output_path: Option<String>,
}

/// A single wave in the scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Difficulty tier copied into each member at spawn
    #[serde(default)]
    pub difficulty: i32,
    /// Enemy kind names to spawn (e.g. "Fighter")
    pub enemies: Vec<String>,
    /// Delay in seconds before this wave spawns (default: 0)
    #[serde(default)]
    pub spawn_delay_secs: f32,
}

/// Scripted subject strikes: every `interval_secs`, the nearest living enemy
/// takes `damage`. Stands in for the player collaborator in headless runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SubjectStrikeConfig {
    pub interval_secs: f32,
    pub damage: i32,
}

/// Scripted pause window: the simulation pauses at `start_secs` and resumes
/// `duration_secs` later.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PauseWindowConfig {
    pub start_secs: f32,
    pub duration_secs: f32,
}

fn default_max_duration() -> f32 {
    300.0
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: ScenarioConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.waves.is_empty() {
            return Err("scenario must define at least one wave".to_string());
        }

        for (i, wave) in self.waves.iter().enumerate() {
            if wave.enemies.is_empty() {
                return Err(format!("wave {} must contain at least one enemy", i + 1));
            }
            if wave.spawn_delay_secs < 0.0 {
                return Err(format!("wave {} spawn_delay_secs must not be negative", i + 1));
            }
            for kind_name in &wave.enemies {
                Self::parse_kind(kind_name)?;
            }
        }

        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        if let Some(strikes) = &self.subject_strikes {
            if strikes.interval_secs <= 0.0 {
                return Err("subject_strikes.interval_secs must be positive".to_string());
            }
            if strikes.damage < 0 {
                return Err("subject_strikes.damage must be non-negative".to_string());
            }
        }

        if let Some(window) = &self.pause_window {
            if window.start_secs < 0.0 {
                return Err("pause_window.start_secs must not be negative".to_string());
            }
            if window.duration_secs <= 0.0 {
                return Err("pause_window.duration_secs must be positive".to_string());
            }
        }

        Ok(())
    }

    /// Parse an enemy kind name string into EnemyKind
    pub fn parse_kind(name: &str) -> Result<EnemyKind, String> {
        match name {
            "Fighter" => Ok(EnemyKind::Fighter),
            _ => Err(format!(
                "Unknown enemy kind: '{}'. Valid kinds: Fighter",
                name
            )),
        }
    }
}
