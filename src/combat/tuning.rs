//! Gameplay tuning archetypes.
//!
//! Numeric parameters for the simulation, loadable from a RON file with the
//! built-in defaults as fallback. The defaults are the canonical values;
//! the file exists so scenario authors can rebalance without recompiling.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::BurstPattern;

/// Location of the tuning file, relative to the working directory.
pub const TUNING_FILE: &str = "assets/config/tuning.ron";

/// Engine-wide and per-kind tuning values.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimTuning {
    /// Rotation interpolation rate; the per-tick factor is rate * fixed_dt
    #[serde(default = "default_rotation_rate")]
    pub rotation_rate: f32,
    #[serde(default)]
    pub fighter: FighterTuning,
}

/// Fighter archetype numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterTuning {
    #[serde(default = "default_fighter_max_health")]
    pub max_health: i32,
    /// Seconds between bursts; the cooldown resets to this exact value
    #[serde(default = "default_fighter_fire_cooldown")]
    pub fire_cooldown: f32,
    #[serde(default = "default_fighter_pursuit_speed")]
    pub pursuit_speed: f32,
    /// Pursuit halts inside this distance to the subject
    #[serde(default = "default_fighter_stop_distance")]
    pub stop_distance: f32,
    #[serde(default = "default_fighter_burst")]
    pub burst: BurstPattern,
}

fn default_rotation_rate() -> f32 {
    8.0
}

fn default_fighter_max_health() -> i32 {
    100
}

fn default_fighter_fire_cooldown() -> f32 {
    1.0
}

fn default_fighter_pursuit_speed() -> f32 {
    3.0
}

fn default_fighter_stop_distance() -> f32 {
    5.0
}

fn default_fighter_burst() -> BurstPattern {
    BurstPattern {
        speed: 6.0,
        arc_degrees: 100.0,
        count: 5,
    }
}

impl Default for FighterTuning {
    fn default() -> Self {
        Self {
            max_health: default_fighter_max_health(),
            fire_cooldown: default_fighter_fire_cooldown(),
            pursuit_speed: default_fighter_pursuit_speed(),
            stop_distance: default_fighter_stop_distance(),
            burst: default_fighter_burst(),
        }
    }
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            rotation_rate: default_rotation_rate(),
            fighter: FighterTuning::default(),
        }
    }
}

impl SimTuning {
    /// Loads tuning from [`TUNING_FILE`], falling back to the defaults when
    /// the file is missing or fails to parse.
    pub fn load() -> Self {
        let mut tuning = match std::fs::read_to_string(TUNING_FILE) {
            Ok(contents) => match ron::from_str::<SimTuning>(&contents) {
                Ok(tuning) => {
                    info!("Loaded tuning from {}", TUNING_FILE);
                    tuning
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", TUNING_FILE, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}, using defaults", TUNING_FILE, e);
                Self::default()
            }
        };
        tuning.sanitize();
        tuning
    }

    /// Clamps rate-like values back into the valid domain. Health bounds are
    /// enforced at spawn by the health pool itself.
    pub fn sanitize(&mut self) {
        if self.rotation_rate <= 0.0 {
            warn!(
                "Rotation rate {} is not positive, using {}",
                self.rotation_rate,
                default_rotation_rate()
            );
            self.rotation_rate = default_rotation_rate();
        }
        if self.fighter.fire_cooldown <= 0.0 {
            warn!(
                "Fighter fire cooldown {} is not positive, using {}",
                self.fighter.fire_cooldown,
                default_fighter_fire_cooldown()
            );
            self.fighter.fire_cooldown = default_fighter_fire_cooldown();
        }
        if self.fighter.burst.count == 0 {
            warn!("Fighter burst count 0 is invalid, using {}", default_fighter_burst().count);
            self.fighter.burst.count = default_fighter_burst().count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_canonical() {
        let tuning = SimTuning::default();
        assert_eq!(tuning.rotation_rate, 8.0);
        assert_eq!(tuning.fighter.max_health, 100);
        assert_eq!(tuning.fighter.fire_cooldown, 1.0);
        assert_eq!(tuning.fighter.pursuit_speed, 3.0);
        assert_eq!(tuning.fighter.stop_distance, 5.0);
        assert_eq!(tuning.fighter.burst.speed, 6.0);
        assert_eq!(tuning.fighter.burst.arc_degrees, 100.0);
        assert_eq!(tuning.fighter.burst.count, 5);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let tuning: SimTuning =
            ron::from_str("(fighter: (max_health: 250))").expect("partial tuning should parse");
        assert_eq!(tuning.fighter.max_health, 250);
        assert_eq!(tuning.fighter.fire_cooldown, 1.0);
        assert_eq!(tuning.rotation_rate, 8.0);
    }

    #[test]
    fn test_empty_ron_is_all_defaults() {
        let tuning: SimTuning = ron::from_str("()").expect("empty tuning should parse");
        assert_eq!(tuning, SimTuning::default());
    }

    #[test]
    fn test_sanitize_restores_invalid_rates() {
        let mut tuning = SimTuning::default();
        tuning.rotation_rate = -1.0;
        tuning.fighter.fire_cooldown = 0.0;
        tuning.fighter.burst.count = 0;
        tuning.sanitize();
        assert_eq!(tuning.rotation_rate, 8.0);
        assert_eq!(tuning.fighter.fire_cooldown, 1.0);
        assert_eq!(tuning.fighter.burst.count, 5);
    }
}
