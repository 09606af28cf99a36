//! Combat logging
//!
//! Records everything observable about a scenario run: damage applications
//! with the health ratio after each hit, deaths, outbound pattern requests,
//! wave lifecycle, and surfaced contract violations. The log doubles as the
//! source for end-of-scenario reporting, since dead enemies are despawned
//! and their final state survives only here.

use bevy::prelude::*;
use serde::Serialize;

use super::events::LifecycleError;

/// Identity of an enemy in log entries, e.g. "Wave 1 Fighter 2".
pub type EnemyId = String;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in simulation time (seconds since scenario start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Structured payload for aggregation queries and export
    pub data: Option<StructuredEventData>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Damage applied
    Damage,
    /// Enemy died
    Death,
    /// Burst pattern requested
    PatternFired,
    /// Wave spawned or cleared
    WaveEvent,
    /// Scenario event (start, pause, end)
    ScenarioEvent,
    /// Lifecycle contract violation
    LifecycleError,
}

/// Structured payload attached to entries that carry queryable values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StructuredEventData {
    Damage {
        target: EnemyId,
        amount: i32,
        /// Remaining hit points after the hit, negative on overkill
        health_after: i32,
        ratio_after: f32,
        killing_blow: bool,
    },
    Death {
        victim: EnemyId,
    },
    Pattern {
        shooter: EnemyId,
        bullet_count: u32,
    },
    WaveSpawned {
        wave_index: u32,
        enemy_count: u32,
    },
    WaveCleared {
        wave_index: u32,
    },
    Violation {
        kind: String,
    },
}

/// Spawn-time metadata for an enemy, kept for end-of-scenario reporting.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredEnemy {
    pub id: EnemyId,
    pub kind: String,
    pub wave_index: u32,
    pub max_health: i32,
}

/// Scenario-level metadata written alongside the entries on export.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioMetadata {
    pub outcome: String,
    pub duration_secs: f32,
    pub waves_cleared: u32,
    pub total_waves: u32,
    pub random_seed: Option<u64>,
}

#[derive(Serialize)]
struct CombatLogExport<'a> {
    metadata: &'a ScenarioMetadata,
    enemies: &'a [RegisteredEnemy],
    entries: &'a [CombatLogEntry],
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current simulation time
    pub sim_time: f32,
    registered: Vec<RegisteredEnemy>,
}

impl CombatLog {
    /// Clear the log for a new scenario
    pub fn clear(&mut self) {
        self.entries.clear();
        self.registered.clear();
        self.sim_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    fn push(
        &mut self,
        event_type: CombatLogEventType,
        message: String,
        data: Option<StructuredEventData>,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.sim_time,
            event_type,
            message,
            data,
        });
    }

    // ===== Typed helpers =====

    pub fn log_damage(
        &mut self,
        target: &str,
        amount: i32,
        health_after: i32,
        ratio_after: f32,
        killing_blow: bool,
        message: String,
    ) {
        self.push(
            CombatLogEventType::Damage,
            message,
            Some(StructuredEventData::Damage {
                target: target.to_string(),
                amount,
                health_after,
                ratio_after,
                killing_blow,
            }),
        );
    }

    pub fn log_death(&mut self, victim: &str, message: String) {
        self.push(
            CombatLogEventType::Death,
            message,
            Some(StructuredEventData::Death {
                victim: victim.to_string(),
            }),
        );
    }

    pub fn log_pattern_fired(&mut self, shooter: &str, bullet_count: u32, message: String) {
        self.push(
            CombatLogEventType::PatternFired,
            message,
            Some(StructuredEventData::Pattern {
                shooter: shooter.to_string(),
                bullet_count,
            }),
        );
    }

    pub fn log_wave_spawned(&mut self, wave_index: u32, enemy_count: u32, message: String) {
        self.push(
            CombatLogEventType::WaveEvent,
            message,
            Some(StructuredEventData::WaveSpawned {
                wave_index,
                enemy_count,
            }),
        );
    }

    pub fn log_wave_cleared(&mut self, wave_index: u32, message: String) {
        self.push(
            CombatLogEventType::WaveEvent,
            message,
            Some(StructuredEventData::WaveCleared { wave_index }),
        );
    }

    pub fn log_scenario_event(&mut self, message: String) {
        self.push(CombatLogEventType::ScenarioEvent, message, None);
    }

    pub fn log_violation(&mut self, kind: LifecycleError, message: String) {
        self.push(
            CombatLogEventType::LifecycleError,
            message,
            Some(StructuredEventData::Violation {
                kind: format!("{:?}", kind),
            }),
        );
    }

    // ===== Registry =====

    /// Records an enemy's spawn metadata for later reporting.
    pub fn register_enemy(&mut self, id: &str, kind: &str, wave_index: u32, max_health: i32) {
        self.registered.push(RegisteredEnemy {
            id: id.to_string(),
            kind: kind.to_string(),
            wave_index,
            max_health,
        });
    }

    pub fn registered_enemies(&self) -> &[RegisteredEnemy] {
        &self.registered
    }

    /// All enemy ids that ever appeared in the registry, in spawn order.
    pub fn all_enemies(&self) -> Vec<EnemyId> {
        self.registered.iter().map(|r| r.id.clone()).collect()
    }

    // ===== Aggregation queries =====

    /// Total damage actually applied to an enemy (violations excluded).
    pub fn total_damage_taken(&self, id: &str) -> i32 {
        self.entries
            .iter()
            .filter_map(|e| match &e.data {
                Some(StructuredEventData::Damage { target, amount, .. }) if target == id => {
                    Some(*amount)
                }
                _ => None,
            })
            .sum()
    }

    /// Remaining health after the last damage application, negative when the
    /// killing blow was an overkill. None if the enemy was never hit.
    pub fn final_health_of(&self, id: &str) -> Option<i32> {
        self.entries
            .iter()
            .rev()
            .find_map(|e| match &e.data {
                Some(StructuredEventData::Damage {
                    target,
                    health_after,
                    ..
                }) if target == id => Some(*health_after),
                _ => None,
            })
    }

    /// True while no death entry names this enemy.
    pub fn enemy_survived(&self, id: &str) -> bool {
        !self.entries.iter().any(|e| {
            matches!(&e.data, Some(StructuredEventData::Death { victim }) if victim == id)
        })
    }

    /// Number of burst requests an enemy emitted.
    pub fn patterns_fired_by(&self, id: &str) -> u32 {
        self.entries
            .iter()
            .filter(|e| {
                matches!(&e.data, Some(StructuredEventData::Pattern { shooter, .. }) if shooter == id)
            })
            .count() as u32
    }

    /// All surfaced lifecycle violations.
    pub fn violations(&self) -> Vec<&CombatLogEntry> {
        self.filter_by_type(CombatLogEventType::LifecycleError)
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    // ===== Export =====

    /// Writes the log as pretty-printed JSON. Returns the path written.
    /// Falls back to a default file name when no path is given.
    pub fn save_to_file(
        &self,
        metadata: &ScenarioMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = output_path.unwrap_or("wavesim_scenario_log.json").to_string();
        let export = CombatLogExport {
            metadata,
            enemies: &self.registered,
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| format!("Failed to serialize combat log: {}", e))?;
        std::fs::write(&path, json)
            .map_err(|e| format!("Failed to write combat log to {}: {}", path, e))?;
        Ok(path)
    }
}

/// Advances the log clock by the variable tick delta. Runs first every tick,
/// paused or not, so entries are stamped with driver time.
pub fn advance_sim_clock(time: Res<Time>, mut log: ResMut<CombatLog>) {
    log.sim_time += time.delta_secs();
}
