//! Wave combat simulation core
//!
//! Implements the combat-entity state machine and its supporting systems:
//! - Health, damage intake, death, and wave deregistration
//! - Bullet collision translation (damage once, spend the bullet)
//! - The edge-triggered pause guard over tracked velocities
//! - Rotation steering toward the subject or a fixed orientation
//! - Per-kind behaviors (cooldown-gated burst fire, pursuit)
//! - Combat logging

use bevy::prelude::*;

pub mod behaviors;
pub mod components;
pub mod core;
pub mod events;
pub mod log;
pub mod systems;
pub mod tuning;
pub mod waves;

use components::SimulationSpeed;
use events::*;
use systems::{add_core_sim_systems, configure_sim_schedule};

/// Plugin for the simulation core. Registers events and resources, configures
/// the phase ordering, and installs the core systems unconditionally; drivers
/// that need a run condition wire the systems API themselves instead.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Observations and requests exchanged with drivers
            .add_event::<DamageEvent>()
            .add_event::<BulletHitEvent>()
            .add_event::<HealthChangedEvent>()
            .add_event::<EnemyDeathEvent>()
            .add_event::<WaveClearedEvent>()
            .add_event::<PatternFiredEvent>()
            .add_event::<LifecycleErrorEvent>()
            // Resources
            .init_resource::<log::CombatLog>()
            .init_resource::<SimulationSpeed>()
            .init_resource::<tuning::SimTuning>();

        configure_sim_schedule(app);
        add_core_sim_systems(app, || true);
    }
}
