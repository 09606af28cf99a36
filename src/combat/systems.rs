//! Stable system registration API for the simulation core.
//!
//! Systems are grouped into explicit phases so drivers (the headless runner,
//! integration tests, an embedding game) wire the same pipeline the same way:
//!
//! Variable tick ([`Update`]):
//! 1. [`SimPhase::Guard`]: log clock, pause velocity guard
//! 2. [`SimPhase::Behavior`]: cooldown ticking and burst requests
//! 3. [`SimPhase::Resolution`]: bullet hit translation, damage, deaths
//!
//! Fixed tick ([`FixedUpdate`]):
//! 1. [`FixedSimPhase::Steering`]: facing interpolation, pursuit
//! 2. [`FixedSimPhase::Integration`]: velocity into translation

use bevy::prelude::*;

pub use super::behaviors::fighter::{fighter_fire, fighter_pursue};
pub use super::core::{
    apply_damage, integrate_velocity, pause_velocity_guard, process_bullet_hits, update_facing,
};
pub use super::log::advance_sim_clock;

/// Variable-tick phases, run in declaration order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimPhase {
    /// Bookkeeping that must precede all other per-tick logic
    Guard,
    /// Per-kind behavior (cooldowns, fire requests)
    Behavior,
    /// Damage application and lifecycle resolution
    Resolution,
}

/// Fixed-tick phases, run in declaration order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedSimPhase {
    /// Orientation and velocity decisions
    Steering,
    /// Moving entities by their decided velocity
    Integration,
}

/// Configures the phase ordering on both schedules.
pub fn configure_sim_schedule(app: &mut App) {
    app.configure_sets(
        Update,
        (SimPhase::Guard, SimPhase::Behavior, SimPhase::Resolution).chain(),
    );
    app.configure_sets(
        FixedUpdate,
        (FixedSimPhase::Steering, FixedSimPhase::Integration).chain(),
    );
}

/// Registers the core simulation systems under the given run condition.
/// Call [`configure_sim_schedule`] first.
pub fn add_core_sim_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(
        Update,
        (advance_sim_clock, pause_velocity_guard)
            .chain()
            .in_set(SimPhase::Guard)
            .run_if(run_condition.clone()),
    );
    app.add_systems(
        Update,
        fighter_fire
            .in_set(SimPhase::Behavior)
            .run_if(run_condition.clone()),
    );
    app.add_systems(
        Update,
        (process_bullet_hits, apply_damage)
            .chain()
            .in_set(SimPhase::Resolution)
            .run_if(run_condition.clone()),
    );
    app.add_systems(
        FixedUpdate,
        (update_facing, fighter_pursue)
            .chain()
            .in_set(FixedSimPhase::Steering)
            .run_if(run_condition.clone()),
    );
    app.add_systems(
        FixedUpdate,
        integrate_velocity
            .in_set(FixedSimPhase::Integration)
            .run_if(run_condition),
    );
}
