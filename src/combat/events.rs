//! Combat events
//!
//! Defines the observations and requests the simulation core exchanges with
//! its drivers: damage intake, health changes, deaths, wave clears, outbound
//! fire-pattern requests, and surfaced lifecycle violations.

use bevy::prelude::*;

use super::components::BurstPattern;

/// Request to apply damage to an entity. Sent by the collision translation
/// layer and by external drivers (scripted subject strikes, tests).
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving the damage
    pub target: Entity,
    /// Amount subtracted from current health, unconditionally
    pub amount: i32,
}

/// Collision report from the external bullet simulation.
#[derive(Event, Debug, Clone, Copy)]
pub struct BulletHitEvent {
    /// Entity the bullet struck
    pub target: Entity,
    /// The bullet that landed; its damage value is read and it is spent
    pub bullet: Entity,
}

/// Observation emitted after every damage application, carrying the values a
/// health display would consume.
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthChangedEvent {
    /// Entity whose health changed
    pub entity: Entity,
    /// Remaining hit points, possibly negative on the killing blow
    pub current: i32,
    /// The immutable maximum of the pool
    pub maximum: i32,
    /// current / maximum as a float; negative on an overkill hit
    pub ratio: f32,
}

/// Observation emitted when an enemy dies. Teardown is already queued when
/// this fires; the entity is gone by the next tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyDeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// The wave it was deregistered from
    pub wave: Entity,
}

/// Observation emitted when a wave's member set becomes empty. Consumed by
/// the scenario progression driver.
#[derive(Event, Debug, Clone, Copy)]
pub struct WaveClearedEvent {
    /// The wave that was cleared
    pub wave: Entity,
}

/// Outbound request for the external pattern system to emit a burst.
/// The core never simulates the bullets it asks for.
#[derive(Event, Debug, Clone, Copy)]
pub struct PatternFiredEvent {
    /// Entity that fired
    pub shooter: Entity,
    /// World position the burst originates from
    pub origin: Vec2,
    /// Unit aim direction toward the subject (zero if the subject overlaps)
    pub aim: Vec2,
    /// Burst shape and speed
    pub pattern: BurstPattern,
}

/// Lifecycle contract violation surfaced to drivers. Never fatal; the
/// simulation logs a warning and continues.
#[derive(Event, Debug, Clone, Copy)]
pub struct LifecycleErrorEvent {
    /// Entity the violation concerns
    pub entity: Entity,
    /// What went wrong
    pub error: LifecycleError,
}

/// The lifecycle contract violations the core detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// Damage arrived for an entity whose health was already depleted
    DamageAfterDeath,
    /// Damage arrived for an entity that no longer exists
    DamageTargetMissing,
    /// A deregistration named an entity the wave did not contain
    DeregisterNonMember,
}
