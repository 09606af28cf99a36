//! Core combat state shared by every simulated entity.
//!
//! ## Components
//! - [`Health`]: integer hit points with an immutable maximum
//! - [`Facing`]: rotation steering state (face the subject, or a fixed target)
//! - [`Velocity`] / [`VelocityFreeze`]: tracked motion and the pause guard state
//! - [`Enemy`], [`Subject`], [`Bullet`]: entity roles on the playfield
//!
//! ## Resources
//! - [`SimulationSpeed`]: the pause flag handed to systems that gate on it
//! - [`GameRng`]: seedable RNG for reproducible scenario runs

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::behaviors::EnemyKind;

/// Aim directions with a squared length below this are treated as degenerate.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Integer hit points. The maximum never changes after construction.
/// `current` may go below zero on an overkill hit and stays observable at
/// that value until the entity is torn down within the same tick.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    /// Remaining hit points, possibly negative after the killing blow
    pub current: i32,
    maximum: i32,
}

impl Health {
    /// Creates a full pool. A non-positive maximum is clamped to 1 and logged.
    pub fn new(maximum: i32) -> Self {
        let maximum = if maximum <= 0 {
            warn!("Health maximum {} is not positive, clamping to 1", maximum);
            1
        } else {
            maximum
        };
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    /// Fraction of the pool remaining. Negative after an overkill hit.
    pub fn ratio(&self) -> f32 {
        self.current as f32 / self.maximum as f32
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Validates internal invariants (debug builds only).
    #[inline]
    pub fn debug_validate(&self) {
        debug_assert!(
            self.maximum >= 1,
            "Health maximum must be at least 1, got {}",
            self.maximum
        );
        debug_assert!(
            self.current <= self.maximum,
            "Health current {} exceeds maximum {}",
            self.current,
            self.maximum
        );
    }
}

/// Rotation steering state. When `face_subject` is set, the desired
/// orientation is recomputed toward the tracked subject every fixed tick and
/// wins over any explicitly set target. A `None` target means no desired
/// orientation has been established, so interpolation is skipped.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Facing {
    /// Recompute the target from the subject's position each fixed tick
    pub face_subject: bool,
    /// Desired orientation, always a rotation about the Z axis
    pub target: Option<Quat>,
}

impl Facing {
    /// Steering that only follows explicitly set targets.
    pub fn fixed() -> Self {
        Self {
            face_subject: false,
            target: None,
        }
    }

    /// Steering that tracks the subject.
    pub fn toward_subject() -> Self {
        Self {
            face_subject: true,
            target: None,
        }
    }

    /// Sets the desired orientation to an absolute angle in degrees.
    pub fn set_angle(&mut self, degrees: f32) {
        self.target = Some(Quat::from_rotation_z(degrees.to_radians()));
    }

    /// Composes an additional rotation in degrees onto the current target.
    /// An unset target is treated as the identity orientation.
    pub fn add_angle(&mut self, degrees: f32) {
        let current = self.target.unwrap_or(Quat::IDENTITY);
        self.target = Some(current * Quat::from_rotation_z(degrees.to_radians()));
    }

    /// Points the entity along `direction`. Sprites face +Y, so the angle is
    /// measured from the X axis and shifted by -90 degrees. A near-zero
    /// direction keeps the previous target.
    pub fn aim_along(&mut self, direction: Vec2) {
        if direction.length_squared() < DIRECTION_EPSILON {
            return;
        }
        self.set_angle(direction.y.atan2(direction.x).to_degrees() - 90.0);
    }

    /// Points the entity from `position` toward `point`.
    pub fn aim_at(&mut self, point: Vec2, position: Vec2) {
        self.aim_along(point - position);
    }
}

/// Tracked velocity in world units per second, integrated every fixed tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

/// Pause guard state. `saved` holds the pre-pause velocity while frozen and
/// is `None` otherwise. A zero vector is a valid saved value.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityFreeze {
    pub saved: Option<Vec2>,
}

impl VelocityFreeze {
    pub fn is_frozen(&self) -> bool {
        self.saved.is_some()
    }
}

/// Role component for wave-managed combat entities. `difficulty` is copied
/// from the owning wave at spawn; `wave` is resolved once and never
/// reassigned.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub difficulty: i32,
    pub wave: Entity,
}

/// Marker for the tracked subject that enemies aim at and pursue.
/// At most one exists per world.
#[derive(Component, Debug, Default)]
pub struct Subject;

/// Lifecycle of an externally simulated bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletState {
    Active,
    /// Consumed by a hit; further collision reports are dropped
    Spent,
}

/// Opaque damage carrier owned by the external bullet simulation. The core
/// only reads the damage value and flips the state when a hit lands.
#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub damage: i32,
    pub state: BulletState,
}

impl Bullet {
    pub fn new(damage: i32) -> Self {
        Self {
            damage,
            state: BulletState::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == BulletState::Active
    }

    /// Idempotent: a spent bullet stays spent.
    pub fn deactivate(&mut self) {
        self.state = BulletState::Spent;
    }
}

/// Parameters of a circular burst request handed to the external pattern
/// system: `count` bullets spread evenly across `arc_degrees`, centered on
/// the aim direction, each moving at `speed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstPattern {
    pub speed: f32,
    pub arc_degrees: f32,
    pub count: u32,
}

/// Simulation speed control. Pausing never stops tick delivery; systems that
/// must suspend while paused check [`SimulationSpeed::is_paused`] themselves.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimulationSpeed {
    /// Current speed multiplier (0.0 = paused, 1.0 = normal speed)
    pub multiplier: f32,
}

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl SimulationSpeed {
    /// Pauses the simulation.
    pub fn pause(&mut self) {
        self.multiplier = 0.0;
    }

    /// Resumes normal speed.
    pub fn normal_speed(&mut self) {
        self.multiplier = 1.0;
    }

    /// Returns true if the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.multiplier == 0.0
    }
}

/// Seedable random number generator for deterministic scenario runs.
/// With the same seed, spawn placement and every derived decision replays
/// identically.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to create this RNG (None when seeded from entropy)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Creates a new RNG with a specific seed for reproducible runs.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Creates a new RNG seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generates a random f32 in the range [0.0, 1.0).
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generates a random f32 in the given range.
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Health =====

    #[test]
    fn test_health_starts_full() {
        let health = Health::new(100);
        assert_eq!(health.current, 100);
        assert_eq!(health.maximum(), 100);
        assert!(health.is_alive());
        assert_eq!(health.ratio(), 1.0);
    }

    #[test]
    fn test_health_clamps_non_positive_maximum() {
        assert_eq!(Health::new(0).maximum(), 1);
        assert_eq!(Health::new(-5).maximum(), 1);
    }

    #[test]
    fn test_health_ratio_can_go_negative() {
        let mut health = Health::new(100);
        health.current -= 110;
        assert!(!health.is_alive());
        assert!((health.ratio() - (-0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_health_zero_is_dead() {
        let mut health = Health::new(50);
        health.current = 0;
        assert!(!health.is_alive());
        health.current = 1;
        assert!(health.is_alive());
    }

    // ===== Facing =====

    fn assert_angle(facing: &Facing, degrees: f32) {
        let expected = Quat::from_rotation_z(degrees.to_radians());
        let actual = facing.target.expect("facing should have a target");
        assert!(
            actual.angle_between(expected) < 1e-4,
            "expected {} degrees, got {:?}",
            degrees,
            actual
        );
    }

    #[test]
    fn test_set_angle_overwrites_target() {
        let mut facing = Facing::fixed();
        facing.set_angle(90.0);
        assert_angle(&facing, 90.0);
        facing.set_angle(-45.0);
        assert_angle(&facing, -45.0);
    }

    #[test]
    fn test_add_angle_composes() {
        let mut facing = Facing::fixed();
        facing.set_angle(30.0);
        facing.add_angle(60.0);
        assert_angle(&facing, 90.0);
    }

    #[test]
    fn test_add_angle_from_unset_starts_at_identity() {
        let mut facing = Facing::fixed();
        facing.add_angle(45.0);
        assert_angle(&facing, 45.0);
    }

    #[test]
    fn test_aim_along_offsets_for_sprite_forward() {
        let mut facing = Facing::fixed();
        // +X direction points the +Y-forward sprite at -90 degrees
        facing.aim_along(Vec2::X);
        assert_angle(&facing, -90.0);
        facing.aim_along(Vec2::Y);
        assert_angle(&facing, 0.0);
    }

    #[test]
    fn test_aim_along_degenerate_direction_holds() {
        let mut facing = Facing::fixed();
        facing.set_angle(45.0);
        facing.aim_along(Vec2::ZERO);
        assert_angle(&facing, 45.0);

        let mut unset = Facing::fixed();
        unset.aim_along(Vec2::new(1e-5, 0.0));
        assert!(unset.target.is_none(), "degenerate aim must not set a target");
    }

    #[test]
    fn test_aim_at_points_from_position() {
        let mut facing = Facing::fixed();
        facing.aim_at(Vec2::new(5.0, 3.0), Vec2::new(5.0, 2.0));
        assert_angle(&facing, 0.0);
    }

    // ===== Bullets =====

    #[test]
    fn test_bullet_deactivation_is_idempotent() {
        let mut bullet = Bullet::new(25);
        assert!(bullet.is_active());
        bullet.deactivate();
        assert!(!bullet.is_active());
        bullet.deactivate();
        assert_eq!(bullet.state, BulletState::Spent);
        assert_eq!(bullet.damage, 25);
    }

    // ===== Pause state =====

    #[test]
    fn test_velocity_freeze_defaults_to_unfrozen() {
        let freeze = VelocityFreeze::default();
        assert!(!freeze.is_frozen());
        assert!(freeze.saved.is_none());
    }

    #[test]
    fn test_simulation_speed_pause_round_trip() {
        let mut speed = SimulationSpeed::default();
        assert!(!speed.is_paused());
        speed.pause();
        assert!(speed.is_paused());
        speed.normal_speed();
        assert!(!speed.is_paused());
        assert_eq!(speed.multiplier, 1.0);
    }

    // ===== RNG =====

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut rng1 = GameRng::from_seed(12345);
        let mut rng2 = GameRng::from_seed(12345);
        for _ in 0..100 {
            assert_eq!(rng1.random_f32(), rng2.random_f32());
        }
    }

    #[test]
    fn test_different_seeds_produce_different_results() {
        let mut rng1 = GameRng::from_seed(1);
        let mut rng2 = GameRng::from_seed(2);
        let values1: Vec<f32> = (0..10).map(|_| rng1.random_f32()).collect();
        let values2: Vec<f32> = (0..10).map(|_| rng2.random_f32()).collect();
        assert_ne!(values1, values2);
    }

    #[test]
    fn test_random_range_respects_bounds() {
        let mut rng = GameRng::from_seed(777);
        for _ in 0..100 {
            let value = rng.random_range(-4.0, 4.0);
            assert!(value >= -4.0 && value < 4.0);
        }
    }

    #[test]
    fn test_rng_seed_bookkeeping() {
        assert_eq!(GameRng::from_seed(99).seed, Some(99));
        assert_eq!(GameRng::from_entropy().seed, None);
    }
}
