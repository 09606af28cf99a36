//! Fighter behavior: cooldown-gated burst fire plus subject pursuit.
//!
//! Firing runs on the variable tick, pursuit on the fixed tick; both are
//! suspended while paused. The cooldown resets to its configured value
//! rather than keeping the overshoot, so cadence may drift relative to an
//! ideal clock.

use bevy::prelude::*;

use crate::combat::components::{BurstPattern, SimulationSpeed, Subject, Velocity};
use crate::combat::events::PatternFiredEvent;
use crate::combat::log::CombatLog;
use crate::combat::tuning::FighterTuning;

/// Behavior state for the fighter kind. Parameters are copied from the
/// tuning archetype at spawn and never re-read.
#[derive(Component, Debug, Clone)]
pub struct Fighter {
    /// Seconds until the next burst; counts down on the variable tick
    pub fire_cooldown: f32,
    /// Value the cooldown resets to after each burst
    pub cooldown_reset: f32,
    pub pursuit_speed: f32,
    /// Pursuit halts when the subject is inside this distance
    pub stop_distance: f32,
    pub burst: BurstPattern,
}

impl Fighter {
    pub fn from_tuning(tuning: &FighterTuning) -> Self {
        Self {
            fire_cooldown: tuning.fire_cooldown,
            cooldown_reset: tuning.fire_cooldown,
            pursuit_speed: tuning.pursuit_speed,
            stop_distance: tuning.stop_distance,
            burst: tuning.burst,
        }
    }
}

/// Counts down fire cooldowns and emits burst requests aimed at the subject.
/// Suspended while paused; cooldowns hold their remaining time.
pub fn fighter_fire(
    time: Res<Time>,
    speed: Res<SimulationSpeed>,
    subject: Query<&Transform, With<Subject>>,
    mut fighters: Query<(Entity, &Transform, &mut Fighter, &Name)>,
    mut patterns: EventWriter<PatternFiredEvent>,
    mut log: ResMut<CombatLog>,
) {
    if speed.is_paused() {
        return;
    }
    let subject_position = subject
        .get_single()
        .ok()
        .map(|t| t.translation.truncate());
    let dt = time.delta_secs();

    for (entity, transform, mut fighter, name) in fighters.iter_mut() {
        // the countdown runs every unpaused tick; only the burst itself
        // waits for a subject to aim at
        fighter.fire_cooldown -= dt;
        if fighter.fire_cooldown > 0.0 {
            continue;
        }
        let Some(subject_position) = subject_position else {
            continue;
        };
        let origin = transform.translation.truncate();
        let aim = (subject_position - origin).normalize_or_zero();
        patterns.send(PatternFiredEvent {
            shooter: entity,
            origin,
            aim,
            pattern: fighter.burst,
        });
        log.log_pattern_fired(
            name.as_str(),
            fighter.burst.count,
            format!(
                "{} fires a burst of {}",
                name.as_str(),
                fighter.burst.count
            ),
        );
        fighter.fire_cooldown = fighter.cooldown_reset;
    }
}

/// Pursues the subject at a fixed speed, stopping inside the stop distance.
/// Runs every fixed tick unless paused.
pub fn fighter_pursue(
    speed: Res<SimulationSpeed>,
    subject: Query<&Transform, With<Subject>>,
    mut fighters: Query<(&Transform, &Fighter, &mut Velocity)>,
) {
    if speed.is_paused() {
        return;
    }
    let Ok(subject_transform) = subject.get_single() else {
        return;
    };
    let subject_position = subject_transform.translation.truncate();

    for (transform, fighter, mut velocity) in fighters.iter_mut() {
        let to_subject = subject_position - transform.translation.truncate();
        velocity.0 = to_subject.normalize_or_zero() * fighter.pursuit_speed;
        if to_subject.length() <= fighter.stop_distance {
            velocity.0 = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn world_with_tick(dt: f32) -> World {
        let mut world = World::new();
        let mut time: Time = Time::default();
        time.advance_by(Duration::from_secs_f32(dt));
        world.insert_resource(time);
        world.insert_resource(SimulationSpeed::default());
        world.init_resource::<CombatLog>();
        world.init_resource::<Events<PatternFiredEvent>>();
        world
    }

    fn spawn_fighter(world: &mut World, fire_cooldown: f32, position: Vec2) -> Entity {
        let tuning = FighterTuning {
            fire_cooldown,
            ..FighterTuning::default()
        };
        world
            .spawn((
                Name::new("Wave 1 Fighter 1"),
                Transform::from_translation(position.extend(0.0)),
                Velocity::default(),
                Fighter::from_tuning(&tuning),
            ))
            .id()
    }

    fn pattern_count(world: &World) -> usize {
        world.resource::<Events<PatternFiredEvent>>().len()
    }

    // ===== Firing =====

    #[test]
    fn test_fire_cadence_matches_cooldown_over_tick() {
        // 0.9s cooldown at 0.25s ticks fires every 4th tick
        let mut world = world_with_tick(0.25);
        world.spawn((Subject, Transform::from_xyz(50.0, 0.0, 0.0)));
        spawn_fighter(&mut world, 0.9, Vec2::ZERO);

        for tick in 1..=12 {
            world.run_system_once(fighter_fire).unwrap();
            assert_eq!(
                pattern_count(&world),
                tick / 4,
                "unexpected burst count after tick {}",
                tick
            );
        }
    }

    #[test]
    fn test_reset_discards_overshoot() {
        let mut world = world_with_tick(0.25);
        world.spawn((Subject, Transform::from_xyz(50.0, 0.0, 0.0)));
        let fighter = spawn_fighter(&mut world, 0.9, Vec2::ZERO);

        for _ in 0..4 {
            world.run_system_once(fighter_fire).unwrap();
        }
        assert_eq!(
            world.get::<Fighter>(fighter).unwrap().fire_cooldown,
            0.9,
            "cooldown must reset to the constant, not keep the overshoot"
        );
    }

    #[test]
    fn test_fire_aims_at_subject_with_burst_parameters() {
        let mut world = world_with_tick(0.25);
        world.spawn((Subject, Transform::from_xyz(50.0, 0.0, 0.0)));
        spawn_fighter(&mut world, 1.0, Vec2::ZERO);

        for _ in 0..4 {
            world.run_system_once(fighter_fire).unwrap();
        }

        let events: Vec<PatternFiredEvent> = world
            .resource_mut::<Events<PatternFiredEvent>>()
            .drain()
            .collect();
        assert_eq!(events.len(), 1);
        assert!((events[0].aim - Vec2::X).length() < 1e-6);
        assert_eq!(events[0].origin, Vec2::ZERO);
        assert_eq!(events[0].pattern.count, 5);
        assert_eq!(events[0].pattern.speed, 6.0);
        assert_eq!(events[0].pattern.arc_degrees, 100.0);

        let log = world.resource::<CombatLog>();
        assert_eq!(log.patterns_fired_by("Wave 1 Fighter 1"), 1);
    }

    #[test]
    fn test_cooldown_holds_while_paused() {
        let mut world = world_with_tick(0.25);
        world.spawn((Subject, Transform::from_xyz(50.0, 0.0, 0.0)));
        let fighter = spawn_fighter(&mut world, 0.5, Vec2::ZERO);

        world.run_system_once(fighter_fire).unwrap();
        assert_eq!(world.get::<Fighter>(fighter).unwrap().fire_cooldown, 0.25);

        world.resource_mut::<SimulationSpeed>().pause();
        for _ in 0..5 {
            world.run_system_once(fighter_fire).unwrap();
        }
        assert_eq!(
            world.get::<Fighter>(fighter).unwrap().fire_cooldown,
            0.25,
            "paused ticks must not advance the cooldown"
        );
        assert_eq!(pattern_count(&world), 0);

        world.resource_mut::<SimulationSpeed>().normal_speed();
        world.run_system_once(fighter_fire).unwrap();
        assert_eq!(pattern_count(&world), 1);
    }

    #[test]
    fn test_cooldown_counts_down_without_a_subject() {
        let mut world = world_with_tick(0.25);
        let fighter = spawn_fighter(&mut world, 0.5, Vec2::ZERO);

        world.run_system_once(fighter_fire).unwrap();
        assert_eq!(
            world.get::<Fighter>(fighter).unwrap().fire_cooldown,
            0.25,
            "the countdown must advance even with no subject present"
        );

        // depleted countdown, still no subject: no burst, no reset
        world.run_system_once(fighter_fire).unwrap();
        assert_eq!(pattern_count(&world), 0);
        assert!(world.get::<Fighter>(fighter).unwrap().fire_cooldown <= 0.0);

        // a subject appearing releases the held burst
        world.spawn((Subject, Transform::from_xyz(50.0, 0.0, 0.0)));
        world.run_system_once(fighter_fire).unwrap();
        assert_eq!(pattern_count(&world), 1);
        assert_eq!(
            world.get::<Fighter>(fighter).unwrap().fire_cooldown,
            0.5,
            "firing must reset the countdown to its configured value"
        );
    }

    // ===== Pursuit =====

    #[test]
    fn test_pursuit_moves_toward_subject() {
        let mut world = world_with_tick(0.25);
        world.spawn((Subject, Transform::default()));
        let fighter = spawn_fighter(&mut world, 1.0, Vec2::new(10.0, 0.0));

        world.run_system_once(fighter_pursue).unwrap();
        assert_eq!(
            world.get::<Velocity>(fighter).unwrap().0,
            Vec2::new(-3.0, 0.0)
        );
    }

    #[test]
    fn test_pursuit_stops_inside_stop_distance() {
        let mut world = world_with_tick(0.25);
        world.spawn((Subject, Transform::default()));
        let near = spawn_fighter(&mut world, 1.0, Vec2::new(4.0, 0.0));
        let overlapping = spawn_fighter(&mut world, 1.0, Vec2::ZERO);

        world.run_system_once(fighter_pursue).unwrap();
        assert_eq!(world.get::<Velocity>(near).unwrap().0, Vec2::ZERO);
        assert_eq!(world.get::<Velocity>(overlapping).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn test_pursuit_suspended_while_paused() {
        let mut world = world_with_tick(0.25);
        world.spawn((Subject, Transform::default()));
        let fighter = spawn_fighter(&mut world, 1.0, Vec2::new(10.0, 0.0));
        world.entity_mut(fighter).insert(Velocity(Vec2::new(1.0, 1.0)));

        world.resource_mut::<SimulationSpeed>().pause();
        world.run_system_once(fighter_pursue).unwrap();
        assert_eq!(
            world.get::<Velocity>(fighter).unwrap().0,
            Vec2::new(1.0, 1.0),
            "paused pursuit must leave velocity untouched"
        );
    }
}
