//! Per-kind enemy behaviors.
//!
//! Each enemy kind lives in its own module with its behavior component and
//! systems. This module hosts the kind dispatch plus the spawn assembly that
//! wires the core components together with the kind's behavior state.

pub mod fighter;

use bevy::prelude::*;

use super::components::{Enemy, Facing, Health, Velocity, VelocityFreeze};
use super::log::CombatLog;
use super::tuning::SimTuning;
use super::waves::Wave;
use fighter::Fighter;

/// The enemy kinds the simulation can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Fighter,
}

impl EnemyKind {
    /// Display name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Fighter => "Fighter",
        }
    }
}

/// Builds the log identity for an enemy from its wave index, kind, and
/// 1-based spawn slot within the wave.
pub fn enemy_log_id(wave_index: u32, kind: EnemyKind, slot: u32) -> String {
    format!("Wave {} {} {}", wave_index, kind.name(), slot)
}

/// Spawns an enemy into `wave` at `position`: assembles the core components,
/// snapshots the wave's difficulty, registers the member, and records the
/// spawn metadata. Returns the new entity.
pub fn spawn_enemy(
    commands: &mut Commands,
    log: &mut CombatLog,
    tuning: &SimTuning,
    wave_entity: Entity,
    wave: &mut Wave,
    kind: EnemyKind,
    position: Vec2,
) -> Entity {
    let slot = wave.member_count() as u32 + 1;
    let id = enemy_log_id(wave.index, kind, slot);

    let health = match kind {
        EnemyKind::Fighter => Health::new(tuning.fighter.max_health),
    };
    log.register_enemy(&id, kind.name(), wave.index, health.maximum());

    let entity = match kind {
        EnemyKind::Fighter => commands
            .spawn((
                Name::new(id),
                Enemy {
                    kind,
                    difficulty: wave.difficulty,
                    wave: wave_entity,
                },
                health,
                Transform::from_translation(position.extend(0.0)),
                Facing::toward_subject(),
                Velocity::default(),
                VelocityFreeze::default(),
                Fighter::from_tuning(&tuning.fighter),
            ))
            .id(),
    };

    wave.register(entity);
    entity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_log_id_format() {
        assert_eq!(enemy_log_id(1, EnemyKind::Fighter, 2), "Wave 1 Fighter 2");
        assert_eq!(enemy_log_id(3, EnemyKind::Fighter, 1), "Wave 3 Fighter 1");
    }

    #[test]
    fn test_spawn_registers_and_snapshots_difficulty() {
        let mut world = World::new();
        world.init_resource::<CombatLog>();
        let tuning = SimTuning::default();

        let wave_entity = world.spawn_empty().id();
        let mut wave = Wave::new(2, 7);
        let enemy = world.resource_scope(|world, mut log: Mut<CombatLog>| {
            let mut commands = world.commands();
            spawn_enemy(
                &mut commands,
                &mut log,
                &tuning,
                wave_entity,
                &mut wave,
                EnemyKind::Fighter,
                Vec2::new(3.0, 4.0),
            )
        });
        world.flush();

        assert!(wave.contains(enemy));
        assert_eq!(wave.member_count(), 1);

        let role = world.get::<Enemy>(enemy).expect("enemy role must exist");
        assert_eq!(role.difficulty, 7, "difficulty must copy from the wave");
        assert_eq!(role.wave, wave_entity);

        let health = world.get::<Health>(enemy).unwrap();
        assert_eq!(health.maximum(), 100);
        assert!(health.is_alive());

        assert!(world.get::<Facing>(enemy).unwrap().face_subject);
        assert_eq!(
            world.get::<Name>(enemy).unwrap().as_str(),
            "Wave 2 Fighter 1"
        );

        let log = world.resource::<CombatLog>();
        let registered = log.registered_enemies();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered[0].id, "Wave 2 Fighter 1");
        assert_eq!(registered[0].wave_index, 2);
        assert_eq!(registered[0].max_health, 100);
    }
}
