//! Core combat mechanics.
//!
//! Responsibilities:
//! - Translating bullet collision reports into damage applications
//! - Applying damage, detecting deaths, and tearing down dead enemies
//! - Deregistering dead enemies from their wave and signalling cleared waves
//! - The edge-triggered pause guard over tracked velocities
//! - Rotation steering toward the desired orientation every fixed tick
//! - Velocity integration into translations every fixed tick

use bevy::prelude::*;

use super::components::{
    Bullet, Enemy, Facing, Health, SimulationSpeed, Subject, Velocity, VelocityFreeze,
};
use super::events::{
    BulletHitEvent, DamageEvent, EnemyDeathEvent, HealthChangedEvent, LifecycleError,
    LifecycleErrorEvent, WaveClearedEvent,
};
use super::log::CombatLog;
use super::tuning::SimTuning;
use super::waves::Wave;

/// Freezes and restores tracked velocities around the pause flag. Runs every
/// variable tick before all other per-tick logic, paused or not; only the
/// engage and release edges mutate anything.
pub fn pause_velocity_guard(
    speed: Res<SimulationSpeed>,
    mut query: Query<(&mut Velocity, &mut VelocityFreeze)>,
) {
    let paused = speed.is_paused();
    for (mut velocity, mut freeze) in query.iter_mut() {
        if paused {
            if freeze.saved.is_none() {
                freeze.saved = Some(velocity.0);
                velocity.0 = Vec2::ZERO;
            }
        } else if let Some(saved) = freeze.saved.take() {
            velocity.0 = saved;
        }
        debug_assert!(
            paused || freeze.saved.is_none(),
            "freeze state must clear on release"
        );
    }
}

/// Turns hits reported by the external bullet simulation into damage
/// requests. Each bullet deals damage exactly once; reports for spent or
/// despawned bullets are dropped.
pub fn process_bullet_hits(
    mut hits: EventReader<BulletHitEvent>,
    mut bullets: Query<&mut Bullet>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    for hit in hits.read() {
        let Ok(mut bullet) = bullets.get_mut(hit.bullet) else {
            continue;
        };
        if !bullet.is_active() {
            continue;
        }
        damage_events.send(DamageEvent {
            target: hit.target,
            amount: bullet.damage,
        });
        bullet.deactivate();
    }
}

/// Applies queued damage, emits health observations, and runs the death
/// sequence for enemies whose pool is depleted: wave deregistration, death
/// notification, and deferred teardown within the same tick.
///
/// Damage aimed at dead or missing entities is not applied; it is surfaced
/// as a lifecycle violation and the simulation continues.
pub fn apply_damage(
    mut commands: Commands,
    mut damage_events: EventReader<DamageEvent>,
    mut enemies: Query<(&Enemy, &mut Health, &Name)>,
    mut waves: Query<&mut Wave>,
    mut health_events: EventWriter<HealthChangedEvent>,
    mut death_events: EventWriter<EnemyDeathEvent>,
    mut cleared_events: EventWriter<WaveClearedEvent>,
    mut violations: EventWriter<LifecycleErrorEvent>,
    mut log: ResMut<CombatLog>,
) {
    for event in damage_events.read() {
        let Ok((enemy, mut health, name)) = enemies.get_mut(event.target) else {
            warn!("Damage event for missing entity {:?}", event.target);
            violations.send(LifecycleErrorEvent {
                entity: event.target,
                error: LifecycleError::DamageTargetMissing,
            });
            log.log_violation(
                LifecycleError::DamageTargetMissing,
                format!("Damage event for missing entity {:?}", event.target),
            );
            continue;
        };

        if !health.is_alive() {
            warn!("{} was hit after death", name.as_str());
            violations.send(LifecycleErrorEvent {
                entity: event.target,
                error: LifecycleError::DamageAfterDeath,
            });
            log.log_violation(
                LifecycleError::DamageAfterDeath,
                format!("{} was hit after death", name.as_str()),
            );
            continue;
        }

        health.current -= event.amount;
        health.debug_validate();
        let ratio = health.ratio();
        health_events.send(HealthChangedEvent {
            entity: event.target,
            current: health.current,
            maximum: health.maximum(),
            ratio,
        });

        let killing_blow = !health.is_alive();
        log.log_damage(
            name.as_str(),
            event.amount,
            health.current,
            ratio,
            killing_blow,
            format!(
                "{} takes {} damage ({} HP remaining)",
                name.as_str(),
                event.amount,
                health.current
            ),
        );

        if !killing_blow {
            continue;
        }

        match waves.get_mut(enemy.wave) {
            Ok(mut wave) => {
                if !wave.deregister(event.target) {
                    warn!("{} was not registered in its wave", name.as_str());
                    violations.send(LifecycleErrorEvent {
                        entity: event.target,
                        error: LifecycleError::DeregisterNonMember,
                    });
                    log.log_violation(
                        LifecycleError::DeregisterNonMember,
                        format!("{} was not registered in its wave", name.as_str()),
                    );
                } else if wave.is_cleared() {
                    cleared_events.send(WaveClearedEvent { wave: enemy.wave });
                    log.log_wave_cleared(wave.index, format!("Wave {} cleared", wave.index));
                }
            }
            Err(_) => {
                warn!("Owning wave of {} is missing", name.as_str());
                violations.send(LifecycleErrorEvent {
                    entity: event.target,
                    error: LifecycleError::DeregisterNonMember,
                });
                log.log_violation(
                    LifecycleError::DeregisterNonMember,
                    format!("Owning wave of {} is missing", name.as_str()),
                );
            }
        }

        death_events.send(EnemyDeathEvent {
            entity: event.target,
            wave: enemy.wave,
        });
        log.log_death(name.as_str(), format!("{} destroyed", name.as_str()));
        commands.entity(event.target).despawn();
    }
}

/// Steers rotations toward the desired orientation every fixed tick.
/// Face-the-subject entities recompute their target first; the whole system
/// is skipped while paused, so orientations hold through a pause window.
pub fn update_facing(
    speed: Res<SimulationSpeed>,
    tuning: Res<SimTuning>,
    time: Res<Time>,
    subject: Query<&Transform, (With<Subject>, Without<Facing>)>,
    mut movers: Query<(&mut Transform, &mut Facing)>,
) {
    if speed.is_paused() {
        return;
    }

    let subject_position = subject.get_single().ok().map(|t| t.translation.truncate());
    let factor = (time.delta_secs() * tuning.rotation_rate).clamp(0.0, 1.0);

    for (mut transform, mut facing) in movers.iter_mut() {
        if facing.face_subject {
            if let Some(point) = subject_position {
                let position = transform.translation.truncate();
                facing.aim_at(point, position);
            }
        }
        if let Some(target) = facing.target {
            transform.rotation = transform.rotation.slerp(target, factor);
            debug_assert!(
                transform.rotation.is_finite(),
                "rotation steering produced a non-finite quaternion"
            );
        }
    }
}

/// Integrates tracked velocities into translations every fixed tick. Not
/// pause-gated: frozen entities carry zero velocity, so nothing moves.
pub fn integrate_velocity(time: Res<Time>, mut query: Query<(&mut Transform, &Velocity)>) {
    let dt = time.delta_secs();
    for (mut transform, velocity) in query.iter_mut() {
        debug_assert!(velocity.0.is_finite(), "velocity must stay finite");
        transform.translation += velocity.0.extend(0.0) * dt;
    }
}
