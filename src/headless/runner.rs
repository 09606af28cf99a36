//! Headless scenario execution
//!
//! Runs wave scenarios without any graphical output: an external driver loop
//! advancing the simulation at a fixed 60 Hz step, with scripted subject
//! strikes standing in for the player collaborator and an optional scripted
//! pause window exercising the velocity guard end to end.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::f32::consts::TAU;
use std::time::Duration;

use crate::combat::behaviors::spawn_enemy;
use crate::combat::components::{Enemy, GameRng, Health, SimulationSpeed, Subject};
use crate::combat::events::{DamageEvent, WaveClearedEvent};
use crate::combat::log::{CombatLog, ScenarioMetadata};
use crate::combat::systems::SimPhase;
use crate::combat::tuning::SimTuning;
use crate::combat::waves::Wave;
use crate::combat::CombatPlugin;

use super::config::{ScenarioConfig, WaveConfig};

/// Simulation tick rate of the headless driver. Every frame advances the
/// clock by exactly one fixed step, so runs are fast and deterministic.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// How the scenario ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// Every wave was cleared
    Cleared,
    /// The duration limit elapsed with enemies still alive
    TimedOut,
}

/// Result of a completed headless scenario
///
/// Provides programmatic access to scenario outcomes for testing and analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// How the scenario ended
    pub outcome: ScenarioOutcome,
    /// Total scenario duration in seconds
    pub duration_secs: f32,
    /// Waves cleared before the scenario ended
    pub waves_cleared: u32,
    /// Waves the scenario defined
    pub total_waves: u32,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Per-enemy outcomes, in spawn order
    pub enemies: Vec<EnemyOutcome>,
}

/// Outcome of a single enemy, assembled from the combat log
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyOutcome {
    /// Log identity, e.g. "Wave 1 Fighter 2"
    pub id: String,
    /// Kind name (e.g. "Fighter")
    pub kind: String,
    /// 1-based index of the owning wave
    pub wave_index: u32,
    /// Maximum health at spawn
    pub max_health: i32,
    /// Health after the last hit; negative when the killing blow was an overkill
    pub final_health: i32,
    /// Whether this enemy was still alive at scenario end
    pub survived: bool,
    /// Total damage applied to this enemy
    pub damage_taken: i32,
    /// Burst requests this enemy emitted
    pub patterns_fired: u32,
}

/// A wave waiting to spawn once its delay elapses
#[derive(Debug, Clone, Copy)]
struct PendingWave {
    index: usize,
    remaining: f32,
}

/// Resource tracking headless scenario state
#[derive(Resource)]
pub struct ScenarioState {
    /// Maximum scenario duration before declaring a timeout
    pub max_duration: f32,
    /// Elapsed scenario time
    pub elapsed_time: f32,
    /// Custom output path for the combat log (None = no export)
    pub output_path: Option<String>,
    /// Whether the scenario has completed
    pub complete: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
    /// Waves cleared so far
    pub waves_cleared: u32,
    /// Scenario result (populated when the scenario completes)
    pub result: Option<ScenarioResult>,
    pending_wave: Option<PendingWave>,
    strike_timer: f32,
}

impl ScenarioState {
    fn new(config: &ScenarioConfig) -> Self {
        Self {
            max_duration: config.max_duration_secs,
            elapsed_time: 0.0,
            output_path: config.output_path.clone(),
            complete: false,
            random_seed: config.random_seed,
            waves_cleared: 0,
            result: None,
            pending_wave: config.waves.first().map(|wave| PendingWave {
                index: 0,
                remaining: wave.spawn_delay_secs,
            }),
            strike_timer: config
                .subject_strikes
                .map(|strikes| strikes.interval_secs)
                .unwrap_or(0.0),
        }
    }
}

/// Plugin for headless scenario execution
pub struct ScenarioPlugin {
    pub config: ScenarioConfig,
}

impl Plugin for ScenarioPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(ScenarioState::new(&self.config))
            .insert_resource(SimTuning::load())
            .add_plugins(CombatPlugin);

        // Scenario bookkeeping runs after the frame's combat resolution
        app.add_systems(Startup, scenario_setup)
            .add_systems(
                Update,
                (
                    scenario_track_time,
                    scenario_spawn_waves,
                    scenario_subject_strikes,
                    scenario_advance_waves,
                    scenario_check_end,
                )
                    .chain()
                    .after(SimPhase::Resolution),
            )
            .add_systems(PostUpdate, scenario_exit_on_complete);
    }
}

/// Setup system for the headless scenario
fn scenario_setup(
    mut commands: Commands,
    config: Res<ScenarioConfig>,
    state: Res<ScenarioState>,
    mut log: ResMut<CombatLog>,
) {
    log.clear();
    log.log_scenario_event("Scenario started (headless mode)".to_string());

    // Initialize GameRng with seed if provided (deterministic mode)
    let rng = match state.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };
    commands.insert_resource(rng);

    let (x, y) = config.subject_position;
    commands.spawn((Subject, Transform::from_xyz(x, y, 0.0)));

    info!(
        "Scenario setup complete: {} waves, subject at ({}, {})",
        config.waves.len(),
        x,
        y
    );
}

/// Tracks elapsed scenario time and drives the scripted pause window.
fn scenario_track_time(
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    mut state: ResMut<ScenarioState>,
    mut speed: ResMut<SimulationSpeed>,
    mut log: ResMut<CombatLog>,
) {
    if state.complete {
        return;
    }
    state.elapsed_time += time.delta_secs();

    if let Some(window) = config.pause_window {
        let inside = state.elapsed_time >= window.start_secs
            && state.elapsed_time < window.start_secs + window.duration_secs;
        if inside && !speed.is_paused() {
            speed.pause();
            info!("Pause window engaged at {:.2}s", state.elapsed_time);
            log.log_scenario_event(format!("Simulation paused at {:.2}s", state.elapsed_time));
        } else if !inside && speed.is_paused() {
            speed.normal_speed();
            info!("Pause window released at {:.2}s", state.elapsed_time);
            log.log_scenario_event(format!("Simulation resumed at {:.2}s", state.elapsed_time));
        }
    }
}

/// Spawns the pending wave once its delay elapses.
fn scenario_spawn_waves(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    mut state: ResMut<ScenarioState>,
    tuning: Res<SimTuning>,
    mut log: ResMut<CombatLog>,
    mut rng: ResMut<GameRng>,
) {
    if state.complete {
        return;
    }
    let Some(pending) = &mut state.pending_wave else {
        return;
    };
    pending.remaining -= time.delta_secs();
    if pending.remaining > 0.0 {
        return;
    }

    let index = pending.index;
    state.pending_wave = None;
    let subject = Vec2::new(config.subject_position.0, config.subject_position.1);
    spawn_scenario_wave(
        &mut commands,
        &mut log,
        &tuning,
        &mut rng,
        &config.waves[index],
        index as u32 + 1,
        subject,
    );
}

/// Assembles one wave: the wave entity, its members placed on a jittered ring
/// around the subject, and the spawn log entries.
fn spawn_scenario_wave(
    commands: &mut Commands,
    log: &mut CombatLog,
    tuning: &SimTuning,
    rng: &mut GameRng,
    wave_config: &WaveConfig,
    index: u32,
    subject: Vec2,
) {
    let wave_entity = commands.spawn_empty().id();
    let mut wave = Wave::new(index, wave_config.difficulty);

    let count = wave_config.enemies.len();
    for (slot, kind_name) in wave_config.enemies.iter().enumerate() {
        let kind = match ScenarioConfig::parse_kind(kind_name) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("{}, skipping spawn", e);
                continue;
            }
        };
        let angle = TAU * slot as f32 / count as f32 + rng.random_range(-0.25, 0.25);
        let radius = rng.random_range(18.0, 22.0);
        let position = subject + Vec2::from_angle(angle) * radius;
        spawn_enemy(commands, log, tuning, wave_entity, &mut wave, kind, position);
    }

    let member_count = wave.member_count() as u32;
    info!("Wave {} spawned with {} enemies", index, member_count);
    log.log_wave_spawned(
        index,
        member_count,
        format!("Wave {} spawned with {} enemies", index, member_count),
    );
    commands.entity(wave_entity).insert(wave);
}

/// Applies scripted subject strikes against the nearest living enemy.
fn scenario_subject_strikes(
    time: Res<Time>,
    config: Res<ScenarioConfig>,
    mut state: ResMut<ScenarioState>,
    subject: Query<&Transform, With<Subject>>,
    enemies: Query<(Entity, &Transform, &Health), With<Enemy>>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Some(strikes) = config.subject_strikes else {
        return;
    };
    if state.complete {
        return;
    }
    state.strike_timer -= time.delta_secs();
    if state.strike_timer > 0.0 {
        return;
    }
    state.strike_timer = strikes.interval_secs;

    let Ok(subject_transform) = subject.get_single() else {
        return;
    };
    let origin = subject_transform.translation.truncate();

    let nearest = enemies
        .iter()
        .filter(|(_, _, health)| health.is_alive())
        .map(|(entity, transform, _)| {
            (entity, origin.distance(transform.translation.truncate()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((target, _)) = nearest {
        damage_events.send(DamageEvent {
            target,
            amount: strikes.damage,
        });
    }
}

/// Consumes wave-cleared signals: despawns the cleared wave entity and
/// schedules the next wave behind its spawn delay.
fn scenario_advance_waves(
    mut commands: Commands,
    mut cleared: EventReader<WaveClearedEvent>,
    config: Res<ScenarioConfig>,
    mut state: ResMut<ScenarioState>,
) {
    for event in cleared.read() {
        commands.entity(event.wave).despawn();
        state.waves_cleared += 1;

        let next = state.waves_cleared as usize;
        if next < config.waves.len() {
            state.pending_wave = Some(PendingWave {
                index: next,
                remaining: config.waves[next].spawn_delay_secs,
            });
            info!(
                "Wave {} cleared, wave {} pending in {:.1}s",
                state.waves_cleared,
                next + 1,
                config.waves[next].spawn_delay_secs
            );
        } else {
            info!("Wave {} cleared, scenario finished", state.waves_cleared);
        }
    }
}

/// Checks whether the scenario has ended (all waves cleared, or timeout).
fn scenario_check_end(
    config: Res<ScenarioConfig>,
    mut state: ResMut<ScenarioState>,
    mut log: ResMut<CombatLog>,
) {
    if state.complete {
        return;
    }

    let total_waves = config.waves.len() as u32;
    let outcome = if state.waves_cleared >= total_waves {
        info!("Scenario cleared in {:.1}s", state.elapsed_time);
        ScenarioOutcome::Cleared
    } else if state.elapsed_time >= state.max_duration {
        info!("Scenario timed out after {:.1}s", state.elapsed_time);
        ScenarioOutcome::TimedOut
    } else {
        return;
    };

    log.log_scenario_event(format!(
        "Scenario ended: {:?} after {:.2}s",
        outcome, state.elapsed_time
    ));

    let result = build_scenario_result(outcome, &state, total_waves, &log);
    save_scenario_log(&result, &state, &log);
    state.result = Some(result);
    state.complete = true;
}

/// Builds the ScenarioResult from the combat log's registry and aggregations.
/// Dead enemies are despawned, so the log is the only place their final state
/// survives.
fn build_scenario_result(
    outcome: ScenarioOutcome,
    state: &ScenarioState,
    total_waves: u32,
    log: &CombatLog,
) -> ScenarioResult {
    let enemies = log
        .registered_enemies()
        .iter()
        .map(|registered| EnemyOutcome {
            id: registered.id.clone(),
            kind: registered.kind.clone(),
            wave_index: registered.wave_index,
            max_health: registered.max_health,
            final_health: log
                .final_health_of(&registered.id)
                .unwrap_or(registered.max_health),
            survived: log.enemy_survived(&registered.id),
            damage_taken: log.total_damage_taken(&registered.id),
            patterns_fired: log.patterns_fired_by(&registered.id),
        })
        .collect();

    ScenarioResult {
        outcome,
        duration_secs: state.elapsed_time,
        waves_cleared: state.waves_cleared,
        total_waves,
        random_seed: state.random_seed,
        enemies,
    }
}

/// Exports the combat log when an output path was configured.
fn save_scenario_log(result: &ScenarioResult, state: &ScenarioState, log: &CombatLog) {
    let Some(output_path) = state.output_path.as_deref() else {
        return;
    };

    let metadata = ScenarioMetadata {
        outcome: format!("{:?}", result.outcome),
        duration_secs: result.duration_secs,
        waves_cleared: result.waves_cleared,
        total_waves: result.total_waves,
        random_seed: result.random_seed,
    };

    match log.save_to_file(&metadata, Some(output_path)) {
        Ok(filename) => {
            println!("Scenario complete. Log saved to: {}", filename);
        }
        Err(e) => {
            eprintln!("Failed to save combat log: {}", e);
        }
    }
}

/// Exit the app when the scenario is complete
fn scenario_exit_on_complete(state: Res<ScenarioState>, mut exit: EventWriter<AppExit>) {
    if state.complete {
        exit.send(AppExit::Success);
    }
}

/// Builds the headless scenario app: minimal plugins, tracing output, and a
/// clock advancing by exactly one fixed step per frame.
fn build_scenario_app(config: ScenarioConfig) -> App {
    let frame = Duration::from_secs_f64(1.0 / TICKS_PER_SECOND);
    let mut app = App::new();
    app
        // Minimal plugins - no window, no rendering, no frame pacing
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        // Tracing output for the binary's info!/warn! diagnostics
        .add_plugins(bevy::log::LogPlugin::default())
        // Transform plugin needed for entity positions
        .add_plugins(TransformPlugin)
        // Advance the clock by exactly one fixed step per frame
        .insert_resource(TimeUpdateStrategy::ManualDuration(frame))
        .insert_resource(Time::<Fixed>::from_hz(TICKS_PER_SECOND))
        // Our headless scenario plugin
        .add_plugins(ScenarioPlugin { config });
    app
}

/// Run a headless scenario with the given configuration
pub fn run_headless_scenario(config: ScenarioConfig) -> Result<ScenarioResult, String> {
    config.validate()?;

    println!("Starting headless scenario simulation...");
    println!("  Waves: {}", config.waves.len());
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    let mut app = build_scenario_app(config);
    app.run();

    let state = app
        .world_mut()
        .remove_resource::<ScenarioState>()
        .ok_or_else(|| "Scenario state missing after run".to_string())?;
    state
        .result
        .ok_or_else(|| "Scenario ended without a result".to_string())
}
