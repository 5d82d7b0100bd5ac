//! Per-frame orchestration
//!
//! One call per rendering tick. The frame order is fixed: age visual timers,
//! steer the cannon, run the lock state machine against the active target (or
//! ask the emitter for a new one), and report what happened so the session
//! layer can emit labels.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::aiming::{AimStatus, AimStrategy, AimTracker, LockEvent, NeighborTest};
use super::cannon::Cannon;
use super::effects::Burst;
use super::target::{Arena, Emitter, SpawnPattern, Target};
use crate::settings::{Difficulty, GameSettings};

/// Input for a single frame, already debounced and in canvas space
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Canvas-space aim point; None when no usable gaze arrived this frame
    pub aim: Option<Vec2>,
    /// The designated aim key is held
    pub key_held: bool,
    /// Abandon the current target without penalty
    pub skip: bool,
}

/// What a frame produced, for the session layer
#[derive(Debug, Clone, Copy, Default)]
pub struct TickReport {
    /// Lock state machine outcome, when a target was active
    pub event: Option<LockEvent>,
    /// Position of the target destroyed this frame
    pub killed: Option<Vec2>,
    /// A new target was adopted this frame
    pub spawned: bool,
}

/// Complete game state for one play session
#[derive(Debug, Clone)]
pub struct GameState {
    pub cannon: Cannon,
    pub tracker: AimTracker,
    pub judge: NeighborTest,
    pub active: Option<Target>,
    /// End position of the most recently destroyed target
    pub corpse: Option<Vec2>,
    pub kills: u32,
    pub bursts: Vec<Burst>,
    emitter: Emitter,
    difficulty: Difficulty,
    rng: Pcg32,
}

impl GameState {
    pub fn new(arena: Arena, settings: &GameSettings, seed: u64) -> Self {
        let difficulty = settings.difficulty;
        let cannon_pos = Vec2::new(arena.width / 2.0, -2.0);

        Self {
            cannon: Cannon::new(cannon_pos, difficulty.cannon_step),
            tracker: AimTracker::new(AimStrategy::new(settings.aiming, &difficulty)),
            judge: NeighborTest::new(
                cannon_pos,
                difficulty.neighbor_range,
                difficulty.neighbor_angle,
            ),
            active: None,
            corpse: None,
            kills: 0,
            bursts: Vec::new(),
            emitter: Emitter::new(SpawnPattern::from_kind(settings.emitter, arena)),
            difficulty,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// The active target, only while the lock qualifies it as an aim label
    pub fn aimed_target(&self) -> Option<&Target> {
        if self.tracker.on_target() {
            self.active.as_ref()
        } else {
            None
        }
    }
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    // Visual timers first; their liveness is all the core tracks for them
    state.cannon.advance();
    for burst in &mut state.bursts {
        burst.advance();
    }
    state.bursts.retain(Burst::is_alive);

    let gaze_aimed = match (&state.active, input.aim) {
        (Some(target), Some(aim)) => state.judge.hit(target.pos, aim, 1.0),
        _ => false,
    };
    let status = AimStatus {
        gaze_aimed,
        key_held: input.key_held,
        skip: input.skip,
    };

    // Steering: snap to the target under precedence input, else follow the
    // aim point, else hold still
    let steer_point = if state.tracker.cannon_update(&status) {
        state.active.as_ref().map(|t| t.pos).or(input.aim)
    } else {
        input.aim
    };
    if let Some(point) = steer_point {
        state.cannon.steer_toward(point);
    }

    if let Some(mut target) = state.active.take() {
        let event = state.tracker.update(&status);
        report.event = Some(event);

        if event == LockEvent::Kill {
            let hit_radius = state.cannon.pos.distance(target.pos);
            state.cannon.open_fire(hit_radius, state.judge.angle);
            state.bursts.push(Burst::new(
                target.pos,
                state.difficulty.burst_min,
                state.difficulty.burst_max,
                &mut state.rng,
            ));

            state.corpse = Some(target.end);
            state.kills += 1;
            report.killed = Some(target.pos);
            log::info!("target destroyed at {:?}, kills={}", target.pos, state.kills);
        } else {
            // Dropped or still locking: the target stays alive and mobile
            target.advance();
            state.active = Some(target);
        }
    } else if let Some(target) = state.emitter.spawn(
        state.difficulty.spawn_probability,
        state.difficulty.spawn_max_trials,
        state.corpse,
        &state.judge,
        &mut state.rng,
    ) {
        log::debug!("target spawned heading for {:?}", target.end);
        state.active = Some(target);
        report.spawned = true;
    }

    report
}
