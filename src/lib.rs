//! Gazelock - target-acquisition core for a gaze-controlled arcade shooter
//!
//! Core modules:
//! - `display`: coordinate transforms between actual/screen/canvas spaces
//! - `sim`: deterministic per-frame simulation (aiming, targets, cannon)
//! - `mailbox`: single-slot hand-off for asynchronously arriving messages
//! - `protocol`: wire message shapes consumed from / emitted to the transport
//! - `session`: per-frame glue from mailbox through transforms into the sim
//!
//! Rendering, raw input polling and the transport itself are external
//! collaborators; this crate only exposes the decision logic.

pub mod display;
pub mod error;
pub mod mailbox;
pub mod protocol;
pub mod session;
pub mod settings;
pub mod sim;

pub use display::DisplayMap;
pub use error::ConfigError;
pub use session::Session;
pub use settings::{Difficulty, GameSettings};

use glam::Vec2;

/// Fixed core constants (tunable values live in [`settings::Difficulty`])
pub mod consts {
    /// Frames a fired beam stays alive
    pub const BEAM_LIFESPAN: u32 = 2;

    /// Scripted-motion step bounds for a freshly spawned target
    pub const TARGET_MIN_STEPS: u32 = 4;
    pub const TARGET_MAX_STEPS: u32 = 8;

    /// Targets enter from just below the bottom edge, offset by this band
    pub const SPAWN_DROP_MIN: f32 = 40.0;
    pub const SPAWN_DROP_MAX: f32 = 60.0;

    /// Widening factor applied to the angular neighbor test when biasing
    /// spawns away from the previous corpse (harder than the in-game test)
    pub const CORPSE_WIDEN: f32 = 2.0;
}

/// Bearing of `point` as seen from `origin`, in radians.
///
/// Zero along +X, positive toward +Y, range [-π, π]. Points on the -X axis
/// resolve to +π. A zero-length offset yields 0.
#[inline]
pub fn bearing(point: Vec2, origin: Vec2) -> f32 {
    let d = point - origin;
    let len = d.length();
    if len == 0.0 {
        return 0.0;
    }

    let sign = if d.y != 0.0 {
        d.y.signum()
    } else {
        d.x.signum()
    };

    (d.x / len).clamp(-1.0, 1.0).acos() * sign
}

/// Wrap an accumulated angle back into (-2π, 2π)
#[inline]
pub fn wrap_full_turn(angle: f32) -> f32 {
    if angle.abs() >= std::f32::consts::TAU {
        angle - angle.signum() * std::f32::consts::TAU
    } else {
        angle
    }
}

/// Reduce an angular difference to the shorter rotational path
#[inline]
pub fn shortest_arc(delta: f32) -> f32 {
    if delta.abs() >= std::f32::consts::PI {
        delta - delta.signum() * std::f32::consts::TAU
    } else {
        delta
    }
}
