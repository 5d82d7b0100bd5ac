//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One advance per rendering tick, no internal parallelism
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod aiming;
pub mod cannon;
pub mod effects;
pub mod target;
pub mod tick;

pub use aiming::{
    AimStatus, AimStrategy, AimTracker, LockEvent, LockVisual, NeighborTest, TrackingRecord,
};
pub use cannon::{Beam, Cannon};
pub use effects::{Burst, Fragment};
pub use target::{Arena, Emitter, GridScatter, QuadScatter, RectScatter, SpawnPattern, Target};
pub use tick::{GameState, TickInput, TickReport, tick};
