//! Configuration errors
//!
//! These are programmer/deployment errors, not recoverable runtime
//! conditions: transforms must never silently default to zero, and unknown
//! strategy identifiers must fail at construction.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A coordinate transform was called before this frame was set
    #[error("display frame `{0}` is not set")]
    FrameUnset(&'static str),

    /// A size with a non-positive dimension would make scale factors degenerate
    #[error("degenerate {name} size: {height}x{width}")]
    DegenerateSize {
        name: &'static str,
        height: f64,
        width: f64,
    },

    /// Unknown aiming-strategy identifier at construction
    #[error("unknown aiming strategy `{0}`")]
    UnknownAiming(String),

    /// Unknown spawn-pattern identifier at construction
    #[error("unknown emitter `{0}`")]
    UnknownEmitter(String),
}
