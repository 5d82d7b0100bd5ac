//! Game configuration
//!
//! Delivered by the transport inside the session-init message; everything
//! here deserializes straight off the wire. Tunable difficulty values carry
//! defaults matching the calibrated demo build.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which aiming strategy drives the target lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AimingKind {
    /// Lock by gaze proximity alone
    #[serde(rename = "pog")]
    Gaze,
    /// Lock by holding the aim key
    #[serde(rename = "key")]
    Key,
    /// Both, with key input taking precedence
    #[default]
    #[serde(rename = "key+pog")]
    KeyGaze,
}

impl AimingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AimingKind::Gaze => "pog",
            AimingKind::Key => "key",
            AimingKind::KeyGaze => "key+pog",
        }
    }

    /// Parse a configuration identifier; unknown ids are a configuration error
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "pog" => Ok(AimingKind::Gaze),
            "key" => Ok(AimingKind::Key),
            "key+pog" => Ok(AimingKind::KeyGaze),
            other => Err(ConfigError::UnknownAiming(other.to_string())),
        }
    }
}

/// Which spawn-pattern generator feeds the emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum EmitterKind {
    /// Quadratic-band scatter tuned for the demo arena
    #[default]
    Demo,
    /// Uniform rectangle scatter
    Rect,
    /// Shuffled grid, cycled until exhausted
    Grid { rows: u32, cols: u32 },
}

impl EmitterKind {
    /// Parse a plain identifier; `grid` gets a default layout
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s {
            "demo" => Ok(EmitterKind::Demo),
            "rect" => Ok(EmitterKind::Rect),
            "grid" => Ok(EmitterKind::Grid { rows: 4, cols: 6 }),
            other => Err(ConfigError::UnknownEmitter(other.to_string())),
        }
    }
}

/// Session end condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "countdown", rename_all = "lowercase")]
pub enum Countdown {
    /// Fixed play time in seconds
    Seconds { value: u64 },
    /// Fixed number of kills
    Targets { value: u32 },
}

impl Countdown {
    /// Remaining budget given the current score and elapsed play time
    pub fn remaining(&self, kills: u32, elapsed_secs: u64) -> u64 {
        match *self {
            Countdown::Seconds { value } => value.saturating_sub(elapsed_secs),
            Countdown::Targets { value } => u64::from(value.saturating_sub(kills)),
        }
    }

    pub fn finished(&self, kills: u32, elapsed_secs: u64) -> bool {
        self.remaining(kills, elapsed_secs) == 0
    }
}

/// Lock-confidence profile for one aiming strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimProfile {
    /// Frames of continuous aim to reach full confidence (L)
    pub lock_delay: i32,
    /// Confidence ratio at which the target becomes a recordable aim-label
    pub save_faith: f32,
    /// Confidence ratio at which the target is destroyed
    pub kill_faith: f32,
}

/// Tunable difficulty values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    /// Neighbor-test radius in canvas pixels
    pub neighbor_range: f32,
    /// Neighbor-test angular sector in radians (as seen from the cannon)
    pub neighbor_angle: f32,

    /// Gaze-proximity lock profile
    pub gaze: AimProfile,
    /// Key-hold lock profile
    pub key: AimProfile,

    /// Fraction of the remaining bearing delta applied per frame
    pub cannon_step: f32,

    /// Bernoulli spawn probability per idle frame
    pub spawn_probability: f32,
    /// Candidate positions tried per successful spawn trial
    pub spawn_max_trials: u32,

    /// Explosion fragment count bounds
    pub burst_min: u32,
    pub burst_max: u32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            neighbor_range: 60.0,
            neighbor_angle: std::f32::consts::FRAC_PI_2 / 10.0,

            gaze: AimProfile {
                lock_delay: 120,
                save_faith: 0.20,
                kill_faith: 0.90,
            },
            key: AimProfile {
                lock_delay: 120,
                save_faith: 0.40,
                kill_faith: 0.90,
            },

            cannon_step: 0.05,

            spawn_probability: 0.2,
            spawn_max_trials: 4,

            burst_min: 28,
            burst_max: 42,
        }
    }
}

/// Everything the session-init message configures about gameplay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub aiming: AimingKind,
    #[serde(default)]
    pub emitter: EmitterKind,
    #[serde(flatten)]
    pub countdown: Countdown,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            aiming: AimingKind::KeyGaze,
            emitter: EmitterKind::Demo,
            countdown: Countdown::Targets { value: 20 },
            difficulty: Difficulty::default(),
        }
    }
}
