//! Wire message shapes
//!
//! The transport collaborator delivers already-validated JSON; the core only
//! cares about these shapes. Inbound messages are tagged by `status`,
//! outbound by `opcode`, matching the estimation server's framing.

use serde::{Deserialize, Serialize};

use crate::settings::GameSettings;

/// Messages arriving from the estimation server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Session init: calibration frames plus gameplay configuration.
    /// Must be applied before any transform call.
    #[serde(rename_all = "camelCase")]
    ServerOn {
        /// Actual-space offset of the screen's physical origin (x, y)
        topleft_offset: [f64; 2],
        /// Physical display size, height-first, in centimeters
        screen_size_cm: [f64; 2],
        record_mode: bool,
        game_settings: GameSettings,
    },
    /// Camera armed: gaze samples will start flowing
    CameraOn,
    /// Camera disarmed: the playable state is over
    CameraOff,
    /// One gaze sample is ready; `valid == false` suppresses use of x/y
    NextReady {
        valid: bool,
        gaze_x: f64,
        gaze_y: f64,
        /// Frame/target id pairing this sample with its eventual label
        tid: u64,
    },
}

/// Messages emitted toward the estimation server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "opcode", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Request camera arming
    OpenCam,
    /// Request camera disarming; `hard` on abrupt page close
    KillCam { hard: bool },
    /// Ask the server process to exit
    KillServer,
    /// Ground-truth label paired with the gaze estimate that produced a kill
    SaveGaze {
        tid: u64,
        /// Gaze estimate in actual space; 0 when the sample was invalid
        gaze_x: f64,
        gaze_y: f64,
        /// Killed target's position transformed back into actual space
        label_x: f64,
        label_y: f64,
    },
}

impl ServerMessage {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
