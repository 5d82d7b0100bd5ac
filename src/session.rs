//! Per-frame glue from the mailbox through the transforms into the sim
//!
//! A session is one connection to the estimation server: calibration arrives
//! in the init message, gaze samples accumulate in the mailbox, and each
//! rendering frame pulls the latest sample through the display transforms,
//! advances the sim, and (in record mode) turns a kill into a ground-truth
//! label message going the other way.

use glam::{DVec2, Vec2};

use crate::display::DisplayMap;
use crate::error::ConfigError;
use crate::mailbox::{GazeSample, Mailbox};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::settings::GameSettings;
use crate::sim::{Arena, GameState, TickInput, tick};

/// One connection's worth of state: calibration, mailbox, and the sim
#[derive(Debug, Clone)]
pub struct Session {
    arena: Arena,
    seed: u64,
    display: DisplayMap,
    mailbox: Mailbox,
    record_mode: bool,
    settings: Option<GameSettings>,
    state: Option<GameState>,
}

impl Session {
    /// Client-side knowns: canvas extent, full-display pixel size
    /// (height-first), and the canvas offset within the display.
    pub fn new(
        arena: Arena,
        screen_px: (f64, f64),
        viewport_offset: (f64, f64),
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut display = DisplayMap::new();
        display.set_screen_size(screen_px.0, screen_px.1)?;
        display.set_viewport_offset(viewport_offset.0, viewport_offset.1);

        Ok(Self {
            arena,
            seed,
            display,
            mailbox: Mailbox::new(),
            record_mode: false,
            settings: None,
            state: None,
        })
    }

    pub fn display(&self) -> &DisplayMap {
        &self.display
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    /// Gaze samples are flowing and frames advance the sim
    pub fn armed(&self) -> bool {
        self.mailbox.camera_armed.latest() == Some(&true)
    }

    /// End condition from the configured countdown
    pub fn finished(&self, elapsed_secs: u64) -> bool {
        match (&self.settings, &self.state) {
            (Some(settings), Some(state)) => {
                settings.countdown.finished(state.kills, elapsed_secs)
            }
            _ => false,
        }
    }

    /// Apply one inbound message; the init message may produce a reply
    pub fn receive(&mut self, msg: ServerMessage) -> Result<Option<ClientMessage>, ConfigError> {
        match msg {
            ServerMessage::ServerOn {
                topleft_offset,
                screen_size_cm,
                record_mode,
                game_settings,
            } => {
                self.display
                    .set_actual_size(screen_size_cm[0], screen_size_cm[1])?;
                self.display
                    .set_screen_origin(topleft_offset[0], topleft_offset[1]);

                self.record_mode = record_mode;
                self.state = Some(GameState::new(self.arena, &game_settings, self.seed));
                log::info!(
                    "session init: aiming={}, record_mode={record_mode}",
                    game_settings.aiming.as_str()
                );
                self.settings = Some(game_settings);

                Ok(Some(ClientMessage::OpenCam))
            }
            ServerMessage::CameraOn => {
                self.mailbox.camera_armed.post(true);
                Ok(None)
            }
            ServerMessage::CameraOff => {
                self.mailbox.camera_armed.post(false);
                Ok(None)
            }
            ServerMessage::NextReady {
                valid,
                gaze_x,
                gaze_y,
                tid,
            } => {
                self.mailbox.gaze.post(GazeSample {
                    valid,
                    x: gaze_x,
                    y: gaze_y,
                    tid,
                });
                Ok(None)
            }
        }
    }

    /// Advance one rendering frame.
    ///
    /// `window_shift` compensates for window movement since the viewport
    /// offset was captured. A kill in record mode yields the label message
    /// to send back; everything else yields None.
    pub fn frame(
        &mut self,
        window_shift: DVec2,
        key_held: bool,
        skip: bool,
    ) -> Result<Option<ClientMessage>, ConfigError> {
        if !self.armed() {
            return Ok(None);
        }
        let Some(state) = self.state.as_mut() else {
            return Ok(None);
        };

        let sample = self.mailbox.gaze.latest().copied();
        let aim = match sample {
            Some(s) if s.valid => {
                let screen = self.display.actual_to_screen(DVec2::new(s.x, s.y))?;
                let canvas = self.display.screen_to_canvas(screen, window_shift)?;
                Some(Vec2::new(canvas.x as f32, canvas.y as f32))
            }
            _ => None,
        };

        let input = TickInput {
            aim,
            key_held,
            skip,
        };
        let report = tick(state, &input);

        let (Some(killed), Some(sample)) = (report.killed, sample) else {
            return Ok(None);
        };
        if !self.record_mode {
            return Ok(None);
        }
        // One sample labels at most one kill
        if !self.mailbox.gaze.take_fresh() {
            return Ok(None);
        }

        // Pair the estimate that produced the kill with the target's true
        // position, both in actual space
        let canvas = DVec2::new(f64::from(killed.x), f64::from(killed.y));
        let screen = self.display.canvas_to_screen(canvas, window_shift)?;
        let label = self.display.screen_to_actual(screen)?;

        let (gaze_x, gaze_y) = if sample.valid {
            (sample.x, sample.y)
        } else {
            (0.0, 0.0)
        };

        log::info!("label recorded for tid={}", sample.tid);
        Ok(Some(ClientMessage::SaveGaze {
            tid: sample.tid,
            gaze_x,
            gaze_y,
            label_x: label.x,
            label_y: label.y,
        }))
    }

    /// Disarm and produce the camera shutdown request
    pub fn shutdown(&mut self, hard: bool) -> ClientMessage {
        self.mailbox.camera_armed.post(false);
        ClientMessage::KillCam { hard }
    }

    /// Forget per-connection state ahead of a reconnect; the client-side
    /// display frames survive
    pub fn disconnect(&mut self) {
        self.mailbox.gaze.clear();
        self.mailbox.camera_armed.clear();
        self.state = None;
        self.settings = None;
        self.record_mode = false;
    }
}
