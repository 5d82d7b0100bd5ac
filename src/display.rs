//! Coordinate transforms between the three display spaces
//!
//! - actual space: physical units on the calibrated display (cm), Y up
//! - screen space: physical pixels of the full display, Y down
//! - canvas space: logical pixels inside the viewport, offset from screen
//!   space by the viewport offset plus any window movement since capture
//!
//! All transforms are pure and exact inverses of each other. Calling any of
//! them before the relevant frames are set is a configuration error, never a
//! silent zero.

use glam::DVec2;

use crate::error::ConfigError;

/// A physical extent, stored height-first the way the calibration messages
/// deliver it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub height: f64,
    pub width: f64,
}

impl Extent {
    pub fn new(height: f64, width: f64) -> Self {
        Self { height, width }
    }
}

/// Mapping between actual, screen and canvas coordinate spaces.
///
/// The four frames are set once per session (and only re-set on reconnect):
/// the physical size of the display, its pixel size, the actual-space offset
/// of the screen's physical origin, and the canvas-to-screen pixel offset.
#[derive(Debug, Clone, Default)]
pub struct DisplayMap {
    actual_size: Option<Extent>,
    screen_size: Option<Extent>,
    screen_origin: Option<DVec2>,
    viewport_offset: Option<DVec2>,
}

impl DisplayMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once every frame needed by the actual<->screen transforms is set
    pub fn calibrated(&self) -> bool {
        self.actual_size.is_some() && self.screen_size.is_some() && self.screen_origin.is_some()
    }

    pub fn set_actual_size(&mut self, height: f64, width: f64) -> Result<(), ConfigError> {
        self.actual_size = Some(checked_extent("actual", height, width)?);
        Ok(())
    }

    pub fn set_screen_size(&mut self, height: f64, width: f64) -> Result<(), ConfigError> {
        self.screen_size = Some(checked_extent("screen", height, width)?);
        Ok(())
    }

    pub fn set_screen_origin(&mut self, x: f64, y: f64) {
        self.screen_origin = Some(DVec2::new(x, y));
    }

    pub fn set_viewport_offset(&mut self, x: f64, y: f64) {
        self.viewport_offset = Some(DVec2::new(x, y));
    }

    /// Actual space -> screen space.
    ///
    /// Translate by the screen origin, flip the vertical axis (actual Y
    /// increases upward, screen Y downward), then scale per axis by
    /// `screen_size / actual_size`.
    pub fn actual_to_screen(&self, point: DVec2) -> Result<DVec2, ConfigError> {
        let origin = self.screen_origin()?;
        let actual = self.actual_size()?;
        let screen = self.screen_size()?;

        let tx = point.x - origin.x;
        let ty = -point.y + origin.y;

        Ok(DVec2::new(
            screen.width * tx / actual.width,
            screen.height * ty / actual.height,
        ))
    }

    /// Screen space -> actual space (exact inverse of [`Self::actual_to_screen`])
    pub fn screen_to_actual(&self, point: DVec2) -> Result<DVec2, ConfigError> {
        let origin = self.screen_origin()?;
        let actual = self.actual_size()?;
        let screen = self.screen_size()?;

        let tx = actual.width * point.x / screen.width;
        let ty = actual.height * point.y / screen.height;

        Ok(DVec2::new(tx + origin.x, -ty + origin.y))
    }

    /// Screen space -> canvas space.
    ///
    /// `shift` compensates for window movement since the viewport offset was
    /// captured.
    pub fn screen_to_canvas(&self, point: DVec2, shift: DVec2) -> Result<DVec2, ConfigError> {
        let offset = self.viewport_offset()?;
        Ok(point - offset - shift)
    }

    /// Canvas space -> screen space (exact inverse of [`Self::screen_to_canvas`])
    pub fn canvas_to_screen(&self, point: DVec2, shift: DVec2) -> Result<DVec2, ConfigError> {
        let offset = self.viewport_offset()?;
        Ok(point + offset + shift)
    }

    fn actual_size(&self) -> Result<Extent, ConfigError> {
        self.actual_size.ok_or(ConfigError::FrameUnset("actual-size"))
    }

    fn screen_size(&self) -> Result<Extent, ConfigError> {
        self.screen_size.ok_or(ConfigError::FrameUnset("screen-size"))
    }

    fn screen_origin(&self) -> Result<DVec2, ConfigError> {
        self.screen_origin
            .ok_or(ConfigError::FrameUnset("screen-origin"))
    }

    fn viewport_offset(&self) -> Result<DVec2, ConfigError> {
        self.viewport_offset
            .ok_or(ConfigError::FrameUnset("viewport-offset"))
    }
}

fn checked_extent(name: &'static str, height: f64, width: f64) -> Result<Extent, ConfigError> {
    if height <= 0.0 || width <= 0.0 {
        return Err(ConfigError::DegenerateSize {
            name,
            height,
            width,
        });
    }
    Ok(Extent::new(height, width))
}
