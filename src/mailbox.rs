//! Single-slot message hand-off between the transport and the frame loop
//!
//! Messages arrive asynchronously relative to the frame loop; the core reads
//! the latest value at the start of a frame and consumes one-shot freshness
//! flags at that single point. The design tolerates a fast client and a slow
//! server: a stale slot simply replays the previous value, and a
//! never-arriving sample leaves the target untracked indefinitely. There is
//! no parallel mutation, so no locking.

/// Latest value of one message kind plus a consumed-once freshness flag
#[derive(Debug, Clone, Default)]
pub struct Slot<T> {
    value: Option<T>,
    fresh: bool,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            fresh: false,
        }
    }

    /// Overwrite the slot and mark it fresh
    pub fn post(&mut self, value: T) {
        self.value = Some(value);
        self.fresh = true;
    }

    /// Peek at the latest value, fresh or not
    pub fn latest(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Consume the freshness flag; true at most once per posted value
    pub fn take_fresh(&mut self) -> bool {
        std::mem::take(&mut self.fresh)
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Drop the stored value entirely (reconnect)
    pub fn clear(&mut self) {
        self.value = None;
        self.fresh = false;
    }
}

/// One gaze sample in actual-space coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazeSample {
    pub valid: bool,
    pub x: f64,
    pub y: f64,
    /// Frame/target id pairing the sample with its eventual label
    pub tid: u64,
}

/// All slots the frame loop reads
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    pub gaze: Slot<GazeSample>,
    /// Camera armed/disarmed; true while samples are flowing
    pub camera_armed: Slot<bool>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }
}
