//! Aiming strategies and the target-lock state machine
//!
//! Confidence is an integer frame count `value`. Gaze proximity accumulates
//! in `[0, L]`; key hold accumulates in a doubled range `[0, 2L]` so that
//! momentum persists symmetrically across the full-confidence boundary.
//! `faith` is the ratio `value / L`.
//!
//! Kill is evaluated after the frame's confidence update, for every variant.
//! The release frame of a key hold therefore judges the post-decrement value.

use glam::Vec2;

use crate::bearing;
use crate::settings::{AimProfile, AimingKind, Difficulty};

/// Already-debounced per-frame input state fed to the strategies
#[derive(Debug, Clone, Copy, Default)]
pub struct AimStatus {
    /// Canvas-space gaze point passed the neighbor test against the target
    pub gaze_aimed: bool,
    /// The designated aim key is held this frame
    pub key_held: bool,
    /// Secondary input: abandon the current target without penalty
    pub skip: bool,
}

/// Per-frame state transition computed by a strategy
#[derive(Debug, Clone, Copy, Default)]
struct AimChange {
    skip: bool,
    init: bool,
    fail: bool,
    kill: bool,
    value: i32,
}

/// What the renderer should overlay on the active target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LockVisual {
    /// Tightening reticle; fully closed at `kill_faith`
    Gaze { faith: f32, kill_faith: f32 },
    /// Charge ring; centered when faith crosses 1.0
    Key { faith: f32 },
}

#[inline]
fn faith(value: i32, lock_delay: i32) -> f32 {
    value as f32 / lock_delay as f32
}

/// Fires while the gaze point stays close to the target
#[derive(Debug, Clone, Copy)]
pub struct GazeProximity {
    profile: AimProfile,
}

impl GazeProximity {
    pub fn new(profile: AimProfile) -> Self {
        Self { profile }
    }

    fn update(&self, status: &AimStatus, tracked: bool, value: i32) -> AimChange {
        let delay = self.profile.lock_delay;
        let next = (value + if status.gaze_aimed { 1 } else { -1 }).clamp(0, delay);

        AimChange {
            skip: status.skip,
            init: !tracked && status.gaze_aimed,
            fail: tracked && next == 0,
            kill: tracked && faith(next, delay) >= self.profile.kill_faith,
            value: next,
        }
    }

    fn on_target(&self, tracked: bool, value: i32) -> bool {
        tracked && faith(value, self.profile.lock_delay) >= self.profile.save_faith
    }

    fn cannon_update(&self, status: &AimStatus) -> bool {
        status.gaze_aimed
    }

    fn visual(&self, value: i32) -> LockVisual {
        LockVisual::Gaze {
            faith: faith(value, self.profile.lock_delay),
            kill_faith: self.profile.kill_faith,
        }
    }
}

/// Fires while the aim key is held, independent of proximity.
///
/// Confidence wraps modulo `2L` instead of clamping at `L`; release is the
/// kill-evaluation instant, with the kill band and the save band both
/// symmetric around full confidence.
#[derive(Debug, Clone, Copy)]
pub struct KeyHold {
    profile: AimProfile,
}

impl KeyHold {
    pub fn new(profile: AimProfile) -> Self {
        Self { profile }
    }

    fn update(&self, status: &AimStatus, tracked: bool, value: i32) -> AimChange {
        let delay = self.profile.lock_delay;
        let next = ((value + if status.key_held { 1 } else { -1 }) % (2 * delay)).clamp(0, 2 * delay);

        let released = tracked && !status.key_held;
        let f = faith(next, delay);

        AimChange {
            skip: status.skip,
            init: !tracked && status.key_held,
            fail: released,
            kill: released && f >= self.profile.kill_faith && f <= 2.0 - self.profile.kill_faith,
            value: next,
        }
    }

    fn on_target(&self, tracked: bool, value: i32) -> bool {
        let f = faith(value, self.profile.lock_delay);
        tracked && f >= self.profile.save_faith && f <= 2.0 - self.profile.save_faith
    }

    fn cannon_update(&self, status: &AimStatus) -> bool {
        status.key_held
    }

    fn visual(&self, value: i32) -> LockVisual {
        LockVisual::Key {
            faith: faith(value, self.profile.lock_delay),
        }
    }
}

/// One of the two base strategies, as held by [`Combined`]
#[derive(Debug, Clone, Copy)]
enum BaseAim {
    Gaze(GazeProximity),
    Key(KeyHold),
}

impl BaseAim {
    fn update(&self, status: &AimStatus, tracked: bool, value: i32) -> AimChange {
        match self {
            BaseAim::Gaze(s) => s.update(status, tracked, value),
            BaseAim::Key(s) => s.update(status, tracked, value),
        }
    }

    fn on_target(&self, tracked: bool, value: i32) -> bool {
        match self {
            BaseAim::Gaze(s) => s.on_target(tracked, value),
            BaseAim::Key(s) => s.on_target(tracked, value),
        }
    }

    fn cannon_update(&self, status: &AimStatus) -> bool {
        match self {
            BaseAim::Gaze(s) => s.cannon_update(status),
            BaseAim::Key(s) => s.cannon_update(status),
        }
    }

    fn visual(&self, value: i32) -> LockVisual {
        match self {
            BaseAim::Gaze(s) => s.visual(value),
            BaseAim::Key(s) => s.visual(value),
        }
    }

    fn kind(&self) -> AimingKind {
        match self {
            BaseAim::Gaze(_) => AimingKind::Gaze,
            BaseAim::Key(_) => AimingKind::Key,
        }
    }
}

/// Delegates to one base strategy, chosen frame by frame.
///
/// Key input always takes precedence: a key press preempts an active gaze
/// lock by constructing a fresh [`KeyHold`] (confidence resets); an active
/// key lock is never preempted by gaze. Owns its confidence internally and
/// reports 0 to the outer tracking record.
#[derive(Debug, Clone, Copy)]
pub struct Combined {
    gaze_profile: AimProfile,
    key_profile: AimProfile,
    active: Option<BaseAim>,
    value: i32,
}

impl Combined {
    pub fn new(gaze_profile: AimProfile, key_profile: AimProfile) -> Self {
        Self {
            gaze_profile,
            key_profile,
            active: None,
            value: 0,
        }
    }

    /// Which base strategy currently drives the lock, if any
    pub fn active_kind(&self) -> Option<AimingKind> {
        self.active.as_ref().map(BaseAim::kind)
    }

    fn select(&mut self, status: &AimStatus) {
        let fresh = match &self.active {
            None => {
                if status.key_held {
                    Some(BaseAim::Key(KeyHold::new(self.key_profile)))
                } else if status.gaze_aimed {
                    Some(BaseAim::Gaze(GazeProximity::new(self.gaze_profile)))
                } else {
                    None
                }
            }
            Some(BaseAim::Gaze(_)) if status.key_held => {
                Some(BaseAim::Key(KeyHold::new(self.key_profile)))
            }
            Some(_) => None,
        };

        if let Some(strategy) = fresh {
            self.active = Some(strategy);
            self.value = 0;
        }
    }

    fn update(&mut self, status: &AimStatus, tracked: bool) -> AimChange {
        self.select(status);

        let Some(active) = &self.active else {
            return AimChange::default();
        };

        let change = active.update(status, tracked, self.value);
        if change.skip || change.kill || change.fail {
            self.active = None;
            self.value = 0;
        } else {
            self.value = change.value;
        }

        // The outer record never carries the delegated confidence
        AimChange { value: 0, ..change }
    }

    fn on_target(&self, tracked: bool) -> bool {
        self.active
            .as_ref()
            .is_some_and(|s| s.on_target(tracked, self.value))
    }

    fn cannon_update(&self, status: &AimStatus) -> bool {
        self.active.as_ref().is_some_and(|s| s.cannon_update(status))
    }

    fn visual(&self) -> Option<LockVisual> {
        self.active.as_ref().map(|s| s.visual(self.value))
    }
}

/// Closed set of aiming strategies, selected per input-capability config
#[derive(Debug, Clone)]
pub enum AimStrategy {
    Gaze(GazeProximity),
    Key(KeyHold),
    Combined(Combined),
}

impl AimStrategy {
    pub fn new(kind: AimingKind, difficulty: &Difficulty) -> Self {
        match kind {
            AimingKind::Gaze => AimStrategy::Gaze(GazeProximity::new(difficulty.gaze)),
            AimingKind::Key => AimStrategy::Key(KeyHold::new(difficulty.key)),
            AimingKind::KeyGaze => {
                AimStrategy::Combined(Combined::new(difficulty.gaze, difficulty.key))
            }
        }
    }

    fn update(&mut self, status: &AimStatus, tracked: bool, value: i32) -> AimChange {
        match self {
            AimStrategy::Gaze(s) => s.update(status, tracked, value),
            AimStrategy::Key(s) => s.update(status, tracked, value),
            AimStrategy::Combined(s) => s.update(status, tracked),
        }
    }

    fn on_target(&self, tracked: bool, value: i32) -> bool {
        match self {
            AimStrategy::Gaze(s) => s.on_target(tracked, value),
            AimStrategy::Key(s) => s.on_target(tracked, value),
            AimStrategy::Combined(s) => s.on_target(tracked),
        }
    }

    fn cannon_update(&self, status: &AimStatus) -> bool {
        match self {
            AimStrategy::Gaze(s) => s.cannon_update(status),
            AimStrategy::Key(s) => s.cannon_update(status),
            AimStrategy::Combined(s) => s.cannon_update(status),
        }
    }

    fn visual(&self, value: i32) -> Option<LockVisual> {
        match self {
            AimStrategy::Gaze(s) => Some(s.visual(value)),
            AimStrategy::Key(s) => Some(s.visual(value)),
            AimStrategy::Combined(s) => s.visual(),
        }
    }
}

/// Proximity-or-angle test shared by in-game hit detection and spawn
/// avoidance
#[derive(Debug, Clone, Copy)]
pub struct NeighborTest {
    /// Firing origin the angular sector is measured from
    pub origin: Vec2,
    /// Euclidean radius in canvas pixels
    pub range: f32,
    /// Angular sector half-width in radians
    pub angle: f32,
}

impl NeighborTest {
    pub fn new(origin: Vec2, range: f32, angle: f32) -> Self {
        Self {
            origin,
            range,
            angle,
        }
    }

    /// Either condition counts: distance below `range`, or bearing
    /// separation below `widen * angle`
    pub fn hit(&self, target: Vec2, probe: Vec2, widen: f32) -> bool {
        if target.distance(probe) < self.range {
            return true;
        }

        let target_bearing = bearing(target, self.origin);
        let probe_bearing = bearing(probe, self.origin);
        (probe_bearing - target_bearing).abs() < widen * self.angle
    }
}

/// One `{tracked, confidence}` record
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackingRecord {
    pub tracked: bool,
    pub value: i32,
}

/// Outcome of one tracker frame; exactly one per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEvent {
    /// Secondary input abandoned the target (reset, no kill)
    Skip,
    /// Aim condition newly true; tracking started
    Init,
    /// Lock completed; the caller destroys the target (reset)
    Kill,
    /// Lock abandoned: confidence exhausted or key released outside the
    /// kill band (reset, no kill)
    Drop,
    /// Tracking continues with an updated confidence
    Update,
}

/// Owns one tracking record and one strategy; runs the lock state machine
#[derive(Debug, Clone)]
pub struct AimTracker {
    strategy: AimStrategy,
    record: TrackingRecord,
}

impl AimTracker {
    pub fn new(strategy: AimStrategy) -> Self {
        Self {
            strategy,
            record: TrackingRecord::default(),
        }
    }

    pub fn record(&self) -> &TrackingRecord {
        &self.record
    }

    pub fn strategy(&self) -> &AimStrategy {
        &self.strategy
    }

    /// Advance the lock state machine by one frame
    pub fn update(&mut self, status: &AimStatus) -> LockEvent {
        let change = self
            .strategy
            .update(status, self.record.tracked, self.record.value);

        if change.skip {
            self.reset();
            LockEvent::Skip
        } else if change.init {
            self.record.tracked = true;
            self.record.value = change.value;
            LockEvent::Init
        } else if change.kill {
            // A key release can satisfy both kill and drop; kill wins and is
            // the only event that triggers destruction
            self.reset();
            LockEvent::Kill
        } else if change.fail {
            self.reset();
            LockEvent::Drop
        } else {
            self.record.value = change.value;
            LockEvent::Update
        }
    }

    /// Whether the current state qualifies to record an aim-label
    pub fn on_target(&self) -> bool {
        self.strategy.on_target(self.record.tracked, self.record.value)
    }

    /// Whether the firing origin should snap-track the target this frame
    pub fn cannon_update(&self, status: &AimStatus) -> bool {
        self.record.tracked && self.strategy.cannon_update(status)
    }

    /// Overlay descriptor for the renderer; None while untracked
    pub fn visual(&self) -> Option<LockVisual> {
        if !self.record.tracked {
            return None;
        }
        self.strategy.visual(self.record.value)
    }

    fn reset(&mut self) {
        self.record = TrackingRecord::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Difficulty;
    use proptest::prelude::*;

    fn gaze_tracker() -> AimTracker {
        AimTracker::new(AimStrategy::new(AimingKind::Gaze, &Difficulty::default()))
    }

    fn key_tracker() -> AimTracker {
        AimTracker::new(AimStrategy::new(AimingKind::Key, &Difficulty::default()))
    }

    fn combined_tracker() -> AimTracker {
        AimTracker::new(AimStrategy::new(AimingKind::KeyGaze, &Difficulty::default()))
    }

    const AIMED: AimStatus = AimStatus {
        gaze_aimed: true,
        key_held: false,
        skip: false,
    };
    const HELD: AimStatus = AimStatus {
        gaze_aimed: false,
        key_held: true,
        skip: false,
    };
    const IDLE: AimStatus = AimStatus {
        gaze_aimed: false,
        key_held: false,
        skip: false,
    };

    #[test]
    fn test_gaze_lock_scenario() {
        // L=120, save 0.20, kill 0.90: 25 aimed frames reach the save
        // threshold, 108 total reach the kill threshold
        let mut tracker = gaze_tracker();

        for _ in 0..25 {
            let event = tracker.update(&AIMED);
            assert_ne!(event, LockEvent::Kill);
        }
        assert!(tracker.record().tracked);
        assert_eq!(tracker.record().value, 25);
        assert!(tracker.on_target()); // 25/120 >= 0.20

        let mut kill_frame = None;
        for frame in 26..=120 {
            if tracker.update(&AIMED) == LockEvent::Kill {
                kill_frame = Some(frame);
                break;
            }
        }
        assert_eq!(kill_frame, Some(108)); // 108/120 == 0.90
        // Kill resets the record; no second kill from the same episode
        assert_eq!(*tracker.record(), TrackingRecord::default());
    }

    #[test]
    fn test_gaze_confidence_exhaustion_drops() {
        let mut tracker = gaze_tracker();
        for _ in 0..10 {
            tracker.update(&AIMED);
        }
        assert!(tracker.record().tracked);

        let mut last = LockEvent::Update;
        for _ in 0..10 {
            last = tracker.update(&IDLE);
        }
        assert_eq!(last, LockEvent::Drop);
        assert!(!tracker.record().tracked);
        assert_eq!(tracker.record().value, 0);
    }

    #[test]
    fn test_gaze_save_threshold_not_reached() {
        let mut tracker = gaze_tracker();
        for _ in 0..20 {
            tracker.update(&AIMED);
        }
        // 20/120 < 0.20
        assert!(!tracker.on_target());
    }

    #[test]
    fn test_key_release_below_band_drops() {
        // Hold 50 frames then release: 49/120 is outside [0.90, 1.10]
        let mut tracker = key_tracker();
        for _ in 0..50 {
            tracker.update(&HELD);
        }
        assert_eq!(tracker.record().value, 50);

        let event = tracker.update(&IDLE);
        assert_eq!(event, LockEvent::Drop);
        assert!(!tracker.record().tracked);
    }

    #[test]
    fn test_key_release_inside_band_kills() {
        let mut tracker = key_tracker();
        for _ in 0..120 {
            tracker.update(&HELD);
        }

        // 119/120 lies within [0.90, 1.10]
        assert_eq!(tracker.update(&IDLE), LockEvent::Kill);
        assert_eq!(*tracker.record(), TrackingRecord::default());
    }

    #[test]
    fn test_key_overshoot_past_band_drops() {
        // Hold far past the symmetric band: 2 - 0.90 = 1.10, so anything
        // above 132 frames of accumulated confidence is an overshoot
        let mut tracker = key_tracker();
        for _ in 0..150 {
            tracker.update(&HELD);
        }
        assert_eq!(tracker.update(&IDLE), LockEvent::Drop);
    }

    #[test]
    fn test_key_on_target_band_is_symmetric() {
        let mut tracker = key_tracker();
        for _ in 0..47 {
            tracker.update(&HELD);
        }
        assert!(!tracker.on_target()); // 47/120 < 0.40

        tracker.update(&HELD);
        assert!(tracker.on_target()); // 48/120 = 0.40

        // Past the mirrored bound 2 - 0.40 = 1.60 (192 frames) it drops out
        for _ in 48..193 {
            tracker.update(&HELD);
        }
        assert_eq!(tracker.record().value, 193);
        assert!(!tracker.on_target());
    }

    #[test]
    fn test_skip_forces_drop_without_kill() {
        let skip_while_aimed = AimStatus {
            gaze_aimed: true,
            key_held: false,
            skip: true,
        };

        let mut tracker = gaze_tracker();
        for _ in 0..100 {
            tracker.update(&AIMED);
        }
        assert_eq!(tracker.update(&skip_while_aimed), LockEvent::Skip);
        assert_eq!(*tracker.record(), TrackingRecord::default());
    }

    #[test]
    fn test_combined_key_precedence_on_first_frame() {
        let both = AimStatus {
            gaze_aimed: true,
            key_held: true,
            skip: false,
        };

        let mut tracker = combined_tracker();
        tracker.update(&both);

        let AimStrategy::Combined(combined) = tracker.strategy() else {
            panic!("expected combined strategy");
        };
        assert_eq!(combined.active_kind(), Some(AimingKind::Key));
    }

    #[test]
    fn test_combined_key_press_preempts_gaze() {
        let mut tracker = combined_tracker();
        for _ in 0..40 {
            tracker.update(&AIMED);
        }

        let AimStrategy::Combined(combined) = tracker.strategy() else {
            panic!("expected combined strategy");
        };
        assert_eq!(combined.active_kind(), Some(AimingKind::Gaze));

        // Key press switches the sub-strategy and resets its confidence
        tracker.update(&HELD);
        let AimStrategy::Combined(combined) = tracker.strategy() else {
            panic!("expected combined strategy");
        };
        assert_eq!(combined.active_kind(), Some(AimingKind::Key));
        assert!(!tracker.on_target());
    }

    #[test]
    fn test_combined_key_never_preempted() {
        let both = AimStatus {
            gaze_aimed: true,
            key_held: true,
            skip: false,
        };

        let mut tracker = combined_tracker();
        for _ in 0..30 {
            tracker.update(&both);
        }

        let AimStrategy::Combined(combined) = tracker.strategy() else {
            panic!("expected combined strategy");
        };
        assert_eq!(combined.active_kind(), Some(AimingKind::Key));
    }

    #[test]
    fn test_combined_record_confidence_stays_zero() {
        let mut tracker = combined_tracker();
        for _ in 0..30 {
            tracker.update(&HELD);
        }
        assert!(tracker.record().tracked);
        assert_eq!(tracker.record().value, 0);
        // Delegated confidence still drives the save threshold
        for _ in 0..30 {
            tracker.update(&HELD);
        }
        assert!(tracker.on_target());
    }

    #[test]
    fn test_visual_gated_on_tracking() {
        let mut tracker = gaze_tracker();
        assert_eq!(tracker.visual(), None);

        for _ in 0..10 {
            tracker.update(&AIMED);
        }
        match tracker.visual() {
            Some(LockVisual::Gaze { faith, kill_faith }) => {
                assert!((faith - 10.0 / 120.0).abs() < 1e-6);
                assert!((kill_faith - 0.90).abs() < 1e-6);
            }
            other => panic!("unexpected visual: {other:?}"),
        }
    }

    #[test]
    fn test_cannon_update_requires_tracking() {
        let mut tracker = key_tracker();
        assert!(!tracker.cannon_update(&HELD));

        tracker.update(&HELD);
        assert!(tracker.cannon_update(&HELD));
        assert!(!tracker.cannon_update(&IDLE));
    }

    #[test]
    fn test_neighbor_test_distance_or_sector() {
        let judge = NeighborTest::new(Vec2::new(400.0, 0.0), 60.0, 0.1);
        let target = Vec2::new(400.0, 300.0);

        // Close by distance
        assert!(judge.hit(target, Vec2::new(430.0, 280.0), 1.0));
        // Far away but on the same bearing from the origin
        assert!(judge.hit(target, Vec2::new(400.0, 600.0), 1.0));
        // Far and well off the bearing
        assert!(!judge.hit(target, Vec2::new(700.0, 50.0), 1.0));
    }

    #[test]
    fn test_neighbor_test_widening() {
        let judge = NeighborTest::new(Vec2::ZERO, 10.0, 0.1);
        let target = Vec2::new(500.0, 0.0);
        // ~0.15 rad off-bearing: outside the 1x sector, inside the 2x sector
        let probe = Vec2::new(500.0, 76.0);

        assert!(!judge.hit(target, probe, 1.0));
        assert!(judge.hit(target, probe, 2.0));
    }

    proptest! {
        #[test]
        fn prop_gaze_confidence_bounded(frames in proptest::collection::vec(any::<bool>(), 0..600)) {
            let mut tracker = gaze_tracker();
            for aimed in frames {
                let status = AimStatus { gaze_aimed: aimed, ..Default::default() };
                tracker.update(&status);
                prop_assert!((0..=120).contains(&tracker.record().value));
            }
        }

        #[test]
        fn prop_key_confidence_bounded(frames in proptest::collection::vec(any::<bool>(), 0..600)) {
            let mut tracker = key_tracker();
            for held in frames {
                let status = AimStatus { key_held: held, ..Default::default() };
                tracker.update(&status);
                prop_assert!((0..=240).contains(&tracker.record().value));
            }
        }

        #[test]
        fn prop_gaze_kill_only_while_tracked(frames in proptest::collection::vec(any::<bool>(), 0..600)) {
            let mut tracker = gaze_tracker();
            for aimed in frames {
                let tracked_before = tracker.record().tracked;
                let status = AimStatus { gaze_aimed: aimed, ..Default::default() };
                if tracker.update(&status) == LockEvent::Kill {
                    prop_assert!(tracked_before);
                }
            }
        }
    }
}
