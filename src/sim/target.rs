//! Targets and spawn placement
//!
//! A target enters from below the bottom edge and runs a short scripted
//! motion (a handful of interpolation steps toward its end position, then
//! rest). Spawn positions come from a pluggable pattern generator; the
//! emitter retries a bounded number of candidates to avoid re-occupying the
//! previous corpse position.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::aiming::NeighborTest;
use crate::consts::{
    CORPSE_WIDEN, SPAWN_DROP_MAX, SPAWN_DROP_MIN, TARGET_MAX_STEPS, TARGET_MIN_STEPS,
};
use crate::settings::EmitterKind;

/// Canvas extent targets are placed within
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

/// The single active enemy
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub pos: Vec2,
    /// Scripted-motion end position (X never changes)
    pub end: Vec2,
    /// Visual tilt in radians
    pub heading: f32,
    steps_left: u32,
    step_y: f32,
    step_heading: f32,
}

impl Target {
    pub fn new(start: Vec2, end: Vec2, rng: &mut impl Rng) -> Self {
        let heading = 0.2 * std::f32::consts::FRAC_PI_2 * (rng.random::<f32>() - 0.5);
        let end_heading = 0.1 * std::f32::consts::FRAC_PI_2 * (rng.random::<f32>() - 0.5);
        let steps = rng.random_range(TARGET_MIN_STEPS..=TARGET_MAX_STEPS);

        Self {
            pos: start,
            end,
            heading,
            steps_left: steps,
            step_y: (end.y - start.y) / steps as f32,
            step_heading: (end_heading - heading) / steps as f32,
        }
    }

    /// One scripted-motion step; no-op once at rest
    pub fn advance(&mut self) {
        if self.steps_left > 0 {
            self.steps_left -= 1;
            self.pos.y += self.step_y;
            self.heading += self.step_heading;
        }
    }

    pub fn at_rest(&self) -> bool {
        self.steps_left == 0
    }
}

/// Uniform scatter inside a padded rectangle
#[derive(Debug, Clone)]
pub struct RectScatter {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
    floor: f32,
}

impl RectScatter {
    pub fn new(arena: Arena, pad_top: f32, pad_left: f32, pad_bottom: f32, pad_right: f32) -> Self {
        Self {
            min_x: pad_left,
            max_x: arena.width - pad_right,
            min_y: pad_top,
            max_y: arena.height - pad_bottom,
            floor: arena.height,
        }
    }

    fn generate(&self, rng: &mut impl Rng) -> (Vec2, Vec2) {
        let x = self.min_x + (self.max_x - self.min_x) * rng.random::<f32>();
        let start_y = self.floor + rng.random_range(SPAWN_DROP_MIN..SPAWN_DROP_MAX);
        let end_y = self.min_y + (self.max_y - self.min_y) * rng.random::<f32>();

        (Vec2::new(x, start_y), Vec2::new(x, end_y))
    }
}

/// Scatter between a quadratic curve and the padded bottom edge:
/// `A x^2 + B x + C <= y <= height - pad_bottom`
#[derive(Debug, Clone)]
pub struct QuadScatter {
    coefs: [f32; 3],
    min_x: f32,
    max_x: f32,
    max_y: f32,
    floor: f32,
}

impl QuadScatter {
    pub fn new(
        arena: Arena,
        coefs: [f32; 3],
        pad_left: f32,
        pad_bottom: f32,
        pad_right: f32,
    ) -> Self {
        Self {
            coefs,
            min_x: pad_left,
            max_x: arena.width - pad_right,
            max_y: arena.height - pad_bottom,
            floor: arena.height,
        }
    }

    /// The calibrated demo curve: a shallow dome keeping targets clear of
    /// the cannon at the top center
    pub fn demo(arena: Arena) -> Self {
        let (w, h) = (arena.width, arena.height);
        let coefs = [-8.0 * h / (15.0 * w * w), 8.0 * h / (15.0 * w), 0.24 * h];
        Self::new(arena, coefs, 0.12 * w, 40.0, 0.12 * w)
    }

    fn curve(&self, x: f32) -> f32 {
        let [a, b, c] = self.coefs;
        a * x * x + b * x + c
    }

    fn generate(&self, rng: &mut impl Rng) -> (Vec2, Vec2) {
        let x = self.min_x + (self.max_x - self.min_x) * rng.random::<f32>();
        let min_y = self.curve(x);
        let start_y = self.floor + rng.random_range(SPAWN_DROP_MIN..SPAWN_DROP_MAX);
        let end_y = min_y + (self.max_y - min_y) * rng.random::<f32>();

        (Vec2::new(x, start_y), Vec2::new(x, end_y))
    }
}

/// Shuffled grid, cycled cell by cell; reshuffles once exhausted
#[derive(Debug, Clone)]
pub struct GridScatter {
    rows: u32,
    cols: u32,
    origin: Vec2,
    cell: Vec2,
    floor: f32,
    order: Vec<u32>,
    cursor: usize,
}

impl GridScatter {
    pub fn new(
        arena: Arena,
        rows: u32,
        cols: u32,
        pad_top: f32,
        pad_left: f32,
        pad_bottom: f32,
        pad_right: f32,
    ) -> Self {
        Self {
            rows,
            cols,
            origin: Vec2::new(pad_left, pad_top),
            cell: Vec2::new(
                (arena.width - pad_left - pad_right) / cols as f32,
                (arena.height - pad_top - pad_bottom) / rows as f32,
            ),
            floor: arena.height,
            order: Vec::new(),
            cursor: 0,
        }
    }

    fn refresh(&mut self, rng: &mut impl Rng) {
        self.order = (0..self.rows * self.cols).collect();
        self.order.shuffle(rng);
        self.cursor = 0;
    }

    fn generate(&mut self, rng: &mut impl Rng) -> (Vec2, Vec2) {
        if self.cursor >= self.order.len() {
            self.refresh(rng);
        }

        let index = self.order[self.cursor];
        self.cursor += 1;

        let col = index % self.cols;
        let row = index / self.cols;

        let x = self.origin.x + (col as f32 + rng.random::<f32>()) * self.cell.x;
        let start_y = self.floor + rng.random_range(SPAWN_DROP_MIN..SPAWN_DROP_MAX);
        let end_y = self.origin.y + (row as f32 + rng.random::<f32>()) * self.cell.y;

        (Vec2::new(x, start_y), Vec2::new(x, end_y))
    }
}

/// Pluggable position generator producing a start/end coordinate pair
#[derive(Debug, Clone)]
pub enum SpawnPattern {
    Rect(RectScatter),
    Quad(QuadScatter),
    Grid(GridScatter),
}

impl SpawnPattern {
    pub fn from_kind(kind: EmitterKind, arena: Arena) -> Self {
        match kind {
            EmitterKind::Demo => SpawnPattern::Quad(QuadScatter::demo(arena)),
            EmitterKind::Rect => SpawnPattern::Rect(RectScatter::new(
                arena,
                0.24 * arena.height,
                0.12 * arena.width,
                40.0,
                0.12 * arena.width,
            )),
            EmitterKind::Grid { rows, cols } => SpawnPattern::Grid(GridScatter::new(
                arena,
                rows,
                cols,
                0.24 * arena.height,
                0.12 * arena.width,
                40.0,
                0.12 * arena.width,
            )),
        }
    }

    fn generate(&mut self, rng: &mut impl Rng) -> (Vec2, Vec2) {
        match self {
            SpawnPattern::Rect(g) => g.generate(rng),
            SpawnPattern::Quad(g) => g.generate(rng),
            SpawnPattern::Grid(g) => g.generate(rng),
        }
    }
}

/// Chooses the next target's spawn position, biased away from the corpse
#[derive(Debug, Clone)]
pub struct Emitter {
    pattern: SpawnPattern,
}

impl Emitter {
    pub fn new(pattern: SpawnPattern) -> Self {
        Self { pattern }
    }

    /// One Bernoulli trial; on success, up to `max_trials` candidates are
    /// drawn and the first whose end position is not a neighbor of the
    /// corpse wins. Exhaustion is not an error - just no spawn this frame.
    pub fn spawn(
        &mut self,
        probability: f32,
        max_trials: u32,
        corpse: Option<Vec2>,
        judge: &NeighborTest,
        rng: &mut impl Rng,
    ) -> Option<Target> {
        if rng.random::<f32>() >= probability {
            return None;
        }

        for _ in 0..max_trials {
            let (start, end) = self.pattern.generate(rng);

            if let Some(corpse) = corpse {
                if judge.hit(corpse, end, CORPSE_WIDEN) {
                    continue;
                }
            }

            return Some(Target::new(start, end, rng));
        }

        log::debug!("spawn exhausted {max_trials} trials near corpse");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const ARENA: Arena = Arena {
        width: 1600.0,
        height: 900.0,
    };

    fn rng(seed: u64) -> Pcg32 {
        Pcg32::seed_from_u64(seed)
    }

    #[test]
    fn test_target_scripted_motion_reaches_end() {
        let mut rng = rng(7);
        let start = Vec2::new(300.0, 950.0);
        let end = Vec2::new(300.0, 400.0);
        let mut target = Target::new(start, end, &mut rng);

        for _ in 0..TARGET_MAX_STEPS {
            target.advance();
        }

        assert!(target.at_rest());
        assert!((target.pos.y - end.y).abs() < 1e-3);
        assert_eq!(target.pos.x, start.x);

        // Advancing at rest is a no-op
        let resting = target.pos;
        target.advance();
        assert_eq!(target.pos, resting);
    }

    #[test]
    fn test_rect_scatter_respects_pads() {
        let scatter = RectScatter::new(ARENA, 100.0, 50.0, 40.0, 50.0);
        let mut rng = rng(11);

        for _ in 0..200 {
            let (start, end) = scatter.generate(&mut rng);
            assert!(start.y > ARENA.height); // enters from below the edge
            assert!(start.y <= ARENA.height + SPAWN_DROP_MAX);
            assert_eq!(start.x, end.x);
            assert!((50.0..=1550.0).contains(&end.x));
            assert!((100.0..=860.0).contains(&end.y));
        }
    }

    #[test]
    fn test_quad_scatter_stays_below_curve() {
        let scatter = QuadScatter::demo(ARENA);
        let mut rng = rng(13);

        for _ in 0..200 {
            let (_, end) = scatter.generate(&mut rng);
            assert!(end.y >= scatter.curve(end.x) - 1e-3);
            assert!(end.y <= ARENA.height - 40.0);
        }
    }

    #[test]
    fn test_grid_scatter_cycles_every_cell() {
        let mut scatter = GridScatter::new(ARENA, 3, 4, 0.0, 0.0, 0.0, 0.0);
        let mut rng = rng(17);

        let mut cells: Vec<(u32, u32)> = (0..12)
            .map(|_| {
                let (_, end) = scatter.generate(&mut rng);
                (
                    (end.x / scatter.cell.x) as u32,
                    (end.y / scatter.cell.y) as u32,
                )
            })
            .collect();

        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), 12); // one visit per cell before reshuffle
    }

    #[test]
    fn test_spawn_bernoulli_gate() {
        let judge = NeighborTest::new(Vec2::new(800.0, -2.0), 60.0, 0.157);
        let mut emitter = Emitter::new(SpawnPattern::from_kind(EmitterKind::Rect, ARENA));
        let mut rng = rng(19);

        assert!(emitter.spawn(0.0, 4, None, &judge, &mut rng).is_none());
        assert!(emitter.spawn(1.0, 4, None, &judge, &mut rng).is_some());
    }

    #[test]
    fn test_spawn_never_lands_on_corpse() {
        // Rect scatter over the whole arena can produce candidates
        // arbitrarily close to the corpse; none may be returned
        let judge = NeighborTest::new(Vec2::new(800.0, -2.0), 60.0, 0.157);
        let corpse = Vec2::new(800.0, 450.0);
        let mut emitter = Emitter::new(SpawnPattern::Rect(RectScatter::new(
            ARENA, 0.0, 0.0, 0.0, 0.0,
        )));
        let mut rng = rng(23);

        let mut spawned = 0;
        for _ in 0..300 {
            if let Some(target) = emitter.spawn(1.0, 4, Some(corpse), &judge, &mut rng) {
                spawned += 1;
                assert!(!judge.hit(corpse, target.end, CORPSE_WIDEN));
            }
        }
        assert!(spawned > 0);
    }

    #[test]
    fn test_spawn_exhaustion_returns_none() {
        // A judge with an arena-sized radius rejects every candidate
        let judge = NeighborTest::new(Vec2::new(800.0, -2.0), 1e6, 0.157);
        let corpse = Vec2::new(800.0, 450.0);
        let mut emitter = Emitter::new(SpawnPattern::from_kind(EmitterKind::Rect, ARENA));
        let mut rng = rng(29);

        for _ in 0..50 {
            assert!(emitter.spawn(1.0, 4, Some(corpse), &judge, &mut rng).is_none());
        }
    }
}
