//! Destruction effects
//!
//! The core owns only the numeric side of an explosion: fragment kinematics
//! and lifespans. Shapes and colors belong to the rendering collaborator.

use glam::Vec2;
use rand::Rng;

/// One explosion fragment
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub pos: Vec2,
    pub heading: f32,
    pub scale: f32,
    step: Vec2,
    spin: f32,
    shrink: f32,
    lifespan: u32,
}

impl Fragment {
    fn new(origin: Vec2, rng: &mut impl Rng) -> Self {
        let lifespan = rng.random_range(6..=36);

        Self {
            pos: origin,
            heading: rng.random::<f32>() * std::f32::consts::TAU,
            scale: 1.0,
            step: Vec2::new(
                rng.random_range(-60.0..60.0) / lifespan as f32,
                rng.random_range(-60.0..60.0) / lifespan as f32,
            ),
            spin: 0.4 * std::f32::consts::FRAC_PI_2 * (rng.random::<f32>() - 0.5),
            shrink: rng.random_range(0.2..0.8) / lifespan as f32,
            lifespan,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lifespan > 0
    }

    fn advance(&mut self) {
        self.lifespan = self.lifespan.saturating_sub(1);
        self.pos += self.step;
        self.heading += self.spin;
        self.scale -= self.shrink;
    }
}

/// A scattering of fragments at a destroyed target's position
#[derive(Debug, Clone)]
pub struct Burst {
    fragments: Vec<Fragment>,
}

impl Burst {
    pub fn new(origin: Vec2, min_density: u32, max_density: u32, rng: &mut impl Rng) -> Self {
        let count = rng.random_range(min_density..=max_density);
        let fragments = (0..count).map(|_| Fragment::new(origin, rng)).collect();
        Self { fragments }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn is_alive(&self) -> bool {
        !self.fragments.is_empty()
    }

    /// Advance every fragment and discard the dead
    pub fn advance(&mut self) {
        for fragment in &mut self.fragments {
            fragment.advance();
        }
        self.fragments.retain(Fragment::is_alive);
    }
}
