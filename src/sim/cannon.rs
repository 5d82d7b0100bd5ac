//! The firing point: bearing smoothing and in-flight beams
//!
//! The cannon never snaps to the aim point directly; each frame it rotates a
//! fixed fraction of the remaining bearing delta, always along the shorter
//! rotational path, wrapping at a full turn.

use glam::Vec2;

use crate::consts::BEAM_LIFESPAN;
use crate::{bearing, shortest_arc, wrap_full_turn};

/// One fired beam; the rendering collaborator draws it, the core only ages it
#[derive(Debug, Clone, Copy)]
pub struct Beam {
    /// Cannon rotation at the instant of firing, relative to rest
    pub rotation: f32,
    /// Distance from the cannon to the killed target
    pub hit_radius: f32,
    /// Angular half-width of the hit arc
    pub scatter_angle: f32,
    lifespan: u32,
}

impl Beam {
    fn new(rotation: f32, hit_radius: f32, scatter_angle: f32) -> Self {
        Self {
            rotation,
            hit_radius,
            scatter_angle,
            lifespan: BEAM_LIFESPAN,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lifespan > 0
    }

    fn age(&mut self) {
        self.lifespan = self.lifespan.saturating_sub(1);
    }
}

/// The player's fixed firing origin
#[derive(Debug, Clone)]
pub struct Cannon {
    pub pos: Vec2,
    rest_bearing: f32,
    curr_bearing: f32,
    /// Fraction of the remaining delta applied per frame
    step: f32,
    beams: Vec<Beam>,
}

impl Cannon {
    pub fn new(pos: Vec2, step: f32) -> Self {
        let rest = std::f32::consts::FRAC_PI_2;
        Self {
            pos,
            rest_bearing: rest,
            curr_bearing: rest,
            step,
            beams: Vec::new(),
        }
    }

    /// Current rotation relative to the rest bearing
    pub fn rotation(&self) -> f32 {
        self.curr_bearing - self.rest_bearing
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    /// Rotate one smoothing step toward the aim point
    pub fn steer_toward(&mut self, aim: Vec2) {
        let target = bearing(aim, self.pos);
        let delta = shortest_arc(target - self.curr_bearing);
        self.curr_bearing = wrap_full_turn(self.curr_bearing + self.step * delta);
    }

    /// Register a beam at the current rotation
    pub fn open_fire(&mut self, hit_radius: f32, scatter_angle: f32) {
        self.beams
            .push(Beam::new(self.rotation(), hit_radius, scatter_angle));
    }

    /// Age beams and discard the dead
    pub fn advance(&mut self) {
        for beam in &mut self.beams {
            beam.age();
        }
        self.beams.retain(Beam::is_alive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_steer_converges_on_aim() {
        let mut cannon = Cannon::new(Vec2::new(800.0, 0.0), 0.05);
        let aim = Vec2::new(1100.0, 300.0); // bearing π/4 from the cannon

        for _ in 0..200 {
            cannon.steer_toward(aim);
        }

        let expected = std::f32::consts::FRAC_PI_4 - FRAC_PI_2;
        assert!((cannon.rotation() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_steer_is_fractional() {
        let mut cannon = Cannon::new(Vec2::ZERO, 0.05);
        let aim = Vec2::new(0.0, -10.0); // bearing -π/2, a half-turn away

        cannon.steer_toward(aim);
        // One frame moves 5% of the (shorter-path) delta, not the whole way
        let moved = (cannon.rotation()).abs();
        assert!(moved > 0.0 && moved < 0.1 * std::f32::consts::PI);
    }

    #[test]
    fn test_steer_takes_shorter_path() {
        // Start at rest (π/2); aim just past the -X axis at bearing ~ -π + ε.
        // The short way is counter-clockwise through +π, not back through 0.
        let mut cannon = Cannon::new(Vec2::ZERO, 1.0); // full step isolates the path choice
        let aim = Vec2::new(-100.0, -1.0);

        cannon.steer_toward(aim);
        // Accumulated bearing passes +π rather than unwinding through 0
        assert!(cannon.curr_bearing > std::f32::consts::PI);
        assert!(cannon.curr_bearing < std::f32::consts::TAU);
    }

    #[test]
    fn test_beams_age_out() {
        let mut cannon = Cannon::new(Vec2::ZERO, 0.05);
        cannon.open_fire(500.0, 0.157);
        assert_eq!(cannon.beams().len(), 1);

        for _ in 0..crate::consts::BEAM_LIFESPAN {
            cannon.advance();
        }
        assert!(cannon.beams().is_empty());
    }
}
