//! Rectangular wall handling
//!
//! All four walls are checked independently, so a particle wedged in a corner
//! is corrected on both axes in the same tick.

use super::particle::Particle;
use crate::clamp_axis;
use crate::config::{Bounds, SimulationConfig};

#[derive(Debug, Clone, Copy)]
pub struct WallParams {
    /// Velocity kept after a bounce
    pub damping: f32,
    /// Push-back per pixel of embedding
    pub nudge_factor: f32,
}

impl From<&SimulationConfig> for WallParams {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            damping: config.wall_damping,
            nudge_factor: config.wall_nudge_factor,
        }
    }
}

/// Clamp a particle inside `bounds`, bouncing and nudging it off any wall it touches
pub fn resolve_walls(p: &mut Particle, bounds: Bounds, params: &WallParams) {
    let r = p.radius;
    let max_x = bounds.width - r;
    let max_y = bounds.height - r;

    if p.pos.x <= r {
        let overlap = r - p.pos.x;
        p.pos.x = r;
        if p.vel.x < 0.0 {
            p.vel.x = -p.vel.x * params.damping;
        }
        p.vel.x += overlap * params.nudge_factor;
    }
    if p.pos.x >= max_x {
        let overlap = p.pos.x - max_x;
        p.pos.x = max_x;
        if p.vel.x > 0.0 {
            p.vel.x = -p.vel.x * params.damping;
        }
        p.vel.x -= overlap * params.nudge_factor;
    }
    if p.pos.y <= r {
        let overlap = r - p.pos.y;
        p.pos.y = r;
        if p.vel.y < 0.0 {
            p.vel.y = -p.vel.y * params.damping;
        }
        p.vel.y += overlap * params.nudge_factor;
    }
    if p.pos.y >= max_y {
        let overlap = p.pos.y - max_y;
        p.pos.y = max_y;
        if p.vel.y > 0.0 {
            p.vel.y = -p.vel.y * params.damping;
        }
        p.vel.y -= overlap * params.nudge_factor;
    }

    // Containers narrower than the particle: both walls fired, centre it
    p.pos.x = clamp_axis(p.pos.x, r, bounds.width);
    p.pos.y = clamp_axis(p.pos.y, r, bounds.height);
}
