//! Tilt Box - a 2D particle box driven by device tilt and pointer drag
//!
//! Core modules:
//! - `sim`: Frame-stepped physics (particles, collisions, walls, tick)
//! - `input`: Motion sources (device tilt/acceleration, pointer drag)
//! - `render`: Sink interface and GPU-ready instance buffers
//! - `config`: Tunable simulation parameters and validation
//! - `scenario`: Initial layouts loaded from JSON or generated
//! - `simulation`: The frame driver tying input, bounds and sinks together

pub mod config;
pub mod input;
pub mod render;
pub mod scenario;
pub mod sim;
pub mod simulation;

pub use config::{CollisionModel, ConfigError, SimulationConfig};
pub use scenario::{ParticleSpec, Scenario};
pub use simulation::{Edit, EditOp, Simulation};

use glam::Vec2;

/// Default tuning constants
///
/// Units are pixels and frames: there is no delta time, one tick is one display
/// refresh.
pub mod consts {
    /// Downward pull applied every tick when no motion input is live
    pub const GRAVITY_Y: f32 = 0.0981;
    /// Velocity kept after a wall bounce
    pub const WALL_DAMPING: f32 = 0.75;
    /// Velocity kept by both particles after a collision
    pub const COLLISION_DAMPING: f32 = 0.75;
    /// Per-axis speeds below this are snapped to zero
    pub const VELOCITY_EPSILON: f32 = 0.01;
    /// Wall push-back per pixel of embedding (resized containers)
    pub const WALL_NUDGE_FACTOR: f32 = 0.125;
    /// Particle push-apart velocity per pixel of half-overlap
    pub const PARTICLE_NUDGE_FACTOR: f32 = 0.5;
    /// Coefficient of restitution for the impulse model
    pub const RESTITUTION: f32 = 1.0;
    /// Per-tick velocity multiplier (1.0 disables air drag)
    pub const AIR_DAMPING: f32 = 1.0;

    /// Tilt degrees are divided by this before being added to velocity
    pub const TILT_DIVISOR: f32 = 180.0;
    /// Device acceleration (m/s²) is divided by this before being added to velocity
    pub const ACCELERATION_DIVISOR: f32 = 2.5;

    /// Default container size
    pub const BOX_WIDTH: f32 = 800.0;
    pub const BOX_HEIGHT: f32 = 600.0;

    /// Default particle layout (row along the top of the box)
    pub const PARTICLE_RADIUS: f32 = 24.0;
    pub const PARTICLE_SPACING: f32 = 5.0;
    pub const ROW_Y: f32 = 50.0;
    /// Upper bound for scattered initial velocity components
    pub const INITIAL_SPEED: f32 = 10.0;
}

/// Sum of per-particle speeds
#[inline]
pub fn total_speed<'a>(velocities: impl IntoIterator<Item = &'a Vec2>) -> f32 {
    velocities.into_iter().map(|v| v.length()).sum()
}

/// Clamp a coordinate into `[radius, extent - radius]`
///
/// When the extent is too small to hold the particle it is centred instead.
#[inline]
pub fn clamp_axis(value: f32, radius: f32, extent: f32) -> f32 {
    let lo = radius;
    let hi = extent - radius;
    if hi < lo {
        extent / 2.0
    } else {
        value.clamp(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis_inside_and_out() {
        assert_eq!(clamp_axis(50.0, 10.0, 100.0), 50.0);
        assert_eq!(clamp_axis(-3.0, 10.0, 100.0), 10.0);
        assert_eq!(clamp_axis(120.0, 10.0, 100.0), 90.0);
    }

    #[test]
    fn test_clamp_axis_narrow_extent_centres() {
        assert_eq!(clamp_axis(3.0, 10.0, 12.0), 6.0);
    }

    #[test]
    fn test_total_speed() {
        let v = [Vec2::new(3.0, 4.0), Vec2::new(0.0, 1.0)];
        assert!((total_speed(&v) - 6.0).abs() < 1e-6);
    }
}
