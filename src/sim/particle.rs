//! Particle entity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::vector::snap_small_axes;
use crate::config::ConfigError;

/// A circular particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Stable identity, assigned in insertion order
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Arena this particle lives in; only same-group pairs collide
    #[serde(default)]
    pub group: Option<u32>,
    /// Opaque identity supplied by the host (element id, handle name, ...)
    #[serde(default)]
    pub label: Option<String>,
    /// Resolved a collision during the last tick
    #[serde(skip)]
    pub colliding: bool,
}

impl Particle {
    pub fn new(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            mass: 1.0,
            group: None,
            label: None,
            colliding: false,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_group(mut self, group: Option<u32>) -> Self {
        self.group = group;
        self
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Snap near-zero velocity components, then apply this tick's acceleration
    ///
    /// Position is left alone: the tick integrates after collisions and walls
    /// have had their say.
    pub fn step(&mut self, acceleration: Vec2, epsilon: f32) {
        self.vel = snap_small_axes(self.vel, epsilon);
        self.vel += acceleration;
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        1.0 / self.mass
    }

    /// Whether two particles share an arena
    #[inline]
    pub fn same_group(&self, other: &Particle) -> bool {
        self.group == other.group
    }

    /// Reject radii, masses or states the tick cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let particle = self.id as usize;
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidRadius {
                particle,
                value: self.radius,
            });
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidMass {
                particle,
                value: self.mass,
            });
        }
        if !(self.pos.is_finite() && self.vel.is_finite()) {
            return Err(ConfigError::NonFiniteState { particle });
        }
        Ok(())
    }
}
