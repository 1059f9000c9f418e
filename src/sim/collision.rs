//! Circle-circle collision detection and response
//!
//! Overlapping pairs are pushed apart symmetrically along the contact normal,
//! then their velocities are resolved with the configured [`CollisionModel`].

use glam::Vec2;

use super::particle::Particle;
use super::vector::separation;
use crate::config::{CollisionModel, SimulationConfig};

/// Overlap between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from `b` toward `a` (zero when the centres coincide)
    pub normal: Vec2,
    /// How far the circles interpenetrate
    pub overlap: f32,
    /// Centre distance
    pub distance: f32,
}

impl Contact {
    /// Centres coincide, so there is no usable normal
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.distance == 0.0
    }
}

/// Subset of the config the pair resolver needs
#[derive(Debug, Clone, Copy)]
pub struct CollisionParams {
    pub model: CollisionModel,
    pub restitution: f32,
    pub damping: f32,
    pub nudge_factor: f32,
    pub margin: f32,
}

impl From<&SimulationConfig> for CollisionParams {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            model: config.collision_model,
            restitution: config.restitution,
            damping: config.collision_damping,
            nudge_factor: config.particle_nudge_factor,
            margin: config.collision_margin,
        }
    }
}

/// Check whether two particles overlap
///
/// Centres exactly `ra + rb + margin` apart do not count as touching.
pub fn detect(a: &Particle, b: &Particle, margin: f32) -> Option<Contact> {
    let (normal, distance) = separation(a.pos, b.pos);
    let min_dist = a.radius + b.radius + margin;
    if distance < min_dist {
        Some(Contact {
            normal,
            overlap: min_dist - distance,
            distance,
        })
    } else {
        None
    }
}

/// Detect and resolve a collision between `a` and `b`
///
/// Returns true iff the particles overlapped, whether or not their velocities
/// changed. Coincident centres count as a hit but are left untouched.
pub fn resolve_pair(a: &mut Particle, b: &mut Particle, params: &CollisionParams) -> bool {
    let Some(contact) = detect(a, b, params.margin) else {
        return false;
    };

    if contact.is_degenerate() {
        log::debug!(
            "particles {} and {} share a centre at ({:.2}, {:.2}), skipping response",
            a.id,
            b.id,
            a.pos.x,
            a.pos.y
        );
        return true;
    }

    let n = contact.normal;
    let half = contact.overlap / 2.0;

    // Positional correction keeps the pair's midpoint fixed
    a.pos += n * half;
    b.pos -= n * half;

    if params.nudge_factor > 0.0 {
        let nudge = n * half * params.nudge_factor;
        a.vel += nudge;
        b.vel -= nudge;
    }

    match params.model {
        CollisionModel::Impulse => apply_impulse(a, b, n, params),
        CollisionModel::MomentumExchange => exchange_momentum(a, b, params),
    }

    true
}

/// Restitution impulse along `n`, skipped when the pair is already separating
fn apply_impulse(a: &mut Particle, b: &mut Particle, n: Vec2, params: &CollisionParams) {
    let rel_vel = a.vel - b.vel;
    let vel_along_normal = rel_vel.dot(n);
    if vel_along_normal > 0.0 {
        return;
    }

    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let impulse = -(1.0 + params.restitution) * vel_along_normal / (inv_a + inv_b);

    a.vel += n * (impulse * inv_a);
    b.vel -= n * (impulse * inv_b);

    a.vel *= params.damping;
    b.vel *= params.damping;
}

/// Swap the velocity component along the centre line, weighted by mass
fn exchange_momentum(a: &mut Particle, b: &mut Particle, params: &CollisionParams) {
    // Centres are `ra + rb + margin` apart after correction, never zero
    let delta_x = b.pos - a.pos;
    let delta_v = b.vel - a.vel;
    let projected = delta_x * (delta_v.dot(delta_x) / delta_x.length_squared());
    let total_mass = a.mass + b.mass;

    a.vel += projected * (2.0 * b.mass / total_mass);
    b.vel -= projected * (2.0 * a.mass / total_mass);

    a.vel *= params.damping;
    b.vel *= params.damping;
}
