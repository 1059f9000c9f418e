//! Per-frame simulation step
//!
//! One call advances every particle by one display frame. There is no delta
//! time: speeds are in pixels per tick, so the simulation runs faster on a
//! faster display.

use std::collections::BTreeSet;

use glam::Vec2;

use super::boundary::{WallParams, resolve_walls};
use super::bounds::BoundsSource;
use super::collision::{CollisionParams, resolve_pair};
use super::particle::Particle;
use super::state::SimState;
use crate::clamp_axis;
use crate::config::SimulationConfig;

/// Most recent motion reading
///
/// Both halves `None` means no live input: the tick falls back to gravity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExternalForceSample {
    /// Device tilt in degrees (x: left-to-right, y: front-to-back)
    pub tilt: Option<Vec2>,
    /// Device linear acceleration (x, y)
    pub device_acceleration: Option<Vec2>,
}

impl ExternalForceSample {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tilt.is_none() && self.device_acceleration.is_none()
    }

    /// Velocity change for this tick
    ///
    /// Non-finite readings are treated as missing.
    pub fn acceleration(&self, config: &SimulationConfig) -> Vec2 {
        let tilt = self.tilt.filter(|v| v.is_finite());
        let accel = self.device_acceleration.filter(|v| v.is_finite());
        if tilt.is_none() && accel.is_none() {
            return config.gravity;
        }
        tilt.unwrap_or(Vec2::ZERO) / config.tilt_divisor
            + accel.unwrap_or(Vec2::ZERO) / config.acceleration_divisor
    }
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub sample: ExternalForceSample,
}

/// Advance the simulation by one frame
///
/// Per particle, in id order: first colliding same-group neighbour, walls,
/// acceleration and velocity floor, air damping, integration. Positions are
/// clamped into their arena once every particle has moved.
pub fn tick<B: BoundsSource + ?Sized>(state: &mut SimState, input: &TickInput, bounds: &B) {
    state.time_ticks += 1;
    refresh_bounds(state, bounds);

    let SimState {
        config,
        particles,
        arena_bounds,
        ..
    } = state;

    let acceleration = input.sample.acceleration(config);
    let collision = CollisionParams::from(&*config);
    let walls = WallParams::from(&*config);

    for p in particles.iter_mut() {
        p.colliding = false;
    }

    for i in 0..particles.len() {
        resolve_first_contact(particles, i, &collision);

        let p = &mut particles[i];
        let arena = arena_bounds.get(&p.group).copied().unwrap_or(config.bounds);
        resolve_walls(p, arena, &walls);
        p.step(acceleration, config.velocity_epsilon);
        p.vel *= config.air_damping;
        p.pos += p.vel;
    }

    // Later particles' corrections may have pushed earlier ones out
    for p in particles.iter_mut() {
        let arena = arena_bounds.get(&p.group).copied().unwrap_or(config.bounds);
        p.pos.x = clamp_axis(p.pos.x, p.radius, arena.width);
        p.pos.y = clamp_axis(p.pos.y, p.radius, arena.height);
    }
}

/// Read each arena's size, keeping the last good value when the source misbehaves
fn refresh_bounds<B: BoundsSource + ?Sized>(state: &mut SimState, source: &B) {
    let groups: BTreeSet<Option<u32>> = state.particles.iter().map(|p| p.group).collect();
    for group in groups {
        let fresh = source.bounds_for(group);
        if fresh.is_valid() {
            state.arena_bounds.insert(group, fresh);
        } else {
            log::warn!(
                "ignoring invalid bounds {}x{} for arena {:?}, keeping {:?}",
                fresh.width,
                fresh.height,
                group,
                state.bounds_for(group)
            );
        }
    }
}

/// Resolve particle `i` against the first same-group neighbour it overlaps
///
/// At most one collision per scanning particle per tick. Returns the index of
/// the neighbour that was hit.
pub fn resolve_first_contact(
    particles: &mut [Particle],
    i: usize,
    params: &CollisionParams,
) -> Option<usize> {
    for j in 0..particles.len() {
        if i == j || !particles[i].same_group(&particles[j]) {
            continue;
        }
        let (a, b) = pair_mut(particles, i, j);
        if resolve_pair(a, b, params) {
            a.colliding = true;
            b.colliding = true;
            return Some(j);
        }
    }
    None
}

/// Two distinct mutable particles out of one slice
fn pair_mut(items: &mut [Particle], i: usize, j: usize) -> (&mut Particle, &mut Particle) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}
