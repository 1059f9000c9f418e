//! Rendering collaborators
//!
//! The simulation knows nothing about drawing. After each tick it pushes one
//! [`ParticleUpdate`] per particle, in id order, into a [`ParticleSink`].

pub mod instance;

pub use instance::{InstanceBuffer, ParticleInstance, colors};

use glam::Vec2;

/// Finalised state of one particle after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleUpdate {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Resolved a collision this tick
    pub colliding: bool,
}

/// Receives particle positions once a tick has completed
pub trait ParticleSink {
    /// Called once before the first update of a frame
    fn begin_frame(&mut self) {}

    fn on_particle_updated(&mut self, update: &ParticleUpdate);
}

/// Records every update, across frames
impl ParticleSink for Vec<ParticleUpdate> {
    fn on_particle_updated(&mut self, update: &ParticleUpdate) {
        self.push(*update);
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F: FnMut(&ParticleUpdate)> ParticleSink for FnSink<F> {
    fn on_particle_updated(&mut self, update: &ParticleUpdate) {
        (self.0)(update)
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ParticleSink for NullSink {
    fn on_particle_updated(&mut self, _update: &ParticleUpdate) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_sees_each_update() {
        let mut seen = Vec::new();
        let mut sink = FnSink(|u: &ParticleUpdate| seen.push(u.id));
        for id in 0..3 {
            sink.on_particle_updated(&ParticleUpdate {
                id,
                pos: Vec2::ZERO,
                radius: 1.0,
                colliding: false,
            });
        }
        drop(sink);
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
