//! GPU-ready per-particle instance data

use bytemuck::{Pod, Zeroable};

use super::{ParticleSink, ParticleUpdate};

/// One circle instance, laid out for a vertex buffer with instance step mode
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub id: u32,
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub fn from_update(update: &ParticleUpdate) -> Self {
        Self {
            center: update.pos.to_array(),
            radius: update.radius,
            id: update.id,
            color: if update.colliding {
                colors::COLLIDING
            } else {
                colors::IDLE
            },
        }
    }
}

/// Colors for particle states
pub mod colors {
    pub const IDLE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const COLLIDING: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
}

/// Instances for the latest frame, rebuilt every tick
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    instances: Vec<ParticleInstance>,
}

impl InstanceBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl ParticleSink for InstanceBuffer {
    fn begin_frame(&mut self) {
        self.instances.clear();
    }

    fn on_particle_updated(&mut self, update: &ParticleUpdate) {
        self.instances.push(ParticleInstance::from_update(update));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn update(id: u32, colliding: bool) -> ParticleUpdate {
        ParticleUpdate {
            id,
            pos: Vec2::new(10.0 * id as f32, 5.0),
            radius: 4.0,
            colliding,
        }
    }

    #[test]
    fn test_instance_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<ParticleInstance>(), 32);
    }

    #[test]
    fn test_buffer_rebuilt_each_frame() {
        let mut buf = InstanceBuffer::default();
        buf.begin_frame();
        buf.on_particle_updated(&update(0, false));
        buf.on_particle_updated(&update(1, true));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_bytes().len(), 64);
        assert_eq!(buf.instances()[1].color, colors::COLLIDING);
        assert_eq!(buf.instances()[1].center, [10.0, 5.0]);

        buf.begin_frame();
        buf.on_particle_updated(&update(0, false));
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.instances()[0].color, colors::IDLE);
    }
}
