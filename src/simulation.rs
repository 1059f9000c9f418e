//! Frame driver
//!
//! [`Simulation`] owns the particle state and its collaborators. The host's
//! render loop calls [`Simulation::tick`] once per display refresh; between
//! ticks the host may edit particles through [`Simulation::edit`].

use std::ops::{Add, Mul};

use glam::Vec2;

use crate::config::{ConfigError, SimulationConfig};
use crate::input::{MotionInput, NoMotion, Permission};
use crate::render::{ParticleSink, ParticleUpdate};
use crate::scenario::{ParticleSpec, Scenario};
use crate::sim::{BoundsSource, Particle, SimState, TickInput, tick};

/// How an edit combines with the current value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOp<T> {
    Set(T),
    Add(T),
    Multiply(T),
}

impl<T: Copy + Add<Output = T> + Mul<Output = T>> EditOp<T> {
    pub fn apply(self, current: T) -> T {
        match self {
            EditOp::Set(v) => v,
            EditOp::Add(v) => current + v,
            EditOp::Multiply(v) => current * v,
        }
    }
}

/// Out-of-band change to one particle field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    Position(EditOp<Vec2>),
    Velocity(EditOp<Vec2>),
    Radius(EditOp<f32>),
    Mass(EditOp<f32>),
}

/// Identifies a particle for editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKey<'a> {
    Id(u32),
    Label(&'a str),
}

impl From<u32> for ParticleKey<'_> {
    fn from(id: u32) -> Self {
        ParticleKey::Id(id)
    }
}

impl<'a> From<&'a str> for ParticleKey<'a> {
    fn from(label: &'a str) -> Self {
        ParticleKey::Label(label)
    }
}

impl std::fmt::Display for ParticleKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticleKey::Id(id) => write!(f, "id {id}"),
            ParticleKey::Label(label) => write!(f, "label {label:?}"),
        }
    }
}

/// A running particle box
pub struct Simulation {
    state: SimState,
    motion: Box<dyn MotionInput>,
    bounds: Box<dyn BoundsSource>,
}

impl Simulation {
    /// Build from a config and explicit starting particles
    pub fn new(
        config: SimulationConfig,
        particles: Vec<ParticleSpec>,
    ) -> Result<Self, ConfigError> {
        Self::from_scenario(&Scenario {
            config,
            particles,
            ..Default::default()
        })
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self, ConfigError> {
        let state = scenario.build_state()?;
        log::info!(
            "Simulation created: {} particles in {}x{} ({} collisions)",
            state.particles.len(),
            state.config.bounds.width,
            state.config.bounds.height,
            state.config.collision_model.as_str()
        );
        let bounds = Box::new(state.config.bounds);
        Ok(Self {
            state,
            motion: Box::new(NoMotion),
            bounds,
        })
    }

    /// Replace the motion source (defaults to none, i.e. plain gravity)
    pub fn with_motion(mut self, motion: impl MotionInput + 'static) -> Self {
        self.motion = Box::new(motion);
        self
    }

    /// Replace the container-size source (defaults to the configured bounds)
    pub fn with_bounds(mut self, bounds: impl BoundsSource + 'static) -> Self {
        self.bounds = Box::new(bounds);
        self
    }

    pub fn request_motion_permission(&mut self) -> Permission {
        let permission = self.motion.request_permission();
        if !permission.allows() {
            log::info!("Motion input unavailable ({permission:?}), using gravity");
        }
        permission
    }

    /// Advance one frame and publish the finalised positions
    pub fn tick(&mut self, sink: &mut dyn ParticleSink) {
        let input = TickInput {
            sample: self.motion.current_sample(),
        };
        tick(&mut self.state, &input, self.bounds.as_ref());

        sink.begin_frame();
        for p in &self.state.particles {
            sink.on_particle_updated(&ParticleUpdate {
                id: p.id,
                pos: p.pos,
                radius: p.radius,
                colliding: p.colliding,
            });
        }

        log::debug!(
            "tick {}: total speed {:.2}",
            self.state.time_ticks,
            self.state.total_speed()
        );
    }

    /// Change one particle between ticks
    ///
    /// Radius and mass must stay finite and positive; position and velocity
    /// must stay finite. A position outside the box is pulled back in on the
    /// next tick.
    pub fn edit<'a>(
        &mut self,
        key: impl Into<ParticleKey<'a>>,
        edit: Edit,
    ) -> Result<(), ConfigError> {
        let key = key.into();
        let particle = match key {
            ParticleKey::Id(id) => self.state.get_mut(id),
            ParticleKey::Label(label) => self.state.find_by_label_mut(label),
        }
        .ok_or_else(|| ConfigError::UnknownParticle(key.to_string()))?;

        let mut edited = particle.clone();
        match edit {
            Edit::Position(op) => edited.pos = op.apply(edited.pos),
            Edit::Velocity(op) => edited.vel = op.apply(edited.vel),
            Edit::Radius(op) => edited.radius = op.apply(edited.radius),
            Edit::Mass(op) => edited.mass = op.apply(edited.mass),
        }
        edited.validate()?;
        *particle = edited;
        Ok(())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.state.particles
    }

    pub fn particle(&self, id: u32) -> Option<&Particle> {
        self.state.get(id)
    }

    pub fn find(&self, label: &str) -> Option<&Particle> {
        self.state.find_by_label(label)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.state.config
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn time_ticks(&self) -> u64 {
        self.state.time_ticks
    }

    pub fn total_speed(&self) -> f32 {
        self.state.total_speed()
    }

    pub fn total_momentum(&self) -> Vec2 {
        self.state.total_momentum()
    }
}
