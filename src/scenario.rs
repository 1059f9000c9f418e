//! Initial particle layouts
//!
//! A scenario is a config plus the particles to start with. It can come from
//! JSON or from [`Scenario::row`], which lines particles up along the top of
//! the box.

use std::path::Path;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SimulationConfig};
use crate::consts::*;
use crate::sim::{Particle, SimState};

/// Starting state of one particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSpec {
    pub position: Vec2,
    pub radius: f32,
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// Explicit start velocity; scattered randomly when absent
    #[serde(default)]
    pub velocity: Option<Vec2>,
    #[serde(default)]
    pub group: Option<u32>,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_mass() -> f32 {
    1.0
}

impl ParticleSpec {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            mass: 1.0,
            velocity: None,
            group: None,
            label: None,
        }
    }
}

/// Config plus initial particles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub config: SimulationConfig,
    pub particles: Vec<ParticleSpec>,
    /// Seed for scattered start velocities
    pub seed: u64,
    /// Upper bound of each scattered velocity component; 0 starts at rest
    pub initial_speed: f32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            config: SimulationConfig::default(),
            particles: Vec::new(),
            seed: 0,
            initial_speed: 0.0,
        }
    }
}

impl Scenario {
    /// `count` equal particles in rows from the top-left corner, `PARTICLE_SPACING` apart
    ///
    /// Rows wrap when they reach the right wall.
    pub fn row(config: SimulationConfig, count: usize, radius: f32) -> Self {
        let pitch = 2.0 * radius + PARTICLE_SPACING;
        let usable = config.bounds.width - PARTICLE_SPACING;
        let per_row = ((usable / pitch).floor() as usize).max(1);

        let particles = (0..count)
            .map(|i| {
                let col = (i % per_row) as f32;
                let row = (i / per_row) as f32;
                let pos = Vec2::new(
                    PARTICLE_SPACING + radius + col * pitch,
                    ROW_Y + radius + row * pitch,
                );
                ParticleSpec::new(pos, radius)
            })
            .collect();

        Self {
            config,
            particles,
            ..Default::default()
        }
    }

    /// Give particles without an explicit velocity a random one in `[0, max)²`
    pub fn with_scatter(mut self, seed: u64, max_speed: f32) -> Self {
        self.seed = seed;
        self.initial_speed = max_speed;
        self
    }

    /// Parse and validate a JSON scenario
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let scenario = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded scenario with {} particles from {}",
            scenario.particles.len(),
            path.display()
        );
        Ok(scenario)
    }

    /// Build the initial simulation state
    pub fn build_state(&self) -> Result<SimState, ConfigError> {
        let mut state = SimState::new(self.config.clone())?;
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let scatter = self.initial_speed.is_finite() && self.initial_speed > 0.0;

        for spec in &self.particles {
            let velocity = match spec.velocity {
                Some(v) => v,
                None if scatter => Vec2::new(
                    rng.random::<f32>() * self.initial_speed,
                    rng.random::<f32>() * self.initial_speed,
                ),
                None => Vec2::ZERO,
            };
            let particle = Particle::new(0, spec.position, spec.radius)
                .with_mass(spec.mass)
                .with_velocity(velocity)
                .with_group(spec.group)
                .with_label(spec.label.clone());
            state.insert(particle)?;
        }

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;

    #[test]
    fn test_row_layout_spacing() {
        let scenario = Scenario::row(SimulationConfig::default(), 3, 24.0);
        let xs: Vec<f32> = scenario.particles.iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![29.0, 82.0, 135.0]);
        assert!(scenario.particles.iter().all(|p| p.position.y == 74.0));
    }

    #[test]
    fn test_row_layout_wraps() {
        let config = SimulationConfig {
            bounds: Bounds::new(120.0, 400.0),
            ..Default::default()
        };
        let scenario = Scenario::row(config, 3, 24.0);
        assert_eq!(scenario.particles[2].position, Vec2::new(29.0, 127.0));
    }

    #[test]
    fn test_scatter_is_seeded() {
        let a = Scenario::row(SimulationConfig::default(), 4, 10.0)
            .with_scatter(7, INITIAL_SPEED)
            .build_state()
            .unwrap();
        let b = Scenario::row(SimulationConfig::default(), 4, 10.0)
            .with_scatter(7, INITIAL_SPEED)
            .build_state()
            .unwrap();
        assert_eq!(a.particles, b.particles);
        for p in &a.particles {
            assert!(p.vel.x >= 0.0 && p.vel.x < INITIAL_SPEED);
            assert!(p.vel.y >= 0.0 && p.vel.y < INITIAL_SPEED);
        }
    }

    #[test]
    fn test_explicit_velocity_wins_over_scatter() {
        let mut scenario = Scenario::row(SimulationConfig::default(), 1, 10.0).with_scatter(1, 5.0);
        scenario.particles[0].velocity = Some(Vec2::new(-2.0, 0.0));
        let state = scenario.build_state().unwrap();
        assert_eq!(state.particles[0].vel, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_json_scenario() {
        let json = r#"{
            "config": { "gravity": [0.0, 0.35] },
            "particles": [
                { "position": [0.0, 50.0], "radius": 10.0, "label": "left" },
                { "position": [15.0, 50.0], "radius": 10.0, "mass": 2.0, "group": 1 }
            ]
        }"#;
        let scenario = Scenario::from_json(json).unwrap();
        let state = scenario.build_state().unwrap();
        assert_eq!(state.particles.len(), 2);
        assert_eq!(state.particles[1].mass, 2.0);
        assert_eq!(state.particles[1].group, Some(1));
        assert_eq!(state.find_by_label("left").map(|p| p.id), Some(0));
        assert_eq!(state.config.gravity, Vec2::new(0.0, 0.35));
    }

    #[test]
    fn test_invalid_particle_fails_fast() {
        let json = r#"{ "particles": [ { "position": [10.0, 10.0], "radius": -4.0 } ] }"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert!(matches!(
            scenario.build_state(),
            Err(ConfigError::InvalidRadius { .. })
        ));
    }
}
