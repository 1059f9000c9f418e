//! Simulation state
//!
//! Everything a tick reads or writes lives here, with particles kept in id
//! order so iteration is stable.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particle::Particle;
use crate::config::{Bounds, ConfigError, SimulationConfig};

/// Particle collection plus the config it runs under
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: SimulationConfig,
    /// Particles, sorted by id
    pub particles: Vec<Particle>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Last accepted container size per arena
    #[serde(skip)]
    pub arena_bounds: BTreeMap<Option<u32>, Bounds>,
    next_id: u32,
}

impl SimState {
    /// Create an empty state, rejecting an invalid config
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            particles: Vec::new(),
            time_ticks: 0,
            arena_bounds: BTreeMap::new(),
            next_id: 0,
        })
    }

    /// Allocate a new particle ID
    fn next_particle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a particle during setup, assigning it the next id
    pub fn insert(&mut self, mut particle: Particle) -> Result<u32, ConfigError> {
        particle.id = self.next_id;
        particle.validate()?;
        if let Some(label) = &particle.label {
            if self.find_by_label(label).is_some() {
                return Err(ConfigError::DuplicateLabel(label.clone()));
            }
        }
        let id = self.next_particle_id();
        self.particles.push(particle);
        Ok(id)
    }

    pub fn get(&self, id: u32) -> Option<&Particle> {
        self.particles
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.particles[i])
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Particle> {
        self.particles
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &mut self.particles[i])
    }

    pub fn find_by_label(&self, label: &str) -> Option<&Particle> {
        self.particles
            .iter()
            .find(|p| p.label.as_deref() == Some(label))
    }

    pub fn find_by_label_mut(&mut self, label: &str) -> Option<&mut Particle> {
        self.particles
            .iter_mut()
            .find(|p| p.label.as_deref() == Some(label))
    }

    /// Container size for an arena, falling back to the configured size
    pub fn bounds_for(&self, group: Option<u32>) -> Bounds {
        self.arena_bounds
            .get(&group)
            .copied()
            .unwrap_or(self.config.bounds)
    }

    /// Σ mass · velocity
    pub fn total_momentum(&self) -> Vec2 {
        self.particles.iter().map(Particle::momentum).sum()
    }

    /// Σ |velocity|
    pub fn total_speed(&self) -> f32 {
        crate::total_speed(self.particles.iter().map(|p| &p.vel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut state = SimState::new(SimulationConfig::default()).unwrap();
        let a = state.insert(Particle::new(99, Vec2::new(50.0, 50.0), 10.0)).unwrap();
        let b = state.insert(Particle::new(99, Vec2::new(90.0, 50.0), 10.0)).unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(state.get(1).map(|p| p.pos.x), Some(90.0));
    }

    #[test]
    fn test_inserted_particles_stay_sorted_for_lookup() {
        let mut state = SimState::new(SimulationConfig::default()).unwrap();
        for i in 0..6 {
            let radius = if i == 3 { -1.0 } else { 5.0 };
            let _ = state.insert(Particle::new(50 - i, Vec2::new(20.0, 20.0), radius));
        }
        let ids: Vec<u32> = state.particles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert!(ids.iter().all(|&id| state.get(id).map(|p| p.id) == Some(id)));
    }

    #[test]
    fn test_insert_rejects_invalid_particle_without_consuming_id() {
        let mut state = SimState::new(SimulationConfig::default()).unwrap();
        assert!(state.insert(Particle::new(0, Vec2::ZERO, 0.0)).is_err());
        let id = state.insert(Particle::new(0, Vec2::new(30.0, 30.0), 5.0)).unwrap();
        assert_eq!(id, 0);
        assert_eq!(state.particles.len(), 1);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut state = SimState::new(SimulationConfig::default()).unwrap();
        let p = Particle::new(0, Vec2::new(30.0, 30.0), 5.0).with_label(Some("ball".into()));
        state.insert(p.clone()).unwrap();
        assert!(matches!(
            state.insert(p),
            Err(ConfigError::DuplicateLabel(_))
        ));
    }

    #[test]
    fn test_bounds_fallback_to_config() {
        let state = SimState::new(SimulationConfig::default()).unwrap();
        assert_eq!(state.bounds_for(Some(7)), state.config.bounds);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig {
            air_damping: -0.1,
            ..Default::default()
        };
        assert!(SimState::new(config).is_err());
    }
}
