//! Frame-stepped particle physics
//!
//! All physics lives here. This module is pure and deterministic:
//! - One tick per frame, no delta time
//! - Stable iteration order (by particle ID)
//! - No rendering or platform dependencies

pub mod boundary;
pub mod bounds;
pub mod collision;
pub mod particle;
pub mod state;
pub mod tick;
pub mod vector;

pub use boundary::{WallParams, resolve_walls};
pub use bounds::{ArenaBounds, BoundsSource, SharedBounds};
pub use collision::{CollisionParams, Contact, detect, resolve_pair};
pub use particle::Particle;
pub use state::SimState;
pub use tick::{ExternalForceSample, TickInput, resolve_first_contact, tick};
pub use vector::Vector2;
