//! Container-size collaborators
//!
//! The tick asks for the container size every frame so a resize takes effect
//! immediately.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::Bounds;

/// Supplies the current container size for an arena
pub trait BoundsSource {
    fn bounds_for(&self, group: Option<u32>) -> Bounds;
}

/// A fixed box shared by every arena
impl BoundsSource for Bounds {
    fn bounds_for(&self, _group: Option<u32>) -> Bounds {
        *self
    }
}

/// Resizable container handle
///
/// Clones share the same cell: the host keeps one to call [`SharedBounds::resize`]
/// from its resize handler while the simulation reads another.
#[derive(Debug, Clone)]
pub struct SharedBounds(Rc<Cell<Bounds>>);

impl SharedBounds {
    pub fn new(bounds: Bounds) -> Self {
        Self(Rc::new(Cell::new(bounds)))
    }

    pub fn resize(&self, width: f32, height: f32) {
        self.0.set(Bounds::new(width, height));
    }

    pub fn get(&self) -> Bounds {
        self.0.get()
    }
}

impl BoundsSource for SharedBounds {
    fn bounds_for(&self, _group: Option<u32>) -> Bounds {
        self.0.get()
    }
}

/// Independent arenas, one box per particle group
#[derive(Debug, Clone, Default)]
pub struct ArenaBounds {
    arenas: BTreeMap<u32, Bounds>,
    /// Box for particles without a group, or with an unknown one
    pub fallback: Bounds,
}

impl ArenaBounds {
    pub fn new(fallback: Bounds) -> Self {
        Self {
            arenas: BTreeMap::new(),
            fallback,
        }
    }

    pub fn with_arena(mut self, group: u32, bounds: Bounds) -> Self {
        self.arenas.insert(group, bounds);
        self
    }

    pub fn set(&mut self, group: u32, bounds: Bounds) {
        self.arenas.insert(group, bounds);
    }
}

impl BoundsSource for ArenaBounds {
    fn bounds_for(&self, group: Option<u32>) -> Bounds {
        group
            .and_then(|g| self.arenas.get(&g).copied())
            .unwrap_or(self.fallback)
    }
}
