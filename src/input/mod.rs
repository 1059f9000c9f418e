//! Motion input sources
//!
//! Sensors and pointers report asynchronously through cloneable feed handles;
//! the simulation reads the latest reading once per tick. A missing or denied
//! source reads as an empty sample, which means plain gravity.

pub mod motion;
pub mod pointer;

pub use motion::{DeviceMotion, MotionFeed, NoMotion, Orientation, SensorChannel};
pub use pointer::{DragHandle, PointerDrag};

use crate::sim::ExternalForceSample;

/// Consent state of a motion source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Platform has no consent gate
    NotRequired,
    /// Asked, waiting for the user
    Prompt,
    Granted,
    Denied,
}

impl Permission {
    /// Readings from this source may be used
    pub fn allows(&self) -> bool {
        matches!(self, Permission::NotRequired | Permission::Granted)
    }
}

/// A source of per-tick external force
pub trait MotionInput {
    /// Ask for access; a no-op on platforms without a consent gate
    fn request_permission(&mut self) -> Permission;

    /// Latest reading, empty when there is nothing live
    fn current_sample(&self) -> ExternalForceSample;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_allows() {
        assert!(Permission::NotRequired.allows());
        assert!(Permission::Granted.allows());
        assert!(!Permission::Prompt.allows());
        assert!(!Permission::Denied.allows());
    }
}
