//! Device orientation and acceleration
//!
//! Orientation (tilt) and motion (linear acceleration) are separate channels
//! with separate consent, as browsers expose them.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use super::{MotionInput, Permission};
use crate::sim::ExternalForceSample;

/// Source that never reports anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMotion;

impl MotionInput for NoMotion {
    fn request_permission(&mut self) -> Permission {
        Permission::NotRequired
    }

    fn current_sample(&self) -> ExternalForceSample {
        ExternalForceSample::none()
    }
}

/// Device orientation in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    /// Rotation around the screen normal
    pub alpha: f32,
    /// Front-to-back tilt
    pub beta: f32,
    /// Left-to-right tilt
    pub gamma: f32,
}

impl Orientation {
    /// Tilt as a screen-space vector (x: left-to-right, y: front-to-back)
    pub fn tilt(&self) -> Vec2 {
        Vec2::new(self.gamma, self.beta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorChannel {
    Orientation,
    Motion,
}

#[derive(Debug, Clone, Copy, Default)]
struct Readings {
    orientation: Option<Orientation>,
    acceleration: Option<Vec3>,
}

/// Write side of a [`DeviceMotion`], handed to sensor event callbacks
///
/// Each event overwrites the previous one; the tick only sees the latest.
#[derive(Debug, Clone, Default)]
pub struct MotionFeed(Rc<Cell<Readings>>);

impl MotionFeed {
    pub fn orientation(&self, alpha: f32, beta: f32, gamma: f32) {
        let mut r = self.0.get();
        r.orientation = Some(Orientation { alpha, beta, gamma });
        self.0.set(r);
    }

    pub fn motion(&self, x: f32, y: f32, z: f32) {
        let mut r = self.0.get();
        r.acceleration = Some(Vec3::new(x, y, z));
        self.0.set(r);
    }

    /// Forget both readings (sensor went away)
    pub fn clear(&self) {
        self.0.set(Readings::default());
    }
}

/// Tilt and acceleration sensors behind an optional consent gate
#[derive(Debug)]
pub struct DeviceMotion {
    feed: MotionFeed,
    requires_consent: bool,
    orientation: Permission,
    motion: Permission,
}

impl DeviceMotion {
    /// `requires_consent` is true on platforms that prompt before exposing sensors
    pub fn new(requires_consent: bool) -> Self {
        let initial = if requires_consent {
            Permission::Prompt
        } else {
            Permission::NotRequired
        };
        Self {
            feed: MotionFeed::default(),
            requires_consent,
            orientation: initial,
            motion: initial,
        }
    }

    /// Handle for sensor callbacks
    pub fn feed(&self) -> MotionFeed {
        self.feed.clone()
    }

    pub fn permission(&self, channel: SensorChannel) -> Permission {
        match channel {
            SensorChannel::Orientation => self.orientation,
            SensorChannel::Motion => self.motion,
        }
    }

    /// Record the user's answer to a consent prompt
    pub fn resolve_permission(&mut self, channel: SensorChannel, granted: bool) {
        if !self.requires_consent {
            return;
        }
        let state = if granted {
            Permission::Granted
        } else {
            log::warn!("{channel:?} permission denied, falling back to gravity");
            Permission::Denied
        };
        match channel {
            SensorChannel::Orientation => self.orientation = state,
            SensorChannel::Motion => self.motion = state,
        }
    }

    /// Combined state: usable if either channel is usable
    fn combined(&self) -> Permission {
        if self.orientation.allows() || self.motion.allows() {
            if self.requires_consent {
                Permission::Granted
            } else {
                Permission::NotRequired
            }
        } else if self.orientation == Permission::Prompt || self.motion == Permission::Prompt {
            Permission::Prompt
        } else {
            Permission::Denied
        }
    }
}

impl MotionInput for DeviceMotion {
    /// Report the combined consent state
    ///
    /// This does not show a prompt. The host asks the user itself and passes
    /// each answer to [`DeviceMotion::resolve_permission`]; until then a gated
    /// device stays at `Prompt` and reads as gravity.
    fn request_permission(&mut self) -> Permission {
        let state = self.combined();
        log::info!(
            "Motion permission requested: orientation {:?}, motion {:?}",
            self.orientation,
            self.motion
        );
        state
    }

    fn current_sample(&self) -> ExternalForceSample {
        let readings = self.feed.0.get();
        ExternalForceSample {
            tilt: readings
                .orientation
                .filter(|_| self.orientation.allows())
                .map(|o| o.tilt()),
            device_acceleration: readings
                .acceleration
                .filter(|_| self.motion.allows())
                .map(|a| a.truncate()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_motion_is_empty() {
        let mut m = NoMotion;
        assert_eq!(m.request_permission(), Permission::NotRequired);
        assert!(m.current_sample().is_empty());
    }

    #[test]
    fn test_ungated_device_reports_immediately() {
        let mut device = DeviceMotion::new(false);
        let feed = device.feed();
        assert_eq!(device.request_permission(), Permission::NotRequired);
        feed.orientation(0.0, 30.0, -15.0);
        feed.motion(1.5, -0.5, 9.8);

        let sample = device.current_sample();
        assert_eq!(sample.tilt, Some(Vec2::new(-15.0, 30.0)));
        assert_eq!(sample.device_acceleration, Some(Vec2::new(1.5, -0.5)));
    }

    #[test]
    fn test_gated_device_silent_until_granted() {
        let mut device = DeviceMotion::new(true);
        let feed = device.feed();
        feed.orientation(0.0, 10.0, 20.0);
        assert_eq!(device.request_permission(), Permission::Prompt);
        assert!(device.current_sample().is_empty());

        device.resolve_permission(SensorChannel::Orientation, true);
        assert_eq!(device.permission(SensorChannel::Orientation), Permission::Granted);
        assert_eq!(device.permission(SensorChannel::Motion), Permission::Prompt);
        assert_eq!(device.request_permission(), Permission::Granted);
        assert_eq!(device.current_sample().tilt, Some(Vec2::new(20.0, 10.0)));
    }

    #[test]
    fn test_denied_channels_read_as_gravity() {
        let mut device = DeviceMotion::new(true);
        let feed = device.feed();
        feed.orientation(0.0, 10.0, 20.0);
        feed.motion(1.0, 1.0, 1.0);
        device.resolve_permission(SensorChannel::Orientation, false);
        device.resolve_permission(SensorChannel::Motion, false);
        assert_eq!(device.request_permission(), Permission::Denied);
        assert!(device.current_sample().is_empty());
    }

    #[test]
    fn test_latest_reading_wins_and_clear_resets() {
        let device = DeviceMotion::new(false);
        let feed = device.feed();
        feed.motion(1.0, 0.0, 0.0);
        feed.motion(2.0, 3.0, 0.0);
        assert_eq!(device.current_sample().device_acceleration, Some(Vec2::new(2.0, 3.0)));
        feed.clear();
        assert!(device.current_sample().is_empty());
    }
}
