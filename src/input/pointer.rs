//! Pointer drag as a stand-in for device tilt
//!
//! Dragging away from the press point tilts the box toward the pointer.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use super::{MotionInput, Permission};
use crate::sim::ExternalForceSample;

/// Tilt never exceeds a quarter turn on either axis
const MAX_TILT_DEGREES: f32 = 90.0;

#[derive(Debug, Clone, Copy, Default)]
struct DragState {
    anchor: Option<Vec2>,
    current: Vec2,
}

/// Write side of a [`PointerDrag`], handed to pointer event callbacks
#[derive(Debug, Clone, Default)]
pub struct DragHandle(Rc<Cell<DragState>>);

impl DragHandle {
    pub fn press(&self, pos: Vec2) {
        self.0.set(DragState {
            anchor: Some(pos),
            current: pos,
        });
    }

    pub fn move_to(&self, pos: Vec2) {
        let mut s = self.0.get();
        s.current = pos;
        self.0.set(s);
    }

    pub fn release(&self) {
        self.0.set(DragState::default());
    }

    pub fn is_dragging(&self) -> bool {
        self.0.get().anchor.is_some()
    }
}

/// Drag-to-tilt input
#[derive(Debug, Clone)]
pub struct PointerDrag {
    handle: DragHandle,
    /// Degrees of tilt per pixel of drag
    pub degrees_per_pixel: f32,
}

impl PointerDrag {
    pub fn new(degrees_per_pixel: f32) -> Self {
        Self {
            handle: DragHandle::default(),
            degrees_per_pixel,
        }
    }

    pub fn handle(&self) -> DragHandle {
        self.handle.clone()
    }
}

impl Default for PointerDrag {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl MotionInput for PointerDrag {
    fn request_permission(&mut self) -> Permission {
        Permission::NotRequired
    }

    fn current_sample(&self) -> ExternalForceSample {
        let s = self.handle.0.get();
        let tilt = s.anchor.map(|anchor| {
            ((s.current - anchor) * self.degrees_per_pixel)
                .clamp(Vec2::splat(-MAX_TILT_DEGREES), Vec2::splat(MAX_TILT_DEGREES))
        });
        ExternalForceSample {
            tilt,
            device_acceleration: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_pointer_is_empty() {
        let drag = PointerDrag::default();
        assert!(drag.current_sample().is_empty());
    }

    #[test]
    fn test_drag_maps_to_tilt() {
        let drag = PointerDrag::new(0.5);
        let h = drag.handle();
        h.press(Vec2::new(100.0, 100.0));
        h.move_to(Vec2::new(140.0, 80.0));
        assert_eq!(drag.current_sample().tilt, Some(Vec2::new(20.0, -10.0)));
    }

    #[test]
    fn test_drag_tilt_is_clamped() {
        let drag = PointerDrag::new(1.0);
        let h = drag.handle();
        h.press(Vec2::ZERO);
        h.move_to(Vec2::new(500.0, -500.0));
        assert_eq!(drag.current_sample().tilt, Some(Vec2::new(90.0, -90.0)));
    }

    #[test]
    fn test_release_returns_to_gravity() {
        let drag = PointerDrag::default();
        let h = drag.handle();
        h.press(Vec2::ZERO);
        h.move_to(Vec2::new(10.0, 0.0));
        h.release();
        assert!(!h.is_dragging());
        assert!(drag.current_sample().is_empty());
    }
}
