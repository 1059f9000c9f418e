//! 2D vector helpers
//!
//! Vectors are `glam::Vec2` values: arithmetic returns new values and
//! `normalize_or_zero` is the total normalisation (zero stays zero).

use glam::Vec2;

pub use glam::Vec2 as Vector2;

/// Zero each component whose magnitude is below `epsilon`
#[inline]
pub fn snap_small_axes(v: Vec2, epsilon: f32) -> Vec2 {
    let snap = |c: f32| if c.abs() < epsilon { 0.0 } else { c };
    Vec2::new(snap(v.x), snap(v.y))
}

/// Unit direction from `b` to `a` and the distance between them
#[inline]
pub fn separation(a: Vec2, b: Vec2) -> (Vec2, f32) {
    let delta = a - b;
    (delta.normalize_or_zero(), delta.length())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_zero() {
        let n = Vec2::ZERO.normalize_or_zero();
        assert_eq!(n, Vec2::ZERO);
        assert!(n.is_finite());
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = Vec2::new(3.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!((n.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_snap_small_axes_is_per_axis() {
        let v = snap_small_axes(Vec2::new(0.004, 3.0), 0.01);
        assert_eq!(v, Vec2::new(0.0, 3.0));
        let v = snap_small_axes(Vec2::new(-0.02, -0.005), 0.01);
        assert_eq!(v, Vec2::new(-0.02, 0.0));
    }

    #[test]
    fn test_separation_coincident_points() {
        let (n, d) = separation(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        assert_eq!(n, Vec2::ZERO);
        assert_eq!(d, 0.0);
    }
}
