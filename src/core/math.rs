// Math utilities and helper functions

use glam::{Vec2, Vec3};

/// Clamp a value between min and max
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Inverse linear interpolation: where `value` sits between `a` and `b` (0..1, clamped)
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    clamp((value - a) / (b - a), 0.0, 1.0)
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Horizontal (ground-plane) part of a world vector.
/// Combat runs on the x/z plane; y is reserved for vertical impulses.
pub fn planar(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Lift a ground-plane vector back into world space (y = 0)
pub fn unplanar(v: Vec2) -> Vec3 {
    Vec3::new(v.x, 0.0, v.y)
}

/// Replace the horizontal part of a world vector, preserving y
pub fn with_planar(v: Vec3, horizontal: Vec2) -> Vec3 {
    Vec3::new(horizontal.x, v.y, horizontal.y)
}

/// Normalize a planar vector, or return zero if it is (near) zero
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > f32::EPSILON {
        v / len_sq.sqrt()
    } else {
        Vec2::ZERO
    }
}
