// extensions/easing.rs
//
// Blend curve for focus switches. f64 so blended distances keep full
// precision at astronomical scales.

/// Quintic smoothstep 6t⁵ − 15t⁴ + 10t³: zero velocity and acceleration
/// at both ends. Unclamped.
#[inline]
pub fn smootherstep(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
