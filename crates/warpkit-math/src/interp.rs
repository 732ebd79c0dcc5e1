//! Scalar interpolation helpers used by the distortion mappings.
//!
//! # Usage
//!
//! ```rust
//! use warpkit_math::{lerp, modulo, triangle};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(modulo(-1.0, 4.0), 3.0);
//! assert_eq!(triangle(0.25), 0.5);
//! ```

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
///
/// # Formula
///
/// `a + (b - a) * t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Floating point modulus whose result has the sign of `b`.
///
/// `modulo(-1.0, 4.0)` is `3.0`, unlike the `%` operator.
#[inline]
pub fn modulo(a: f32, b: f32) -> f32 {
    let r = a % b;
    if r < 0.0 { r + b } else { r }
}

/// Triangle wave with period 1 and range [0, 1].
///
/// Rises from 0 at `x = 0` to 1 at `x = 0.5` and falls back to 0 at `x = 1`.
#[inline]
pub fn triangle(x: f32) -> f32 {
    let r = modulo(x, 1.0);
    2.0 * if r < 0.5 { r } else { 1.0 - r }
}
