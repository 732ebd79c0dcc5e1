//! Distortion effects built on the transform engine.
//!
//! Each effect is a small parameter struct implementing
//! [`InverseMapping`](crate::InverseMapping). Parameters are public and
//! every struct has a `Default`, so presets can be built with struct
//! update syntax and, with the `serde` feature, persisted.
//!
//! # Effects
//!
//! - [`AffineWarp`] - rotate, scale, shear or any invertible 2x3 matrix
//! - [`Offset`] - whole-pixel shift, optionally wrapping
//! - [`Twirl`] - rotation that fades out towards a radius
//! - [`Pinch`] - pinch/bulge with optional twist
//! - [`Sphere`] - refraction through an ellipsoidal lens
//! - [`Water`] - circular ripples
//! - [`Polar`] - rectangular/polar coordinate conversion
//! - [`Circle`] - image bent into a ring
//! - [`Kaleidoscope`] - mirrored angular segments
//! - [`Perspective`] - unit square to quad projection
//! - [`FieldWarp`] - line-pair field morph
//!
//! Centres are relative: `centre_x = 0.5` is the middle of the source
//! width. Radii are in pixels.
//!
//! # Example
//!
//! ```rust
//! use warpkit_core::PixelBuffer;
//! use warpkit_ops::apply;
//! use warpkit_ops::distort::Twirl;
//!
//! let src = PixelBuffer::filled(32, 32, 0xff336699).unwrap();
//! let twirl = Twirl { angle: 1.5, radius: 12.0, ..Default::default() };
//! let out = apply(&src, &twirl).unwrap();
//! assert_eq!(out.dimensions(), (32, 32));
//! ```

mod affine;
mod field;
mod perspective;
mod polar;
mod radial;

pub use affine::{AffineWarp, Offset};
pub use field::{FieldWarp, Line};
pub use perspective::Perspective;
pub use polar::{Circle, Kaleidoscope, Polar, PolarMode};
pub use radial::{Pinch, Sphere, Twirl, Water};

use warpkit_core::Rect;

/// Absolute centre in pixels for a relative centre.
#[inline]
fn centre(source: &Rect, cx: f32, cy: f32) -> (f32, f32) {
    (
        source.x as f32 + source.width as f32 * cx,
        source.y as f32 + source.height as f32 * cy,
    )
}
