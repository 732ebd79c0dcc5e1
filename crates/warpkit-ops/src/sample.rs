//! Pixel sampling at fractional source coordinates.
//!
//! A [`Sampler`] borrows a source buffer and answers "what color is at
//! `(sx, sy)`" for any float coordinate, using an [`EdgeAction`] for
//! lookups that leave the image.
//!
//! - [`Interpolation::Nearest`] truncates `(sx, sy)` towards zero. A
//!   negative coordinate always goes through the edge policy, so `-0.5`
//!   resolves against column 0 instead of reading it directly.
//! - [`Interpolation::Bilinear`] blends the four pixels around the point,
//!   each channel independently, rounding to 0-255.
//!
//! # Example
//!
//! ```rust
//! use warpkit_core::PixelBuffer;
//! use warpkit_ops::{EdgeAction, Interpolation, Sampler};
//!
//! let src = PixelBuffer::from_vec(2, 1, vec![0xff000000, 0xff0000c8]).unwrap();
//! let sampler = Sampler::new(&src, EdgeAction::Clamp, Interpolation::Bilinear);
//! assert_eq!(sampler.sample(0.5, 0.0), 0xff000064);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use warpkit_core::{PixelBuffer, argb};

use crate::EdgeAction;

/// Coordinates are clamped to this magnitude before flooring.
///
/// Keeps `floor(s) + 1` representable; at this distance every edge policy
/// already answers with a border, zero or wrapped pixel.
const COORD_LIMIT: f32 = 1.0e9;

/// Pixel interpolation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Interpolation {
    /// Pixel under the floored coordinate.
    Nearest,
    /// Four-tap bilinear blend.
    #[default]
    Bilinear,
}

/// Samples a borrowed source buffer.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    src: &'a PixelBuffer,
    edge_action: EdgeAction,
    interpolation: Interpolation,
}

impl<'a> Sampler<'a> {
    /// Creates a sampler over `src`.
    pub fn new(src: &'a PixelBuffer, edge_action: EdgeAction, interpolation: Interpolation) -> Self {
        Self {
            src,
            edge_action,
            interpolation,
        }
    }

    /// Samples at `(sx, sy)` with the configured interpolation.
    ///
    /// Never fails: NaN and infinite coordinates are resolved by the edge
    /// policy like any other out-of-range position.
    #[inline]
    pub fn sample(&self, sx: f32, sy: f32) -> u32 {
        match self.interpolation {
            Interpolation::Nearest => self.nearest(sx, sy),
            Interpolation::Bilinear => self.bilinear(sx, sy),
        }
    }

    /// Pixel at `(sx, sy)` truncated towards zero.
    #[inline]
    pub fn nearest(&self, sx: f32, sy: f32) -> u32 {
        let (sx, sy) = (limit(sx), limit(sy));
        let (ix, iy) = (sx as i64, sy as i64);
        if sx < 0.0 || sy < 0.0 {
            return self.edge_action.resolve(self.src, ix, iy);
        }
        self.edge_action.fetch(self.src, ix, iy)
    }

    /// Bilinear blend of the four pixels around `(sx, sy)`.
    #[inline]
    pub fn bilinear(&self, sx: f32, sy: f32) -> u32 {
        let (ix, fx) = split(sx);
        let (iy, fy) = split(sy);
        let (w, h) = (self.src.width() as i64, self.src.height() as i64);

        let (nw, ne, sw, se) = if ix >= 0 && iy >= 0 && ix + 1 < w && iy + 1 < h {
            let pixels = self.src.as_slice();
            let i = (iy * w + ix) as usize;
            let below = i + w as usize;
            (pixels[i], pixels[i + 1], pixels[below], pixels[below + 1])
        } else {
            let edge = self.edge_action;
            (
                edge.fetch(self.src, ix, iy),
                edge.fetch(self.src, ix + 1, iy),
                edge.fetch(self.src, ix, iy + 1),
                edge.fetch(self.src, ix + 1, iy + 1),
            )
        };
        argb::bilinear(fx, fy, nw, ne, sw, se)
    }
}

/// Replaces NaN with 0 and clamps to [`COORD_LIMIT`].
#[inline]
fn limit(s: f32) -> f32 {
    if s.is_nan() { 0.0 } else { s.clamp(-COORD_LIMIT, COORD_LIMIT) }
}

/// Splits a coordinate into its floor and fractional part.
#[inline]
fn split(s: f32) -> (i64, f32) {
    let s = limit(s);
    let base = s.floor();
    (base as i64, s - base)
}
