//! Inverse-mapping transform engine.
//!
//! Every geometric effect in this crate is expressed the same way: for each
//! destination pixel, compute where it comes from in the source, then
//! sample the source there. The effect only supplies the coordinate
//! mapping through [`InverseMapping`]; the engine owns the loop, the
//! sampling and edge handling.
//!
//! # Operations
//!
//! - [`transform`] - run a mapping with explicit [`TransformOptions`]
//! - [`transform_with_cancel`] - same, polling a [`CancelToken`] per row
//! - [`apply`] - run a mapping with its own recommended options
//!
//! # Example
//!
//! ```rust
//! use warpkit_core::PixelBuffer;
//! use warpkit_ops::{transform, Interpolation, TransformOptions};
//!
//! let src = PixelBuffer::from_fn(4, 4, |x, y| 0xff000000 | (y * 4 + x)).unwrap();
//!
//! // mirror left-right
//! let mirror = |x: i32, y: i32| (3.0 - x as f32, y as f32);
//! let options = TransformOptions {
//!     interpolation: Interpolation::Nearest,
//!     ..Default::default()
//! };
//! let out = transform(&src, &mirror, &options).unwrap();
//! assert_eq!(out.get(0, 0), src.get(3, 0));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use warpkit_core::{PixelBuffer, Rect};

use crate::{CancelToken, EdgeAction, Interpolation, OpsResult, Sampler};

/// Sampling configuration for [`transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformOptions {
    /// Policy for lookups outside the source.
    pub edge_action: EdgeAction,
    /// Pixel interpolation mode.
    pub interpolation: Interpolation,
}

impl TransformOptions {
    /// Options with the given edge policy and bilinear interpolation.
    pub fn with_edge(edge_action: EdgeAction) -> Self {
        Self {
            edge_action,
            ..Self::default()
        }
    }
}

/// A destination-to-source coordinate mapping.
///
/// Implemented by every distortion in [`crate::distort`] and, through a
/// blanket impl, by any `Fn(i32, i32) -> (f32, f32)` closure.
pub trait InverseMapping {
    /// Maps destination pixel `(x, y)` to a source coordinate.
    ///
    /// `(x, y)` are in the output coordinate space, so they start at the
    /// origin of [`output_bounds`](Self::output_bounds), which may be
    /// negative. `source` is the rectangle of the source image.
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32);

    /// Output rectangle for a given source rectangle. Defaults to the
    /// source rectangle itself.
    fn output_bounds(&self, source: &Rect) -> Rect {
        *source
    }

    /// Options this mapping works best with, used by [`apply`].
    fn default_options(&self) -> TransformOptions {
        TransformOptions::default()
    }
}

impl<F> InverseMapping for F
where
    F: Fn(i32, i32) -> (f32, f32),
{
    #[inline]
    fn map_inverse(&self, x: i32, y: i32, _source: &Rect) -> (f32, f32) {
        self(x, y)
    }
}

/// A mapping paired with an output-bounds function.
///
/// Built by [`with_bounds`].
#[derive(Debug, Clone, Copy)]
pub struct WithBounds<M, B> {
    mapping: M,
    bounds: B,
}

/// Attaches an output-bounds function to a mapping.
///
/// # Example
///
/// ```rust
/// use warpkit_core::{PixelBuffer, Rect};
/// use warpkit_ops::{transform, with_bounds, TransformOptions};
///
/// // upscale 2x into a larger canvas
/// let zoom = with_bounds(
///     |x: i32, y: i32| (x as f32 * 0.5, y as f32 * 0.5),
///     |r: &Rect| Rect::new(r.x, r.y, r.width * 2, r.height * 2),
/// );
/// let src = PixelBuffer::filled(3, 2, 0xff102030).unwrap();
/// let out = transform(&src, &zoom, &TransformOptions::default()).unwrap();
/// assert_eq!(out.dimensions(), (6, 4));
/// ```
pub fn with_bounds<M, B>(mapping: M, bounds: B) -> WithBounds<M, B>
where
    M: InverseMapping,
    B: Fn(&Rect) -> Rect,
{
    WithBounds { mapping, bounds }
}

impl<M, B> InverseMapping for WithBounds<M, B>
where
    M: InverseMapping,
    B: Fn(&Rect) -> Rect,
{
    #[inline]
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        self.mapping.map_inverse(x, y, source)
    }

    fn output_bounds(&self, source: &Rect) -> Rect {
        (self.bounds)(source)
    }

    fn default_options(&self) -> TransformOptions {
        self.mapping.default_options()
    }
}

/// Resamples `src` through `mapping`.
///
/// The output has the size of `mapping.output_bounds(src.rect())`. Each
/// output pixel `(x, y)` is sampled at
/// `mapping.map_inverse(bounds.x + x, bounds.y + y, &src.rect())`.
///
/// Out-of-range source coordinates are resolved by
/// `options.edge_action`; only buffer allocation can fail.
pub fn transform<M>(src: &PixelBuffer, mapping: &M, options: &TransformOptions) -> OpsResult<PixelBuffer>
where
    M: InverseMapping + ?Sized,
{
    run(src, mapping, options, None)
}

/// Like [`transform`], but checks `cancel` before every output row.
///
/// Returns [`OpsError::Cancelled`](crate::OpsError::Cancelled) without a
/// partial result once cancellation is requested.
pub fn transform_with_cancel<M>(
    src: &PixelBuffer,
    mapping: &M,
    options: &TransformOptions,
    cancel: &CancelToken,
) -> OpsResult<PixelBuffer>
where
    M: InverseMapping + ?Sized,
{
    run(src, mapping, options, Some(cancel))
}

/// Runs `mapping` with the options it recommends.
pub fn apply<M>(src: &PixelBuffer, mapping: &M) -> OpsResult<PixelBuffer>
where
    M: InverseMapping + ?Sized,
{
    let options = mapping.default_options();
    run(src, mapping, &options, None)
}

fn run<M>(
    src: &PixelBuffer,
    mapping: &M,
    options: &TransformOptions,
    cancel: Option<&CancelToken>,
) -> OpsResult<PixelBuffer>
where
    M: InverseMapping + ?Sized,
{
    let source = src.rect();
    let bounds = mapping.output_bounds(&source);
    debug!(
        width = src.width(),
        height = src.height(),
        out_x = bounds.x,
        out_y = bounds.y,
        out_width = bounds.width,
        out_height = bounds.height,
        edge = ?options.edge_action,
        interpolation = ?options.interpolation,
        "transform"
    );

    let mut out = PixelBuffer::new(bounds.width, bounds.height)?;
    let sampler = Sampler::new(src, options.edge_action, options.interpolation);

    for row in 0..bounds.height {
        if let Some(token) = cancel {
            token.check()?;
        }
        let y = (bounds.y as i64 + row as i64) as i32;
        for (col, px) in out.row_mut(row).iter_mut().enumerate() {
            let x = (bounds.x as i64 + col as i64) as i32;
            let (sx, sy) = mapping.map_inverse(x, y, &source);
            *px = sampler.sample(sx, sy);
        }
    }

    trace!(pixels = bounds.area(), "transform done");
    Ok(out)
}
