//! Affine warps: rotation, scaling, shear and integer offsets.

use glam::{Affine2, Mat2, Vec2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use warpkit_core::Rect;

use crate::{EdgeAction, InverseMapping, OpsError, OpsResult, TransformOptions};

/// Determinants below this are treated as singular.
const MIN_DETERMINANT: f32 = 1e-8;

/// An invertible 2D affine warp.
///
/// Stores the forward matrix (source to destination) together with its
/// inverse, which is what the engine evaluates per pixel.
///
/// With `resize` the output grows to the bounding box of the transformed
/// source corners, which may start at negative coordinates. Without it
/// the output keeps the source rectangle and corners are cut off.
///
/// # Example
///
/// ```rust
/// use warpkit_core::PixelBuffer;
/// use warpkit_ops::{apply, distort::AffineWarp};
///
/// let src = PixelBuffer::filled(20, 10, 0xffffffff).unwrap();
/// let rotate = AffineWarp::rotate(std::f32::consts::FRAC_PI_4).with_resize(true);
/// let out = apply(&src, &rotate).unwrap();
/// assert!(out.width() > 20 && out.height() > 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "AffineParams", into = "AffineParams"))]
pub struct AffineWarp {
    forward: Affine2,
    inverse: Affine2,
    /// Grow the output to fit the transformed image.
    pub resize: bool,
}

impl Default for AffineWarp {
    fn default() -> Self {
        Self {
            forward: Affine2::IDENTITY,
            inverse: Affine2::IDENTITY,
            resize: false,
        }
    }
}

impl AffineWarp {
    /// Creates a warp from its forward matrix.
    ///
    /// Fails with [`OpsError::InvalidParameter`] if the matrix is singular
    /// or not finite.
    pub fn new(forward: Affine2) -> OpsResult<Self> {
        let det = forward.matrix2.determinant();
        if !det.is_finite() || det.abs() < MIN_DETERMINANT || !forward.translation.is_finite() {
            return Err(OpsError::InvalidParameter(format!(
                "affine matrix is not invertible (determinant {det})"
            )));
        }
        Ok(Self {
            forward,
            inverse: forward.inverse(),
            resize: false,
        })
    }

    /// Rotation by `angle` radians around the origin.
    ///
    /// Positive angles turn the image counter-clockwise on screen
    /// (y pointing down).
    pub fn rotate(angle: f32) -> Self {
        let forward = Affine2::from_angle(-angle);
        Self {
            forward,
            inverse: forward.inverse(),
            resize: false,
        }
    }

    /// Scaling by `(sx, sy)` around the origin.
    pub fn scale(sx: f32, sy: f32) -> OpsResult<Self> {
        Self::new(Affine2::from_scale(Vec2::new(sx, sy)))
    }

    /// Shear by `x_angle` and `y_angle` radians.
    ///
    /// A destination pixel `(x, y)` reads the source at
    /// `(x + y sin(x_angle), y + x sin(y_angle))`.
    pub fn shear(x_angle: f32, y_angle: f32) -> OpsResult<Self> {
        let inverse = Affine2::from_mat2(Mat2::from_cols(
            Vec2::new(1.0, y_angle.sin()),
            Vec2::new(x_angle.sin(), 1.0),
        ));
        let det = inverse.matrix2.determinant();
        if det.abs() < MIN_DETERMINANT {
            return Err(OpsError::InvalidParameter(format!(
                "shear angles {x_angle}, {y_angle} collapse the image"
            )));
        }
        Ok(Self {
            forward: inverse.inverse(),
            inverse,
            resize: false,
        })
    }

    /// Sets whether the output grows to fit the transformed image.
    pub fn with_resize(mut self, resize: bool) -> Self {
        self.resize = resize;
        self
    }

    /// Source to destination matrix.
    pub fn forward(&self) -> Affine2 {
        self.forward
    }

    /// Destination to source matrix.
    pub fn inverse(&self) -> Affine2 {
        self.inverse
    }
}

/// Rounds values within float noise of an integer, so a 90 degree turn of
/// a 10 pixel edge does not produce an 11 pixel bound.
#[inline]
fn snap(v: f32) -> f32 {
    let r = v.round();
    if (v - r).abs() < 1e-3 { r } else { v }
}

impl InverseMapping for AffineWarp {
    #[inline]
    fn map_inverse(&self, x: i32, y: i32, _source: &Rect) -> (f32, f32) {
        self.inverse.transform_point2(Vec2::new(x as f32, y as f32)).into()
    }

    fn output_bounds(&self, source: &Rect) -> Rect {
        if !self.resize {
            return *source;
        }
        Rect::bounding(source.corners().map(|(x, y)| {
            let p = self.forward.transform_point2(Vec2::new(x, y));
            (snap(p.x), snap(p.y))
        }))
    }
}

/// Shifts the image by whole pixels.
///
/// With `wrap` the pixels pushed off one edge come back in on the
/// opposite edge; without it the vacated strip is left to the edge
/// policy, which defaults to transparent black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Offset {
    /// Horizontal shift in pixels; positive moves content right.
    pub x: i32,
    /// Vertical shift in pixels; positive moves content down.
    pub y: i32,
    /// Wrap around instead of exposing the edge.
    pub wrap: bool,
}

impl Default for Offset {
    fn default() -> Self {
        Self { x: 0, y: 0, wrap: true }
    }
}

impl Offset {
    /// Creates a wrapping offset.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y, wrap: true }
    }
}

impl InverseMapping for Offset {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let sx = x as i64 - self.x as i64;
        let sy = y as i64 - self.y as i64;
        let (w, h) = (source.width as i64, source.height as i64);
        if !self.wrap || w == 0 || h == 0 {
            return (sx as f32, sy as f32);
        }
        let (ox, oy) = (source.x as i64, source.y as i64);
        ((ox + (sx - ox).rem_euclid(w)) as f32, (oy + (sy - oy).rem_euclid(h)) as f32)
    }

    fn default_options(&self) -> TransformOptions {
        TransformOptions::with_edge(EdgeAction::Zero)
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct AffineParams {
    forward: Affine2,
    #[serde(default)]
    resize: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<AffineParams> for AffineWarp {
    type Error = OpsError;

    fn try_from(params: AffineParams) -> OpsResult<Self> {
        Ok(Self::new(params.forward)?.with_resize(params.resize))
    }
}

#[cfg(feature = "serde")]
impl From<AffineWarp> for AffineParams {
    fn from(warp: AffineWarp) -> Self {
        Self {
            forward: warp.forward,
            resize: warp.resize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distort::testing::gradient;
    use warpkit_core::PixelBuffer;
    use crate::{EdgeAction, Interpolation, TransformOptions, apply, transform};
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_rotate_zero_is_identity() {
        let src = gradient(17, 9);
        let out = apply(&src, &AffineWarp::rotate(0.0)).unwrap();
        assert_eq!(out, src);
        let out = apply(&src, &AffineWarp::rotate(0.0).with_resize(true)).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_rotate_forward_convention() {
        // forward maps (x, y) to (x cos + y sin, y cos - x sin)
        let warp = AffineWarp::rotate(0.3);
        let p = warp.forward().transform_point2(Vec2::new(2.0, 5.0));
        assert_relative_eq!(p.x, 2.0 * 0.3f32.cos() + 5.0 * 0.3f32.sin(), epsilon = 1e-5);
        assert_relative_eq!(p.y, 5.0 * 0.3f32.cos() - 2.0 * 0.3f32.sin(), epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_resize_grows_bounds() {
        let warp = AffineWarp::rotate(FRAC_PI_4).with_resize(true);
        let b = warp.output_bounds(&Rect::from_size(100, 50));
        assert!(b.width > 100);
        assert!(b.height > 50);

        let quarter = AffineWarp::rotate(FRAC_PI_2).with_resize(true);
        let b = quarter.output_bounds(&Rect::from_size(10, 4));
        assert_eq!((b.width, b.height), (4, 10));
        assert!(b.x < 0 || b.y < 0);
    }

    #[test]
    fn test_quarter_turn_moves_pixels() {
        let src = gradient(6, 4);
        let warp = AffineWarp::rotate(FRAC_PI_2).with_resize(true);
        let options = TransformOptions {
            edge_action: EdgeAction::Zero,
            interpolation: Interpolation::Bilinear,
        };
        let out = transform(&src, &warp, &options).unwrap();
        assert_eq!(out.dimensions(), (4, 6));
        let bounds = warp.output_bounds(&src.rect());
        // every output pixel lands on a source pixel up to float noise
        for oy in 0..6 {
            for ox in 0..4 {
                let (sx, sy) = warp.map_inverse(bounds.x + ox, bounds.y + oy, &src.rect());
                let (sx, sy) = (sx.round() as u32, sy.round() as u32);
                if let Some(expected) = src.get(sx, sy) {
                    assert_eq!(out.get(ox as u32, oy as u32), Some(expected));
                }
            }
        }
    }

    #[test]
    fn test_scale_and_singular() {
        let warp = AffineWarp::scale(2.0, 2.0).unwrap().with_resize(true);
        assert_eq!(warp.output_bounds(&Rect::from_size(5, 3)), Rect::from_size(10, 6));
        assert!(matches!(AffineWarp::scale(0.0, 1.0), Err(OpsError::InvalidParameter(_))));
        assert!(AffineWarp::new(Affine2::from_scale(Vec2::new(f32::NAN, 1.0))).is_err());
    }

    #[test]
    fn test_shear_inverse_formula() {
        let warp = AffineWarp::shear(0.2, 0.1).unwrap();
        let (sx, sy) = warp.map_inverse(3, 7, &Rect::from_size(10, 10));
        assert_relative_eq!(sx, 3.0 + 7.0 * 0.2f32.sin(), epsilon = 1e-5);
        assert_relative_eq!(sy, 7.0 + 3.0 * 0.1f32.sin(), epsilon = 1e-5);
        assert!(AffineWarp::shear(FRAC_PI_2, FRAC_PI_2).is_err());
    }

    #[test]
    fn test_offset_wraps_around() {
        let src = PixelBuffer::from_vec(4, 1, vec![0xff000000, 0xff000001, 0xff000002, 0xff000003]).unwrap();
        let out = apply(&src, &Offset::new(1, 0)).unwrap();
        assert_eq!(out.as_slice(), &[0xff000003, 0xff000000, 0xff000001, 0xff000002]);

        let out = apply(&src, &Offset::new(-1, 5)).unwrap();
        assert_eq!(out.as_slice(), &[0xff000001, 0xff000002, 0xff000003, 0xff000000]);
    }

    #[test]
    fn test_offset_without_wrap_exposes_edge() {
        let src = gradient(6, 5);
        let offset = Offset { x: 2, y: 1, wrap: false };
        let out = apply(&src, &offset).unwrap();
        assert_eq!(out.dimensions(), (6, 5));
        assert_eq!(out.get(1, 3), Some(0));
        assert_eq!(out.get(4, 0), Some(0));
        assert_eq!(out.get(2, 1), src.get(0, 0));
        assert_eq!(out.get(5, 4), src.get(3, 3));
    }

    #[test]
    fn test_offset_large_shift_wraps_once() {
        let offset = Offset::new(-23, 9);
        let source = Rect::from_size(10, 4);
        assert_eq!(offset.map_inverse(0, 0, &source), (3.0, 3.0));
        assert_eq!(offset.map_inverse(9, 3, &source), (2.0, 2.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip_rebuilds_inverse() {
        let warp = AffineWarp::rotate(0.7).with_resize(true);
        let json = serde_json::to_string(&warp).unwrap();
        let back: AffineWarp = serde_json::from_str(&json).unwrap();
        assert!(back.resize);
        assert_relative_eq!(back.inverse().matrix2.x_axis.x, warp.inverse().matrix2.x_axis.x, epsilon = 1e-6);
    }
}
