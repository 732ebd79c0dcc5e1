//! Perspective (projective) warp of the image onto a quadrilateral.

use glam::{Mat3, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use warpkit_core::Rect;

use crate::{InverseMapping, OpsError, OpsResult};

const EPSILON: f32 = 1e-8;

/// Maps the image onto an arbitrary quadrilateral.
///
/// Corners are given in unit coordinates, in order top-left, top-right,
/// bottom-right, bottom-left of the source, and are scaled by the source
/// size when the warp runs. `[(0, 0), (1, 0), (1, 1), (0, 1)]` is the
/// identity.
///
/// Without `clip` the output grows to the bounding box of the quad;
/// with `clip` it keeps the source rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "PerspectiveParams", into = "PerspectiveParams"))]
pub struct Perspective {
    corners: [(f32, f32); 4],
    forward: Mat3,
    inverse: Mat3,
    /// Keep the source bounds instead of growing to the quad.
    pub clip: bool,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            corners: [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            forward: Mat3::IDENTITY,
            inverse: Mat3::IDENTITY,
            clip: false,
        }
    }
}

impl Perspective {
    /// Builds the projection of the unit square onto `corners`.
    ///
    /// Fails with [`OpsError::InvalidParameter`] when the quad is
    /// degenerate (collinear or coincident corners).
    pub fn new(corners: [(f32, f32); 4]) -> OpsResult<Self> {
        let forward = unit_square_to_quad(&corners)?;
        let det = forward.determinant();
        if !det.is_finite() || det.abs() < EPSILON {
            return Err(OpsError::InvalidParameter(format!(
                "perspective quad {corners:?} is degenerate"
            )));
        }
        Ok(Self {
            corners,
            forward,
            inverse: forward.inverse(),
            clip: false,
        })
    }

    /// Sets whether the output keeps the source bounds.
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Quad corners in unit coordinates.
    pub fn corners(&self) -> [(f32, f32); 4] {
        self.corners
    }

    /// Unit square to quad homography.
    pub fn forward(&self) -> Mat3 {
        self.forward
    }

    /// Projects a unit-square point onto the quad.
    pub fn project(&self, u: f32, v: f32) -> (f32, f32) {
        let p = self.forward * Vec3::new(u, v, 1.0);
        (p.x / p.z, p.y / p.z)
    }
}

/// Heckbert's closed form for the square-to-quad projection.
fn unit_square_to_quad(corners: &[(f32, f32); 4]) -> OpsResult<Mat3> {
    let [(x0, y0), (x1, y1), (x2, y2), (x3, y3)] = *corners;
    let (dx1, dy1) = (x1 - x2, y1 - y2);
    let (dx2, dy2) = (x3 - x2, y3 - y2);
    let (dx3, dy3) = (x0 - x1 + x2 - x3, y0 - y1 + y2 - y3);

    let cols = if dx3.abs() < EPSILON && dy3.abs() < EPSILON {
        // parallelogram: affine
        [
            Vec3::new(x1 - x0, y1 - y0, 0.0),
            Vec3::new(x2 - x1, y2 - y1, 0.0),
        ]
    } else {
        let den = dx1 * dy2 - dy1 * dx2;
        if den.abs() < EPSILON {
            return Err(OpsError::InvalidParameter(format!(
                "perspective quad {corners:?} has collinear corners"
            )));
        }
        let a13 = (dx3 * dy2 - dx2 * dy3) / den;
        let a23 = (dx1 * dy3 - dy1 * dx3) / den;
        [
            Vec3::new(x1 - x0 + a13 * x1, y1 - y0 + a13 * y1, a13),
            Vec3::new(x3 - x0 + a23 * x3, y3 - y0 + a23 * y3, a23),
        ]
    };
    Ok(Mat3::from_cols(cols[0], cols[1], Vec3::new(x0, y0, 1.0)))
}

impl InverseMapping for Perspective {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (w, h) = (source.width as f32, source.height as f32);
        if w <= 0.0 || h <= 0.0 {
            return (x as f32, y as f32);
        }
        let p = self.inverse * Vec3::new(x as f32 / w, y as f32 / h, 1.0);
        if p.z.abs() < EPSILON {
            // on the horizon line: no source point
            return (-1.0, -1.0);
        }
        (w * p.x / p.z, h * p.y / p.z)
    }

    fn output_bounds(&self, source: &Rect) -> Rect {
        if self.clip || source.is_empty() {
            return *source;
        }
        let (w, h) = (source.width as f32, source.height as f32);
        Rect::bounding(self.corners.map(|(x, y)| (x * w, y * h)))
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct PerspectiveParams {
    corners: [(f32, f32); 4],
    #[serde(default)]
    clip: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<PerspectiveParams> for Perspective {
    type Error = OpsError;

    fn try_from(params: PerspectiveParams) -> OpsResult<Self> {
        Ok(Self::new(params.corners)?.with_clip(params.clip))
    }
}

#[cfg(feature = "serde")]
impl From<Perspective> for PerspectiveParams {
    fn from(p: Perspective) -> Self {
        Self {
            corners: p.corners,
            clip: p.clip,
        }
    }
}
