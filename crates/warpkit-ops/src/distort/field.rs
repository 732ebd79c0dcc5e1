//! Line-pair field warp (Beier-Neely).
//!
//! Each pair of lines says "the image near `in_line` should end up near
//! `out_line`". Every destination pixel is located relative to each
//! (intermediate) line by its position along the line and its signed
//! distance from it, the same relative position is looked up against the
//! matching input line, and the candidate source points are averaged with
//! weights that favour long, close lines.
//!
//! `amount` interpolates the lines the destination is measured against:
//! 0 uses the input lines (no movement), 1 the output lines.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use warpkit_core::Rect;
use warpkit_math::lerp;

use crate::InverseMapping;

/// Constant added to line distances to keep weights finite on the line.
const DISTANCE_BIAS: f32 = 0.001;

/// A directed line segment from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Line {
    /// Start x.
    pub x1: f32,
    /// Start y.
    pub y1: f32,
    /// End x.
    pub x2: f32,
    /// End y.
    pub y2: f32,
}

impl Line {
    /// Creates a line segment.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(&self) -> f32 {
        let (dx, dy) = (self.x2 - self.x1, self.y2 - self.y1);
        dx * dx + dy * dy
    }

    /// Length.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Line between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(&self, t: f32, other: &Line) -> Line {
        Line {
            x1: lerp(self.x1, other.x1, t),
            y1: lerp(self.y1, other.y1, t),
            x2: lerp(self.x2, other.x2, t),
            y2: lerp(self.y2, other.y2, t),
        }
    }
}

/// Beier-Neely field warp driven by pairs of lines.
///
/// Lines are paired by index; extra lines in the longer list are ignored,
/// as are pairs where either line has zero length. With no usable pair
/// the mapping is the identity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldWarp {
    /// Lines in the source image.
    pub in_lines: Vec<Line>,
    /// Where the source lines should move to.
    pub out_lines: Vec<Line>,
    /// Blend between input (0) and output (1) line positions.
    pub amount: f32,
    /// Exponent applied to line length in the weight.
    pub power: f32,
    /// How quickly a line's influence falls off with distance.
    pub strength: f32,
}

impl Default for FieldWarp {
    fn default() -> Self {
        Self {
            in_lines: Vec::new(),
            out_lines: Vec::new(),
            amount: 1.0,
            power: 1.0,
            strength: 2.0,
        }
    }
}

impl FieldWarp {
    /// Creates a warp from paired line lists with default weighting.
    pub fn new(in_lines: Vec<Line>, out_lines: Vec<Line>) -> Self {
        Self {
            in_lines,
            out_lines,
            ..Self::default()
        }
    }
}

impl InverseMapping for FieldWarp {
    fn map_inverse(&self, x: i32, y: i32, _source: &Rect) -> (f32, f32) {
        let (px, py) = (x as f32, y as f32);
        let falloff = 1.5 * self.strength + 0.5;

        let mut total_weight = 0.0f32;
        let (mut sum_x, mut sum_y) = (0.0f32, 0.0f32);

        for (src_line, dst_line) in self.in_lines.iter().zip(&self.out_lines) {
            let line = src_line.lerp(self.amount, dst_line);
            let (len2, src_len) = (line.length_squared(), src_line.length());
            if len2 <= 0.0 || src_len <= 0.0 {
                continue;
            }
            let len = len2.sqrt();
            let (ldx, ldy) = (line.x2 - line.x1, line.y2 - line.y1);
            let (dx, dy) = (px - line.x1, py - line.y1);

            let fraction = (dx * ldx + dy * ldy) / len2;
            let fdist = (dy * ldx - dx * ldy) / len;
            let distance = if fraction <= 0.0 {
                (dx * dx + dy * dy).sqrt()
            } else if fraction >= 1.0 {
                let (ex, ey) = (px - line.x2, py - line.y2);
                (ex * ex + ey * ey).sqrt()
            } else {
                fdist.abs()
            };

            let (sdx, sdy) = (src_line.x2 - src_line.x1, src_line.y2 - src_line.y1);
            let u = src_line.x1 + fraction * sdx - fdist * sdy / src_len;
            let v = src_line.y1 + fraction * sdy + fdist * sdx / src_len;

            let weight = (len.powf(self.power) / (DISTANCE_BIAS + distance)).powf(falloff);
            sum_x += (u - px) * weight;
            sum_y += (v - py) * weight;
            total_weight += weight;
        }

        if total_weight <= 0.0 || !total_weight.is_finite() {
            return (px, py);
        }
        (px + sum_x / total_weight, py + sum_y / total_weight)
    }
}
