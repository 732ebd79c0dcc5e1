//! Polar coordinate conversions, circle wrapping and the kaleidoscope.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use warpkit_core::Rect;
use warpkit_math::{modulo, triangle};

use super::centre;
use crate::{EdgeAction, InverseMapping, TransformOptions};

/// Direction of a [`Polar`] conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PolarMode {
    /// Unrolls the image around its centre: x becomes angle, y radius.
    #[default]
    RectToPolar,
    /// Rolls the image up: x is read as angle, y as radius.
    PolarToRect,
    /// Inversion in a circle around the centre.
    InvertInCircle,
}

/// Polar coordinate conversion around the image centre.
///
/// Angles are measured clockwise from straight up. The radius spans
/// `max(width, height) / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Polar {
    /// Conversion direction.
    pub mode: PolarMode,
}

impl Polar {
    /// Creates a conversion in the given direction.
    pub fn new(mode: PolarMode) -> Self {
        Self { mode }
    }
}

impl InverseMapping for Polar {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (w, h) = (source.width as f32, source.height as f32);
        let (cx, cy) = centre(source, 0.5, 0.5);
        let radius = (w / 2.0).max(h / 2.0);
        let (fx, fy) = (x as f32, y as f32);

        match self.mode {
            PolarMode::RectToPolar => {
                let (dx, dy) = (fx - cx, fy - cy);
                let r = (dx * dx + dy * dy).sqrt();
                let mut theta = dx.atan2(-dy);
                if theta < 0.0 {
                    theta += TAU;
                }
                let sx = (w - 1.0) - (w - 1.0) / TAU * theta;
                let sy = if radius > 0.0 { h * r / radius } else { 0.0 };
                (sx, sy)
            }
            PolarMode::PolarToRect => {
                if w <= 0.0 || h <= 0.0 {
                    return (fx, fy);
                }
                let theta = fx / w * TAU;
                let r = radius * fy / h;
                let (s, c) = theta.sin_cos();
                (cx - r * s, cy - r * c)
            }
            PolarMode::InvertInCircle => {
                let (dx, dy) = (fx - cx, fy - cy);
                let d2 = dx * dx + dy * dy;
                if d2 == 0.0 {
                    return (fx, fy);
                }
                (cx + cx * cx * dx / d2, cy + cy * cy * dy / d2)
            }
        }
    }

    fn default_options(&self) -> TransformOptions {
        TransformOptions::with_edge(EdgeAction::Clamp)
    }
}

/// Bends the image into a ring around a centre point.
///
/// The source width is spread over `spread_angle` radians, measured from
/// the negative x axis, and the source height over the band between
/// `radius` and `radius + height`. The bottom of the source lands on the
/// inner edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Circle {
    /// Inner radius of the ring in pixels.
    pub radius: f32,
    /// Thickness of the ring in pixels.
    pub height: f32,
    /// Rotation of the ring, in radians.
    pub angle: f32,
    /// Arc covered by the source width, in radians.
    pub spread_angle: f32,
    /// Relative centre x.
    pub centre_x: f32,
    /// Relative centre y.
    pub centre_y: f32,
}

impl Default for Circle {
    fn default() -> Self {
        Self {
            radius: 10.0,
            height: 20.0,
            angle: 0.0,
            spread_angle: PI,
            centre_x: 0.5,
            centre_y: 0.5,
        }
    }
}

impl InverseMapping for Circle {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (icx, icy) = centre(source, self.centre_x, self.centre_y);
        let (dx, dy) = (x as f32 - icx, y as f32 - icy);
        let theta = modulo((-dy).atan2(-dx) + self.angle, TAU);
        let r = (dx * dx + dy * dy).sqrt();

        // the 1e-5 keeps a zero spread or height finite
        let span = (source.width as f32 - 1.0).max(0.0);
        let sx = span * theta / (self.spread_angle + 1e-5);
        let sy = source.height as f32 * (1.0 - (r - self.radius) / (self.height + 1e-5));
        (sx, sy)
    }

    fn default_options(&self) -> TransformOptions {
        TransformOptions::with_edge(EdgeAction::Zero)
    }
}

/// Mirrors one angular wedge of the image around the centre.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Kaleidoscope {
    /// Rotation of the mirrored wedge, in radians.
    pub angle: f32,
    /// Rotation of the output, in radians.
    pub angle2: f32,
    /// Relative centre x.
    pub centre_x: f32,
    /// Relative centre y.
    pub centre_y: f32,
    /// Number of mirrored segments.
    pub sides: u32,
    /// Fold radius in pixels; 0 disables radial folding.
    pub radius: f32,
}

impl Default for Kaleidoscope {
    fn default() -> Self {
        Self {
            angle: 0.0,
            angle2: 0.0,
            centre_x: 0.5,
            centre_y: 0.5,
            sides: 3,
            radius: 0.0,
        }
    }
}

impl Kaleidoscope {
    /// Folds an offset from the centre into the first wedge.
    fn fold(&self, dx: f32, dy: f32) -> (f32, f32) {
        let mut r = (dx * dx + dy * dy).sqrt();
        let mut theta = dy.atan2(dx) - self.angle - self.angle2;
        theta = triangle(theta / PI * self.sides as f32 * 0.5);
        if self.radius != 0.0 {
            let rc = self.radius / theta.cos();
            r = rc * triangle(r / rc);
        }
        theta += self.angle;
        (r * theta.cos(), r * theta.sin())
    }
}

impl InverseMapping for Kaleidoscope {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (icx, icy) = centre(source, self.centre_x, self.centre_y);
        let (ox, oy) = self.fold(x as f32 - icx, y as f32 - icy);
        (icx + ox, icy + oy)
    }

    fn default_options(&self) -> TransformOptions {
        TransformOptions::with_edge(EdgeAction::Clamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply;
    use crate::distort::testing::gradient;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;
    use warpkit_core::argb;

    const SRC: Rect = Rect::from_size(100, 60);

    #[test]
    fn test_rect_to_polar_axes() {
        let polar = Polar::new(PolarMode::RectToPolar);
        // straight up: angle 0, right edge of the strip
        let (sx, sy) = polar.map_inverse(50, 10, &SRC);
        assert_relative_eq!(sx, 99.0);
        assert_relative_eq!(sy, 60.0 * 20.0 / 50.0);
        // straight right: a quarter turn clockwise
        let (sx, _) = polar.map_inverse(70, 30, &SRC);
        assert_relative_eq!(sx, 99.0 - 99.0 / 4.0, epsilon = 1e-3);
        // straight left: three quarters
        let (sx, _) = polar.map_inverse(30, 30, &SRC);
        assert_relative_eq!(sx, 99.0 - 99.0 * 0.75, epsilon = 1e-3);
    }

    #[test]
    fn test_polar_to_rect_axes() {
        let polar = Polar::new(PolarMode::PolarToRect);
        // x = 0 points straight up
        let (sx, sy) = polar.map_inverse(0, 30, &SRC);
        assert_relative_eq!(sx, 50.0);
        assert_relative_eq!(sy, 30.0 - 25.0);
        // y = 0 is the centre for every angle
        for x in [0, 25, 77] {
            let (sx, sy) = polar.map_inverse(x, 0, &SRC);
            assert_relative_eq!(sx, 50.0, epsilon = 1e-4);
            assert_relative_eq!(sy, 30.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_invert_in_circle() {
        let polar = Polar::new(PolarMode::InvertInCircle);
        assert_eq!(polar.map_inverse(50, 30, &SRC), (50.0, 30.0));
        let (sx, sy) = polar.map_inverse(60, 30, &SRC);
        assert_relative_eq!(sx, 50.0 + 2500.0 * 10.0 / 100.0);
        assert_relative_eq!(sy, 30.0);
    }

    #[test]
    fn test_circle_axes() {
        let circle = Circle::default();
        let src = Rect::from_size(100, 100);
        let spread = PI + 1e-5;

        // left of the centre on the inner edge: first column, bottom row
        let (sx, sy) = circle.map_inverse(40, 50, &src);
        assert_relative_eq!(sx, 0.0, epsilon = 1e-2);
        assert_relative_eq!(sy, 100.0, epsilon = 1e-2);

        // a quarter turn clockwise, straight up
        let (sx, sy) = circle.map_inverse(50, 40, &src);
        assert_relative_eq!(sx, 99.0 * FRAC_PI_2 / spread, epsilon = 1e-2);
        assert_relative_eq!(sy, 100.0, epsilon = 1e-2);

        // halfway through the ring on the right: last column, middle row
        let (sx, sy) = circle.map_inverse(70, 50, &src);
        assert_relative_eq!(sx, 99.0 * PI / spread, epsilon = 1e-2);
        assert_relative_eq!(sy, 50.0, epsilon = 1e-2);
    }

    #[test]
    fn test_circle_clears_outside_ring() {
        let src = gradient(100, 100);
        let out = apply(&src, &Circle::default()).unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        // inside the inner radius and outside the outer one
        assert_eq!(out.get(50, 50), Some(0));
        assert_eq!(out.get(5, 50), Some(0));
        // the top half of the ring reads from the source
        assert_eq!(argb::alpha(out.get(50, 35).unwrap()), 0xff);
    }

    #[test]
    fn test_kaleidoscope_is_periodic() {
        let k = Kaleidoscope {
            sides: 4,
            ..Default::default()
        };
        let wedge = TAU / 4.0;
        let base = 0.3f32;
        let (ax, ay) = k.fold(20.0 * base.cos(), 20.0 * base.sin());
        let turned = base + wedge;
        let (bx, by) = k.fold(20.0 * turned.cos(), 20.0 * turned.sin());
        assert_relative_eq!(ax, bx, epsilon = 1e-3);
        assert_relative_eq!(ay, by, epsilon = 1e-3);
    }

    #[test]
    fn test_kaleidoscope_keeps_distance_without_radius() {
        let k = Kaleidoscope::default();
        let (ox, oy) = k.fold(-12.0, 5.0);
        assert_relative_eq!((ox * ox + oy * oy).sqrt(), 13.0, epsilon = 1e-4);
    }

    #[test]
    fn test_kaleidoscope_centre_fixed() {
        let k = Kaleidoscope {
            radius: 20.0,
            ..Default::default()
        };
        assert_eq!(k.map_inverse(50, 30, &SRC), (50.0, 30.0));
    }
}
