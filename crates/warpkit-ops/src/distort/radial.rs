//! Radial distortions around a centre point.
//!
//! All four effects leave pixels outside their radius untouched and read
//! the source only near the centre. Twirl, sphere and water recommend
//! [`EdgeAction::Clamp`] so displaced border pixels do not pull in
//! transparency.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use warpkit_core::Rect;

use super::centre;
use crate::{EdgeAction, InverseMapping, TransformOptions};

/// A radius of 0 means the smaller of the two centre coordinates.
#[inline]
fn effective_radius(radius: f32, icx: f32, icy: f32) -> f32 {
    if radius == 0.0 { icx.min(icy) } else { radius }
}

/// Rotation that is strongest at the centre and fades to zero at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Twirl {
    /// Rotation at the centre, in radians.
    pub angle: f32,
    /// Relative centre x.
    pub centre_x: f32,
    /// Relative centre y.
    pub centre_y: f32,
    /// Radius in pixels; 0 uses the smaller centre coordinate.
    pub radius: f32,
}

impl Default for Twirl {
    fn default() -> Self {
        Self {
            angle: 0.0,
            centre_x: 0.5,
            centre_y: 0.5,
            radius: 100.0,
        }
    }
}

impl InverseMapping for Twirl {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (icx, icy) = centre(source, self.centre_x, self.centre_y);
        let radius = effective_radius(self.radius, icx, icy);
        let (fx, fy) = (x as f32, y as f32);
        let (dx, dy) = (fx - icx, fy - icy);
        let d2 = dx * dx + dy * dy;
        if radius <= 0.0 || d2 > radius * radius {
            return (fx, fy);
        }
        let d = d2.sqrt();
        let a = dy.atan2(dx) + self.angle * (radius - d) / radius;
        (icx + d * a.cos(), icy + d * a.sin())
    }

    fn default_options(&self) -> TransformOptions {
        TransformOptions::with_edge(EdgeAction::Clamp)
    }
}

/// Pinch (positive `amount`) or bulge (negative `amount`), with an
/// optional twist.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pinch {
    /// Twist at the centre, in radians.
    pub angle: f32,
    /// Relative centre x.
    pub centre_x: f32,
    /// Relative centre y.
    pub centre_y: f32,
    /// Radius in pixels; 0 uses the smaller centre coordinate.
    pub radius: f32,
    /// Pinch strength in `[-1, 1]`.
    pub amount: f32,
}

impl Default for Pinch {
    fn default() -> Self {
        Self {
            angle: 0.0,
            centre_x: 0.5,
            centre_y: 0.5,
            radius: 100.0,
            amount: 0.5,
        }
    }
}

impl InverseMapping for Pinch {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (icx, icy) = centre(source, self.centre_x, self.centre_y);
        let radius = effective_radius(self.radius, icx, icy);
        let (fx, fy) = (x as f32, y as f32);
        let (dx, dy) = (fx - icx, fy - icy);
        let d2 = dx * dx + dy * dy;
        let r2 = radius * radius;
        if radius <= 0.0 || d2 > r2 || d2 == 0.0 {
            return (fx, fy);
        }

        let d = (d2 / r2).sqrt();
        let t = (FRAC_PI_2 * d).sin().powf(-self.amount);
        let (dx, dy) = (dx * t, dy * t);

        let e = 1.0 - d;
        let (s, c) = (self.angle * e * e).sin_cos();
        (icx + c * dx - s * dy, icy + s * dx + c * dy)
    }
}

/// Refraction through an ellipsoidal glass lens.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Sphere {
    /// Lens radius in pixels; 0 uses half the image on each axis.
    pub radius: f32,
    /// Relative centre x.
    pub centre_x: f32,
    /// Relative centre y.
    pub centre_y: f32,
    /// Index of refraction; 1.0 is no distortion.
    pub refraction_index: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius: 0.0,
            centre_x: 0.5,
            centre_y: 0.5,
            refraction_index: 1.5,
        }
    }
}

impl Sphere {
    /// Refracted offset along one axis.
    #[inline]
    fn bend(delta2: f32, delta: f32, z: f32, rr: f32) -> f32 {
        let axis_angle = (delta / (delta2 + z * z).sqrt()).acos();
        let incident = FRAC_PI_2 - axis_angle;
        let refracted = (incident.sin() * rr).asin();
        (FRAC_PI_2 - axis_angle - refracted).tan() * z
    }
}

impl InverseMapping for Sphere {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (icx, icy) = centre(source, self.centre_x, self.centre_y);
        let (a, b) = if self.radius == 0.0 {
            (source.width as f32 / 2.0, source.height as f32 / 2.0)
        } else {
            (self.radius, self.radius)
        };
        let (fx, fy) = (x as f32, y as f32);
        if a <= 0.0 || b <= 0.0 || self.refraction_index <= 0.0 {
            return (fx, fy);
        }
        let (a2, b2) = (a * a, b * b);
        let (dx, dy) = (fx - icx, fy - icy);
        let (x2, y2) = (dx * dx, dy * dy);
        if y2 >= b2 - (b2 * x2) / a2 {
            return (fx, fy);
        }

        let rr = 1.0 / self.refraction_index;
        let z = ((1.0 - x2 / a2 - y2 / b2) * (a * b)).sqrt();
        let sx = fx - Self::bend(x2, dx, z, rr);
        let sy = fy - Self::bend(y2, dy, z, rr);
        if sx.is_finite() && sy.is_finite() { (sx, sy) } else { (fx, fy) }
    }

    fn default_options(&self) -> TransformOptions {
        TransformOptions::with_edge(EdgeAction::Clamp)
    }
}

/// Concentric ripples that fade out towards `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Water {
    /// Distance between wave crests in pixels.
    pub wavelength: f32,
    /// Wave height.
    pub amplitude: f32,
    /// Wave phase in radians.
    pub phase: f32,
    /// Relative centre x.
    pub centre_x: f32,
    /// Relative centre y.
    pub centre_y: f32,
    /// Radius in pixels; 0 uses the smaller centre coordinate.
    pub radius: f32,
}

impl Default for Water {
    fn default() -> Self {
        Self {
            wavelength: 16.0,
            amplitude: 10.0,
            phase: 0.0,
            centre_x: 0.5,
            centre_y: 0.5,
            radius: 50.0,
        }
    }
}

impl InverseMapping for Water {
    fn map_inverse(&self, x: i32, y: i32, source: &Rect) -> (f32, f32) {
        let (icx, icy) = centre(source, self.centre_x, self.centre_y);
        let radius = effective_radius(self.radius, icx, icy);
        let (fx, fy) = (x as f32, y as f32);
        let (dx, dy) = (fx - icx, fy - icy);
        let d2 = dx * dx + dy * dy;
        if radius <= 0.0 || self.wavelength == 0.0 || d2 > radius * radius {
            return (fx, fy);
        }
        let d = d2.sqrt();
        let mut amount = self.amplitude * (d / self.wavelength * TAU - self.phase).sin();
        amount *= (radius - d) / radius;
        if d != 0.0 {
            amount *= self.wavelength / d;
        }
        (fx + dx * amount, fy + dy * amount)
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

    const SRC: Rect = Rect::from_size(100, 80);

    #[test]
    fn test_twirl_zero_angle_is_identity() {
        let src = gradient(24, 16);
        let out = apply(&src, &Twirl { radius: 0.0, ..Default::default() }).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_twirl_outside_radius_untouched() {
        let twirl = Twirl {
            angle: 2.0,
            radius: 10.0,
            ..Default::default()
        };
        assert_eq!(twirl.map_inverse(0, 0, &SRC), (0.0, 0.0));
        let (sx, sy) = twirl.map_inverse(52, 40, &SRC);
        assert!((sx - 52.0).abs() > 0.1 || (sy - 40.0).abs() > 0.1);
    }

    #[test]
    fn test_twirl_keeps_distance() {
        let twirl = Twirl {
            angle: 1.0,
            radius: 30.0,
            ..Default::default()
        };
        let (sx, sy) = twirl.map_inverse(60, 45, &SRC);
        let before = (10.0f32 * 10.0 + 5.0 * 5.0).sqrt();
        let after = ((sx - 50.0).powi(2) + (sy - 40.0).powi(2)).sqrt();
        assert_relative_eq!(before, after, epsilon = 1e-4);
    }

    #[test]
    fn test_pinch_centre_and_outside() {
        let pinch = Pinch::default();
        assert_eq!(pinch.map_inverse(50, 40, &SRC), (50.0, 40.0));
        let small = Pinch { radius: 5.0, ..Default::default() };
        assert_eq!(small.map_inverse(0, 0, &SRC), (0.0, 0.0));
    }

    #[test]
    fn test_pinch_pulls_from_further_out() {
        let pinch = Pinch {
            radius: 30.0,
            amount: 0.8,
            ..Default::default()
        };
        let (sx, _) = pinch.map_inverse(60, 40, &SRC);
        assert!(sx > 60.0);
    }

    #[test]
    fn test_sphere_unit_index_is_identity() {
        let sphere = Sphere {
            refraction_index: 1.0,
            ..Default::default()
        };
        for (x, y) in [(50, 40), (60, 45), (20, 30), (99, 79)] {
            let (sx, sy) = sphere.map_inverse(x, y, &SRC);
            assert_relative_eq!(sx, x as f32, epsilon = 1e-3);
            assert_relative_eq!(sy, y as f32, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_sphere_magnifies_towards_centre() {
        let sphere = Sphere::default();
        let (sx, _) = sphere.map_inverse(70, 40, &SRC);
        assert!(sx < 70.0 && sx > 50.0);
        // outside the ellipse
        assert_eq!(sphere.map_inverse(0, 0, &SRC), (0.0, 0.0));
    }

    #[test]
    fn test_water_zero_amplitude_is_identity() {
        let water = Water {
            amplitude: 0.0,
            ..Default::default()
        };
        let src = gradient(20, 20);
        assert_eq!(apply(&src, &water).unwrap(), src);
    }

    #[test]
    fn test_water_displaces_radially() {
        let water = Water {
            wavelength: 16.0,
            amplitude: 1.0,
            phase: 0.0,
            radius: 40.0,
            ..Default::default()
        };
        // quarter wavelength out: sin = 1
        let (sx, sy) = water.map_inverse(54, 40, &SRC);
        assert_eq!(sy, 40.0);
        assert_relative_eq!(sx, 54.0 + 4.0 * (36.0 / 40.0) * (16.0 / 4.0), epsilon = 1e-3);
    }

    #[test]
    fn test_recommended_edge_actions() {
        assert_eq!(Twirl::default().default_options().edge_action, EdgeAction::Clamp);
        assert_eq!(Sphere::default().default_options().edge_action, EdgeAction::Clamp);
        assert_eq!(Water::default().default_options().edge_action, EdgeAction::Clamp);
        assert_eq!(Pinch::default().default_options().edge_action, EdgeAction::RgbClamp);
    }
}
