//! Rectangles describing image regions in a coordinate space.
//!
//! A transform works with two spaces: the *original* space of the source
//! image, always `Rect::from_size(width, height)`, and the *transformed*
//! space of the output, which a mapping may grow, shrink or move. Origins
//! are signed because a rotated or sheared image can extend above or left
//! of the source origin.
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │  Image   │
//!   │   │  Region  │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use warpkit_core::Rect;
//!
//! let rect = Rect::new(-10, 20, 100, 50);
//! assert_eq!(rect.right(), 90);
//! assert!(rect.contains(-10, 20));
//! assert!(!rect.contains(90, 20));
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// Left/top edges are inclusive, right/bottom edges exclusive. A rectangle
/// with zero width or height is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: i32,
    /// Y coordinate of the top edge (inclusive)
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin with given dimensions.
    ///
    /// This is the original space of a `width`x`height` image.
    #[inline]
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Smallest integer rectangle covering every point in `points`.
    ///
    /// Minimum coordinates are floored and maximum coordinates ceiled.
    /// Non-finite points are skipped; returns an empty rectangle at the
    /// origin when no finite point remains.
    ///
    /// # Example
    ///
    /// ```rust
    /// use warpkit_core::Rect;
    ///
    /// let r = Rect::bounding([(-0.5, 1.0), (9.2, 4.0)]);
    /// assert_eq!(r, Rect::new(-1, 1, 11, 3));
    /// ```
    pub fn bounding<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let mut min = (f32::INFINITY, f32::INFINITY);
        let mut max = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (px, py) in points {
            if !px.is_finite() || !py.is_finite() {
                continue;
            }
            min = (min.0.min(px), min.1.min(py));
            max = (max.0.max(px), max.1.max(py));
        }
        if min.0 > max.0 || min.1 > max.1 {
            return Self::default();
        }
        let x = min.0.floor() as i32;
        let y = min.1.floor() as i32;
        let right = max.0.ceil() as i64;
        let bottom = max.1.ceil() as i64;
        let width = (right - x as i64).clamp(0, u32::MAX as i64) as u32;
        let height = (bottom - y as i64).clamp(0, u32::MAX as i64) as u32;
        Self::new(x, y, width, height)
    }

    /// X coordinate of the right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Y coordinate of the bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Area of the rectangle in pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the point (px, py) is inside this rectangle.
    #[inline]
    pub const fn contains(&self, px: i64, py: i64) -> bool {
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    /// Corner points `(x, y)`, `(right, y)`, `(x, bottom)`, `(right, bottom)`.
    ///
    /// Used by mappings that compute output bounds by forward-transforming
    /// the source corners.
    #[inline]
    pub fn corners(&self) -> [(f32, f32); 4] {
        let (x0, y0) = (self.x as f32, self.y as f32);
        let (x1, y1) = (self.right() as f32, self.bottom() as f32);
        [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
    }
}
