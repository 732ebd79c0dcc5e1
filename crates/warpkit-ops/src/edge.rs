//! Edge policies for pixel lookups outside the source image.
//!
//! Inverse mappings routinely land outside the source: a rotated image has
//! corners with no source pixel, a twirl near the border reads past it. An
//! [`EdgeAction`] decides what such a lookup returns. Out-of-range
//! coordinates are never an error.
//!
//! | action | lookup at (x, y) outside `w`x`h` |
//! |---|---|
//! | `Zero` | `0x00000000` (transparent black) |
//! | `Clamp` | nearest border pixel |
//! | `Wrap` | pixel at `(x mod w, y mod h)` |
//! | `RgbClamp` | nearest border pixel with alpha cleared |
//!
//! `RgbClamp` keeps the color of the border for bilinear blending but makes
//! it fully transparent, so rotated or scaled edges fade out instead of
//! picking up a gray halo.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use warpkit_core::{PixelBuffer, argb};

/// Policy for pixel lookups that fall outside the source bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EdgeAction {
    /// Treat pixels off the edge as transparent black.
    Zero,
    /// Clamp to the nearest edge pixel.
    Clamp,
    /// Wrap around to the opposite edge.
    Wrap,
    /// Clamp, then clear the alpha channel.
    #[default]
    RgbClamp,
}

impl EdgeAction {
    /// Fetches pixel (x, y) from `src`, resolving out-of-range coordinates
    /// according to this policy.
    ///
    /// A zero-sized source has no pixel to clamp or wrap to and always
    /// yields `0x00000000`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use warpkit_core::PixelBuffer;
    /// use warpkit_ops::EdgeAction;
    ///
    /// let src = PixelBuffer::from_vec(2, 1, vec![0xff112233, 0xff445566]).unwrap();
    /// assert_eq!(EdgeAction::Zero.fetch(&src, 2, 0), 0);
    /// assert_eq!(EdgeAction::Clamp.fetch(&src, 9, -4), 0xff445566);
    /// assert_eq!(EdgeAction::Wrap.fetch(&src, 2, 0), 0xff112233);
    /// assert_eq!(EdgeAction::RgbClamp.fetch(&src, -1, 0), 0x00112233);
    /// ```
    #[inline]
    pub fn fetch(self, src: &PixelBuffer, x: i64, y: i64) -> u32 {
        let (w, h) = (src.width() as i64, src.height() as i64);
        let pixels = src.as_slice();
        if x >= 0 && x < w && y >= 0 && y < h {
            return pixels[(y * w + x) as usize];
        }
        self.resolve(src, x, y)
    }

    /// Applies the policy to `(x, y)` even when it lies inside `src`.
    ///
    /// Used for lookups whose coordinate was outside before rounding, such
    /// as a truncated `-0.5`.
    #[inline]
    pub(crate) fn resolve(self, src: &PixelBuffer, x: i64, y: i64) -> u32 {
        let (w, h) = (src.width() as i64, src.height() as i64);
        let pixels = src.as_slice();
        if w == 0 || h == 0 {
            return 0;
        }
        match self {
            EdgeAction::Zero => 0,
            EdgeAction::Clamp => pixels[(y.clamp(0, h - 1) * w + x.clamp(0, w - 1)) as usize],
            EdgeAction::Wrap => pixels[(y.rem_euclid(h) * w + x.rem_euclid(w)) as usize],
            EdgeAction::RgbClamp => {
                pixels[(y.clamp(0, h - 1) * w + x.clamp(0, w - 1)) as usize] & argb::RGB_MASK
            }
        }
    }
}
