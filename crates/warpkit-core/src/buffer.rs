//! Owned ARGB pixel buffers.
//!
//! [`PixelBuffer`] is the exchange format between the warp engines and the
//! filters built on them: `width * height` packed `0xAARRGGBB` words in
//! row-major order. Zero-sized buffers are valid and used for empty outputs.
//!
//! # Example
//!
//! ```rust
//! use warpkit_core::PixelBuffer;
//!
//! let mut buf = PixelBuffer::filled(4, 2, 0xff000000).unwrap();
//! buf.set(1, 1, 0xffffffff);
//! assert_eq!(buf.get(1, 1), Some(0xffffffff));
//! assert_eq!(buf.get(4, 0), None);
//! assert_eq!(buf.row(1), &[0xff000000, 0xffffffff, 0xff000000, 0xff000000]);
//! ```

use crate::{Error, Rect, Result};

/// A row-major buffer of packed ARGB pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u32>,
}

fn pixel_count(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| Error::invalid_dimensions(width, height, "pixel count overflows usize"))
}

impl PixelBuffer {
    /// Creates a transparent black (`0x00000000`) buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, 0)
    }

    /// Creates a buffer with every pixel set to `argb`.
    pub fn filled(width: u32, height: u32, argb: u32) -> Result<Self> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![argb; len],
        })
    }

    /// Wraps existing pixel data.
    ///
    /// Fails with [`Error::DataLength`] unless `data.len() == width * height`.
    pub fn from_vec(width: u32, height: u32, data: Vec<u32>) -> Result<Self> {
        let expected = pixel_count(width, height)?;
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> u32,
    {
        let len = pixel_count(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The original-space rectangle of this buffer.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Returns `true` when the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel at (x, y), or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.data[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Pixel at (x, y), or [`Error::OutOfBounds`].
    pub fn try_get(&self, x: i64, y: i64) -> Result<u32> {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            Ok(self.data[y as usize * self.width as usize + x as usize])
        } else {
            Err(Error::out_of_bounds(x, y, self.width, self.height))
        }
    }

    /// Sets the pixel at (x, y). Writes outside the buffer are ignored.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, argb: u32) {
        if x < self.width && y < self.height {
            self.data[y as usize * self.width as usize + x as usize] = argb;
        }
    }

    /// One row of pixels. Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.data[start..start + w]
    }

    /// Mutable row of pixels. Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.data[start..start + w]
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// All pixels in row-major order, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Consumes the buffer, returning the pixel data.
    #[inline]
    pub fn into_vec(self) -> Vec<u32> {
        self.data
    }
}
