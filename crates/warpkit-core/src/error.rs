//! Error types for warpkit-core.
//!
//! Core errors cover buffer construction and pixel addressing. Geometry
//! operations (warps, grids) report through `warpkit_ops::OpsError`, which
//! wraps this type.
//!
//! # Usage
//!
//! ```rust
//! use warpkit_core::{Error, PixelBuffer};
//!
//! let err = PixelBuffer::from_vec(2, 2, vec![0; 3]).unwrap_err();
//! assert!(matches!(err, Error::DataLength { expected: 4, got: 3 }));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive for `Error` and `Display`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by core buffer types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Pixel coordinates are outside buffer bounds.
    #[error("pixel ({x}, {y}) out of bounds for buffer {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was accessed
        x: i64,
        /// Y coordinate that was accessed
        y: i64,
        /// Buffer width
        width: u32,
        /// Buffer height
        height: u32,
    },

    /// Pixel data length does not match `width * height`.
    #[error("pixel data length mismatch: expected {expected}, got {got}")]
    DataLength {
        /// Expected number of pixels
        expected: usize,
        /// Actual number of pixels
        got: usize,
    },

    /// Dimensions cannot be represented (overflow) or are otherwise invalid.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}
