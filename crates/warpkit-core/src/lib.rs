//! # warpkit-core
//!
//! Core types shared by the warpkit crates.
//!
//! - [`PixelBuffer`] - owned `width * height` buffer of packed `0xAARRGGBB` pixels
//! - [`Rect`] - image region in original or transformed space
//! - [`argb`] - per-channel pack/unpack, mix and bilinear blends
//! - [`Error`], [`Result`] - buffer construction and addressing errors
//!
//! ## Crate Structure
//!
//! ```text
//! warpkit-core (this crate)
//!    ^
//!    |
//!    +-- warpkit-math (lerp, splines)
//!    +-- warpkit-ops (transform engine, mesh warp, morph)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - derive `Serialize`/`Deserialize` for [`Rect`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod argb;
pub mod buffer;
pub mod error;
pub mod rect;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use rect::Rect;
