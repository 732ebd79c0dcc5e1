//! # warpkit-ops
//!
//! Geometric image operations on packed ARGB buffers.
//!
//! Two engines do the work:
//!
//! - the **transform engine** ([`transform`], [`apply`]) maps every output
//!   pixel back into the source through an [`InverseMapping`] and samples
//!   it with a [`Sampler`] under an [`EdgeAction`];
//! - the **mesh warp** ([`warp`], [`morph`], [`tween`]) deforms an image
//!   between two [`ControlGrid`]s with two separable 1-D passes.
//!
//! # Modules
//!
//! - [`distort`] - affine, perspective, radial, polar and line-field mappings
//! - [`mesh`] - mesh warp, morph, tween, filmstrip
//! - [`resample`] - 1-D scanline resampler used by the mesh warp
//!
//! # Example
//!
//! ```rust
//! use warpkit_core::PixelBuffer;
//! use warpkit_ops::distort::AffineWarp;
//! use warpkit_ops::{apply, morph, ControlGrid};
//!
//! let src = PixelBuffer::filled(32, 32, 0xff336699).unwrap();
//!
//! // half-turn about the origin, output grown to the rotated bounds
//! let turned = apply(&src, &AffineWarp::rotate(std::f32::consts::PI).with_resize(true)).unwrap();
//! assert_eq!(turned.dimensions(), (32, 32));
//!
//! // halfway morph between two identical images is the image itself
//! let grid = ControlGrid::new(3, 3, 32, 32).unwrap();
//! let half = morph(&src, &src, &grid, &grid, 0.5).unwrap();
//! assert_eq!(half, src);
//! ```
//!
//! # Cancellation
//!
//! The `*_with_cancel` variants poll a [`CancelToken`] once per scanline
//! and return [`OpsError::Cancelled`] when it is set.
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` for options, grids and distortions

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cancel;
pub mod distort;
mod edge;
mod error;
mod grid;
pub mod mesh;
pub mod resample;
mod sample;
mod transform;

pub use cancel::CancelToken;
pub use edge::EdgeAction;
pub use error::{OpsError, OpsResult};
pub use grid::ControlGrid;
pub use mesh::{cross_dissolve, filmstrip, morph, morph_with_cancel, tween, warp, warp_with_cancel};
pub use sample::{Interpolation, Sampler};
pub use transform::{
    InverseMapping, TransformOptions, WithBounds, apply, transform, transform_with_cancel, with_bounds,
};
