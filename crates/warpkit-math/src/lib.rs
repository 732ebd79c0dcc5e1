//! # warpkit-math
//!
//! Math utilities for geometric image warping.
//!
//! - Scalar helpers: [`lerp`], [`modulo`], [`triangle`]
//! - Spline field generation: [`interpolate_spline`], [`interpolate_linear`]
//! - [`SplineTable`] - dense 1-D resampling table with terminal sentinel
//!
//! # Used By
//!
//! - `warpkit-ops` - distortion mappings and the mesh warp driver

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod interp;
pub mod spline;

pub use interp::*;
pub use spline::{SplineTable, interpolate_linear, interpolate_spline};
