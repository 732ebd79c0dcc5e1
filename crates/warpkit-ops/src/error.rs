//! Error types for geometric operations.

use thiserror::Error;

/// Error type for transform, grid and warp operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Invalid parameter value (grid shape, edit index, singular matrix).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Control grids have different shapes.
    #[error("grid mismatch: {a_rows}x{a_cols} vs {b_rows}x{b_cols}")]
    GridMismatch {
        /// Rows of the first grid
        a_rows: usize,
        /// Columns of the first grid
        a_cols: usize,
        /// Rows of the second grid
        b_rows: usize,
        /// Columns of the second grid
        b_cols: usize,
    },

    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// The operation was cancelled between scanlines.
    #[error("operation cancelled")]
    Cancelled,

    /// Buffer construction failed.
    #[error(transparent)]
    Core(#[from] warpkit_core::Error),
}

/// Result type for geometric operations.
pub type OpsResult<T> = Result<T, OpsError>;
