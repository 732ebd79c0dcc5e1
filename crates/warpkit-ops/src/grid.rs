//! Control grids for mesh warping.
//!
//! A [`ControlGrid`] is a coarse `rows x cols` mesh of movable points laid
//! over an image. A warp is described by two grids of the same shape: the
//! source grid marks features in the input, the destination grid says
//! where those features should end up.
//!
//! Points are stored row-major in two flat arrays, `x` and `y`. The
//! fields are private so that `x.len() == y.len() == rows * cols` always
//! holds; every constructor and edit checks its preconditions and leaves
//! the grid unchanged on error.
//!
//! # Example
//!
//! ```rust
//! use warpkit_ops::ControlGrid;
//!
//! let mut grid = ControlGrid::new(4, 4, 100, 100).unwrap();
//! assert_eq!(grid.point(1, 1), Some((33.0, 33.0)));
//!
//! grid.translate_point(1, 1, 10.0, 10.0).unwrap();
//! grid.insert_row(2).unwrap();
//! assert_eq!(grid.rows(), 5);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use warpkit_math::lerp;

use crate::{OpsError, OpsResult};

/// Smallest grid a warp can use.
pub const MIN_GRID_SIZE: usize = 2;

/// Rows/columns a removal must leave behind.
pub const MIN_SIZE_AFTER_REMOVE: usize = 4;

/// A `rows x cols` mesh of control points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridParams", into = "GridParams"))]
pub struct ControlGrid {
    rows: usize,
    cols: usize,
    x: Vec<f32>,
    y: Vec<f32>,
}

impl ControlGrid {
    /// Creates a uniform grid spanning `[0, width-1] x [0, height-1]`.
    ///
    /// Fails if `rows` or `cols` is below 2.
    pub fn new(rows: usize, cols: usize, width: u32, height: u32) -> OpsResult<Self> {
        check_shape(rows, cols)?;
        let span_x = width.saturating_sub(1) as f32;
        let span_y = height.saturating_sub(1) as f32;
        let mut x = Vec::with_capacity(rows * cols);
        let mut y = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                x.push(col as f32 * span_x / (cols - 1) as f32);
                y.push(row as f32 * span_y / (rows - 1) as f32);
            }
        }
        Ok(Self { rows, cols, x, y })
    }

    /// Creates a grid from explicit row-major point arrays.
    pub fn from_points(rows: usize, cols: usize, x: Vec<f32>, y: Vec<f32>) -> OpsResult<Self> {
        check_shape(rows, cols)?;
        let expected = rows * cols;
        if x.len() != expected || y.len() != expected {
            return Err(OpsError::InvalidParameter(format!(
                "{rows}x{cols} grid needs {expected} points, got {} x and {} y",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { rows, cols, x, y })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major x coordinates.
    #[inline]
    pub fn xs(&self) -> &[f32] {
        &self.x
    }

    /// Row-major y coordinates.
    #[inline]
    pub fn ys(&self) -> &[f32] {
        &self.y
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    fn point_error(&self, row: usize, col: usize) -> OpsError {
        OpsError::InvalidParameter(format!(
            "point ({row}, {col}) outside {}x{} grid",
            self.rows, self.cols
        ))
    }

    /// Point at `(row, col)`, or `None` outside the grid.
    pub fn point(&self, row: usize, col: usize) -> Option<(f32, f32)> {
        self.index(row, col).map(|i| (self.x[i], self.y[i]))
    }

    /// Moves the point at `(row, col)` to `(x, y)`.
    pub fn set_point(&mut self, row: usize, col: usize, x: f32, y: f32) -> OpsResult<()> {
        let i = self.index(row, col).ok_or_else(|| self.point_error(row, col))?;
        self.x[i] = x;
        self.y[i] = y;
        Ok(())
    }

    /// Moves the point at `(row, col)` by `(dx, dy)`.
    pub fn translate_point(&mut self, row: usize, col: usize, dx: f32, dy: f32) -> OpsResult<()> {
        let i = self.index(row, col).ok_or_else(|| self.point_error(row, col))?;
        self.x[i] += dx;
        self.y[i] += dy;
        Ok(())
    }

    /// Inserts a row at index `before`, halfway between rows `before - 1`
    /// and `before`.
    ///
    /// `before` must lie in `1..=rows-1`.
    pub fn insert_row(&mut self, before: usize) -> OpsResult<()> {
        if before == 0 || before >= self.rows {
            return Err(OpsError::InvalidParameter(format!(
                "insert_row({before}) needs an index in 1..={}",
                self.rows - 1
            )));
        }
        let cols = self.cols;
        let at = before * cols;
        let mid = |v: &[f32]| -> Vec<f32> { (0..cols).map(|c| (v[at - cols + c] + v[at + c]) / 2.0).collect() };
        let (mx, my) = (mid(&self.x), mid(&self.y));
        self.x.splice(at..at, mx);
        self.y.splice(at..at, my);
        self.rows += 1;
        Ok(())
    }

    /// Inserts a column at index `before`, halfway between columns
    /// `before - 1` and `before`.
    ///
    /// `before` must lie in `1..=cols-1`.
    pub fn insert_col(&mut self, before: usize) -> OpsResult<()> {
        if before == 0 || before >= self.cols {
            return Err(OpsError::InvalidParameter(format!(
                "insert_col({before}) needs an index in 1..={}",
                self.cols - 1
            )));
        }
        let (rows, cols) = (self.rows, self.cols);
        let widen = |v: &[f32]| -> Vec<f32> {
            let mut out = Vec::with_capacity(rows * (cols + 1));
            for row in v.chunks_exact(cols) {
                out.extend_from_slice(&row[..before]);
                out.push((row[before - 1] + row[before]) / 2.0);
                out.extend_from_slice(&row[before..]);
            }
            out
        };
        self.x = widen(&self.x);
        self.y = widen(&self.y);
        self.cols += 1;
        Ok(())
    }

    /// Removes row `index`.
    ///
    /// Refused when fewer than 4 rows would remain.
    pub fn remove_row(&mut self, index: usize) -> OpsResult<()> {
        if self.rows <= MIN_SIZE_AFTER_REMOVE {
            return Err(OpsError::InvalidParameter(format!(
                "cannot remove a row from a grid with {} rows",
                self.rows
            )));
        }
        if index >= self.rows {
            return Err(OpsError::InvalidParameter(format!(
                "row {index} outside grid with {} rows",
                self.rows
            )));
        }
        let at = index * self.cols;
        self.x.drain(at..at + self.cols);
        self.y.drain(at..at + self.cols);
        self.rows -= 1;
        Ok(())
    }

    /// Removes column `index`.
    ///
    /// Refused when fewer than 4 columns would remain.
    pub fn remove_col(&mut self, index: usize) -> OpsResult<()> {
        if self.cols <= MIN_SIZE_AFTER_REMOVE {
            return Err(OpsError::InvalidParameter(format!(
                "cannot remove a column from a grid with {} columns",
                self.cols
            )));
        }
        if index >= self.cols {
            return Err(OpsError::InvalidParameter(format!(
                "column {index} outside grid with {} columns",
                self.cols
            )));
        }
        let cols = self.cols;
        let narrow = |v: &[f32]| -> Vec<f32> {
            v.chunks_exact(cols)
                .flat_map(|row| row[..index].iter().chain(&row[index + 1..]).copied())
                .collect()
        };
        self.x = narrow(&self.x);
        self.y = narrow(&self.y);
        self.cols -= 1;
        Ok(())
    }

    /// Pointwise interpolation towards `other`: `t = 0` gives `self`,
    /// `t = 1` gives `other`.
    ///
    /// Fails with [`OpsError::GridMismatch`] if the shapes differ.
    pub fn lerp(&self, t: f32, other: &ControlGrid) -> OpsResult<ControlGrid> {
        self.check_same_shape(other)?;
        let mix = |a: &[f32], b: &[f32]| -> Vec<f32> { a.iter().zip(b).map(|(&a, &b)| lerp(a, b, t)).collect() };
        Ok(ControlGrid {
            rows: self.rows,
            cols: self.cols,
            x: mix(&self.x, &other.x),
            y: mix(&self.y, &other.y),
        })
    }

    /// Fails with [`OpsError::GridMismatch`] unless both grids have the
    /// same shape.
    pub fn check_same_shape(&self, other: &ControlGrid) -> OpsResult<()> {
        if self.shape() != other.shape() {
            return Err(OpsError::GridMismatch {
                a_rows: self.rows,
                a_cols: self.cols,
                b_rows: other.rows,
                b_cols: other.cols,
            });
        }
        Ok(())
    }

    /// Knot positions and values down grid column `col`: the y and x
    /// coordinates of its points, top to bottom.
    pub(crate) fn column_knots(&self, col: usize, ys: &mut Vec<f32>, xs: &mut Vec<f32>) {
        ys.clear();
        xs.clear();
        for row in 0..self.rows {
            let i = row * self.cols + col;
            ys.push(self.y[i]);
            xs.push(self.x[i]);
        }
    }
}

fn check_shape(rows: usize, cols: usize) -> OpsResult<()> {
    if rows < MIN_GRID_SIZE || cols < MIN_GRID_SIZE {
        return Err(OpsError::InvalidParameter(format!(
            "grid must be at least {MIN_GRID_SIZE}x{MIN_GRID_SIZE}, got {rows}x{cols}"
        )));
    }
    Ok(())
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct GridParams {
    rows: usize,
    cols: usize,
    x: Vec<f32>,
    y: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<GridParams> for ControlGrid {
    type Error = OpsError;

    fn try_from(p: GridParams) -> OpsResult<Self> {
        Self::from_points(p.rows, p.cols, p.x, p.y)
    }
}

#[cfg(feature = "serde")]
impl From<ControlGrid> for GridParams {
    fn from(g: ControlGrid) -> Self {
        Self {
            rows: g.rows,
            cols: g.cols,
            x: g.x,
            y: g.y,
        }
    }
}
