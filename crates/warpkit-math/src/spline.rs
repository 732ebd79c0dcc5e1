//! Spline field generation for control-grid warps.
//!
//! A warp grid is coarse: a handful of control points per row or column.
//! The mesh warp needs a value at *every* pixel, so each row or column of
//! control points is treated as a set of knots `(position, value)` and a
//! piecewise cubic is evaluated at every integer position `0..len`.
//!
//! # Curve
//!
//! Each span `[x[k], x[k+1]]` is a cubic Hermite segment. Tangents are
//! Catmull-Rom central differences measured over the real knot spacing:
//!
//! ```text
//! m[k] = (y[k+1] - y[k-1]) / (x[k+1] - x[k-1])     interior knots
//! m[0] = (y[1] - y[0]) / (x[1] - x[0])             end knots, one-sided
//! ```
//!
//! With evenly spaced knots this is the classic Catmull-Rom spline. For
//! any spacing it reproduces linear data exactly, so a grid that maps onto
//! itself yields an identity field.
//!
//! Positions before the first knot or after the last are extrapolated along
//! the end tangent.
//!
//! # Degenerate knots
//!
//! A span whose width is zero or negative (duplicate or out-of-order
//! positions) holds the value of its left knot, and tangents across such
//! spans are zero. Nothing divides by a zero width, so the output never
//! contains NaN or infinity introduced by the fit.
//!
//! # Example
//!
//! ```rust
//! use warpkit_math::{interpolate_spline, SplineTable};
//!
//! let mut dense = [0.0f32; 5];
//! interpolate_spline(&[0.0, 2.0, 4.0], &[0.0, 4.0, 8.0], &mut dense);
//! assert_eq!(dense, [0.0, 2.0, 4.0, 6.0, 8.0]);
//!
//! let table = SplineTable::fit(&[0.0, 4.0], &[0.0, 4.0], 4);
//! assert_eq!(table.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
//! ```

/// Spans narrower than this are treated as degenerate.
pub const MIN_SPAN: f32 = 1e-6;

#[inline]
fn slope(x0: f32, y0: f32, x1: f32, y1: f32) -> f32 {
    let dx = x1 - x0;
    if dx > MIN_SPAN { (y1 - y0) / dx } else { 0.0 }
}

/// Catmull-Rom tangent at knot `k` over `n` knots.
#[inline]
fn tangent(xs: &[f32], ys: &[f32], n: usize, k: usize) -> f32 {
    let lo = k.saturating_sub(1);
    let hi = (k + 1).min(n - 1);
    slope(xs[lo], ys[lo], xs[hi], ys[hi])
}

/// Walks `out` position by position, tracking the knot span that contains
/// each position, and stores `eval(span, position)`.
///
/// Spans only move forward, so the walk is linear in `out.len() + n`.
fn sweep<F>(xs: &[f32], n: usize, out: &mut [f32], mut eval: F)
where
    F: FnMut(usize, f32) -> f32,
{
    let last = n - 1;
    let mut span = 0;
    for (i, slot) in out.iter_mut().enumerate() {
        let p = i as f32;
        while span + 1 < last && p > xs[span + 1] {
            span += 1;
        }
        *slot = eval(span, p);
    }
}

/// Evaluates a Catmull-Rom style cubic through the knots at every integer
/// position `0..out.len()`.
///
/// `knots_x` are the knot positions and `knots_y` their values; extra
/// entries in the longer slice are ignored. No knots gives zeros, a single
/// knot gives a constant.
pub fn interpolate_spline(knots_x: &[f32], knots_y: &[f32], out: &mut [f32]) {
    let n = knots_x.len().min(knots_y.len());
    match n {
        0 => return out.fill(0.0),
        1 => return out.fill(knots_y[0]),
        _ => {}
    }
    let (xs, ys) = (&knots_x[..n], &knots_y[..n]);
    let last = n - 1;

    sweep(xs, n, out, |k, p| {
        let (x0, x1) = (xs[k], xs[k + 1]);
        if k == 0 && p < x0 {
            return ys[0] + tangent(xs, ys, n, 0) * (p - x0);
        }
        if k + 1 == last && p > x1 {
            return ys[last] + tangent(xs, ys, n, last) * (p - x1);
        }
        let h = x1 - x0;
        if h.is_nan() || h <= MIN_SPAN {
            return ys[k];
        }
        let t = (p - x0) / h;
        let (m0, m1) = (tangent(xs, ys, n, k), tangent(xs, ys, n, k + 1));
        hermite(t, ys[k], h * m0, ys[k + 1], h * m1)
    });
}

/// Piecewise-linear counterpart of [`interpolate_spline`].
///
/// Same knot conventions and degenerate-span rules; outside the knots the
/// first/last span is extended.
pub fn interpolate_linear(knots_x: &[f32], knots_y: &[f32], out: &mut [f32]) {
    let n = knots_x.len().min(knots_y.len());
    match n {
        0 => return out.fill(0.0),
        1 => return out.fill(knots_y[0]),
        _ => {}
    }
    let (xs, ys) = (&knots_x[..n], &knots_y[..n]);

    sweep(xs, n, out, |k, p| {
        let (x0, x1) = (xs[k], xs[k + 1]);
        let h = x1 - x0;
        if h.is_nan() || h <= MIN_SPAN {
            return ys[k];
        }
        ys[k] + (ys[k + 1] - ys[k]) * ((p - x0) / h)
    });
}

/// Cubic Hermite basis: values `p0`, `p1` with scaled tangents `m0`, `m1`.
#[inline]
fn hermite(t: f32, p0: f32, m0: f32, p1: f32, m1: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
}

/// Dense 1-D resampling table with a terminal sentinel.
///
/// Entry `i` (for `i < len`) is the spline value at position `i`. The extra
/// entry `table[len]` is always `len`: the trailing edge of the last cell
/// maps to the end of the buffer, so the last interval `[table[len-1],
/// table[len]]` is closed without reading past the data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplineTable {
    values: Vec<f32>,
}

impl SplineTable {
    /// Fits a spline through the knots and samples `len` cells plus the
    /// sentinel.
    pub fn fit(knots_x: &[f32], knots_y: &[f32], len: usize) -> Self {
        let mut table = Self::default();
        table.refit(knots_x, knots_y, len);
        table
    }

    /// The identity table `[0, 1, ..., len]`.
    pub fn identity(len: usize) -> Self {
        Self {
            values: (0..=len).map(|i| i as f32).collect(),
        }
    }

    /// Refits in place, reusing the allocation across scanlines.
    pub fn refit(&mut self, knots_x: &[f32], knots_y: &[f32], len: usize) {
        self.values.resize(len + 1, 0.0);
        interpolate_spline(knots_x, knots_y, &mut self.values[..len]);
        self.values[len] = len as f32;
    }

    /// Number of cells, excluding the sentinel.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    /// Returns `true` when the table has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All `len + 1` entries, sentinel last.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}
