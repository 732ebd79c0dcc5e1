//! Two-pass mesh warp, morphing and tweening.
//!
//! A mesh warp moves the features under a source [`ControlGrid`] to the
//! positions of a destination grid of the same shape. It is computed as
//! two 1-D passes:
//!
//! 1. **Horizontal.** Each grid column is fitted with a spline over the
//!    image height, giving the x position of every column at every image
//!    row, for both grids. Each row of pixels is then remapped so that the
//!    source column positions land on the destination ones.
//! 2. **Vertical.** Each grid row is fitted over the image width, giving
//!    the y position of every row at every image column. Each column of
//!    the intermediate image is remapped the same way.
//!
//! Only spline tables of size `(width + height) * grid size` are kept;
//! there is no per-pixel displacement field.
//!
//! A morph warps both images towards a shared intermediate grid and
//! cross-dissolves them.
//!
//! # Example
//!
//! ```rust
//! use warpkit_core::PixelBuffer;
//! use warpkit_ops::{warp, ControlGrid};
//!
//! let src = PixelBuffer::from_fn(64, 64, |x, y| 0xff000000 | (x << 16) | (y << 8)).unwrap();
//! let from = ControlGrid::new(4, 4, 64, 64).unwrap();
//! let mut to = from.clone();
//! to.translate_point(1, 1, 6.0, 4.0).unwrap();
//!
//! let out = warp(&src, &from, &to).unwrap();
//! assert_eq!(out.dimensions(), (64, 64));
//! // corners are pinned by the grid
//! assert_eq!(out.get(0, 0), src.get(0, 0));
//! ```

use tracing::{debug, trace};
use warpkit_core::{PixelBuffer, argb};
use warpkit_math::{SplineTable, interpolate_spline};

use crate::resample::Resampler;
use crate::{CancelToken, ControlGrid, OpsError, OpsResult};

#[inline]
fn poll(cancel: Option<&CancelToken>) -> OpsResult<()> {
    match cancel {
        Some(token) => token.check(),
        None => Ok(()),
    }
}

/// Warps `src` so that the points of `source_grid` move to the points of
/// `dest_grid`.
///
/// The output has the size of `src`. Fails with
/// [`OpsError::GridMismatch`] if the grids have different shapes; the
/// check happens before any buffer is allocated.
pub fn warp(src: &PixelBuffer, source_grid: &ControlGrid, dest_grid: &ControlGrid) -> OpsResult<PixelBuffer> {
    run_warp(src, source_grid, dest_grid, None)
}

/// Like [`warp`], but checks `cancel` before every scanline.
pub fn warp_with_cancel(
    src: &PixelBuffer,
    source_grid: &ControlGrid,
    dest_grid: &ControlGrid,
    cancel: &CancelToken,
) -> OpsResult<PixelBuffer> {
    run_warp(src, source_grid, dest_grid, Some(cancel))
}

/// Evaluates every grid column at each of `len` image rows.
///
/// Knots are the y positions of the column's points, values their x
/// positions. The result is row-major `len x cols`.
fn densify_columns(grid: &ControlGrid, len: usize) -> Vec<f32> {
    let cols = grid.cols();
    let mut out = vec![0.0; len * cols];
    let (mut knots, mut values) = (Vec::new(), Vec::new());
    let mut dense = vec![0.0; len];
    for col in 0..cols {
        grid.column_knots(col, &mut knots, &mut values);
        interpolate_spline(&knots, &values, &mut dense);
        for (row, &v) in dense.iter().enumerate() {
            out[row * cols + col] = v;
        }
    }
    out
}

/// Evaluates every grid row at each of `len` image columns.
///
/// Knots are the x positions of the row's points, values their y
/// positions. The result is row-major `rows x len`; `len` must be
/// non-zero.
fn densify_rows(grid: &ControlGrid, len: usize) -> Vec<f32> {
    let cols = grid.cols();
    let mut out = vec![0.0; grid.rows() * len];
    for (row, dense) in out.chunks_exact_mut(len).enumerate() {
        let span = row * cols..(row + 1) * cols;
        interpolate_spline(&grid.xs()[span.clone()], &grid.ys()[span], dense);
    }
    out
}

fn run_warp(
    src: &PixelBuffer,
    source_grid: &ControlGrid,
    dest_grid: &ControlGrid,
    cancel: Option<&CancelToken>,
) -> OpsResult<PixelBuffer> {
    source_grid.check_same_shape(dest_grid)?;
    let (width, height) = src.dimensions();
    let (grid_rows, grid_cols) = source_grid.shape();
    debug!(width, height, grid_rows, grid_cols, "mesh warp");

    if src.is_empty() {
        return Ok(PixelBuffer::new(width, height)?);
    }
    let (w, h) = (width as usize, height as usize);
    let mut table = SplineTable::default();
    let mut resampler = Resampler::new();

    // horizontal pass
    let src_x = densify_columns(source_grid, h);
    let dst_x = densify_columns(dest_grid, h);
    let mut intermediate = PixelBuffer::new(width, height)?;
    for y in 0..height {
        poll(cancel)?;
        let span = y as usize * grid_cols..(y as usize + 1) * grid_cols;
        table.refit(&src_x[span.clone()], &dst_x[span], w);
        resampler.resample(src.row(y), table.as_slice(), intermediate.row_mut(y))?;
    }
    trace!(rows = height, "horizontal pass done");

    // vertical pass
    let src_y = densify_rows(source_grid, w);
    let dst_y = densify_rows(dest_grid, w);
    let mut out = PixelBuffer::new(width, height)?;
    let (mut knots, mut values) = (Vec::with_capacity(grid_rows), Vec::with_capacity(grid_rows));
    let mut column = vec![0u32; h];
    let mut resampled = vec![0u32; h];
    for x in 0..w {
        poll(cancel)?;
        knots.clear();
        values.clear();
        for row in 0..grid_rows {
            knots.push(src_y[row * w + x]);
            values.push(dst_y[row * w + x]);
        }
        table.refit(&knots, &values, h);

        let pixels = intermediate.as_slice();
        for (y, px) in column.iter_mut().enumerate() {
            *px = pixels[y * w + x];
        }
        resampler.resample(&column, table.as_slice(), &mut resampled)?;
        let pixels = out.as_mut_slice();
        for (y, &px) in resampled.iter().enumerate() {
            pixels[y * w + x] = px;
        }
    }
    trace!(cols = width, "vertical pass done");

    Ok(out)
}

/// Morphs `src` into `dest`.
///
/// Both images are warped towards the grid `source_grid.lerp(t,
/// dest_grid)`, then blended with weight `t`. `t = 0` reproduces `src`,
/// `t = 1` reproduces `dest`.
///
/// Fails if the grids or the image sizes differ.
///
/// # Example
///
/// ```rust
/// use warpkit_core::PixelBuffer;
/// use warpkit_ops::{morph, ControlGrid};
///
/// let a = PixelBuffer::filled(16, 16, 0xff000000).unwrap();
/// let b = PixelBuffer::filled(16, 16, 0xffc8c8c8).unwrap();
/// let grid = ControlGrid::new(3, 3, 16, 16).unwrap();
///
/// let half = morph(&a, &b, &grid, &grid, 0.5).unwrap();
/// assert_eq!(half.get(8, 8), Some(0xff646464));
/// ```
pub fn morph(
    src: &PixelBuffer,
    dest: &PixelBuffer,
    source_grid: &ControlGrid,
    dest_grid: &ControlGrid,
    t: f32,
) -> OpsResult<PixelBuffer> {
    run_morph(src, dest, source_grid, dest_grid, t, None)
}

/// Like [`morph`], but checks `cancel` before every scanline.
pub fn morph_with_cancel(
    src: &PixelBuffer,
    dest: &PixelBuffer,
    source_grid: &ControlGrid,
    dest_grid: &ControlGrid,
    t: f32,
    cancel: &CancelToken,
) -> OpsResult<PixelBuffer> {
    run_morph(src, dest, source_grid, dest_grid, t, Some(cancel))
}

fn run_morph(
    src: &PixelBuffer,
    dest: &PixelBuffer,
    source_grid: &ControlGrid,
    dest_grid: &ControlGrid,
    t: f32,
    cancel: Option<&CancelToken>,
) -> OpsResult<PixelBuffer> {
    source_grid.check_same_shape(dest_grid)?;
    check_same_size(src, dest)?;
    debug!(width = src.width(), height = src.height(), t, "morph");

    let mid = source_grid.lerp(t, dest_grid)?;
    let from_src = run_warp(src, source_grid, &mid, cancel)?;
    let from_dest = run_warp(dest, dest_grid, &mid, cancel)?;
    cross_dissolve(&from_src, &from_dest, t)
}

/// Warps `src` through `frames` grids evenly spaced from `source_grid`
/// to `dest_grid`.
///
/// Frame `i` uses `source_grid.lerp(i / (frames - 1), dest_grid)`. One
/// frame warps straight to `dest_grid`; zero frames yields an empty list.
pub fn tween(
    src: &PixelBuffer,
    source_grid: &ControlGrid,
    dest_grid: &ControlGrid,
    frames: usize,
) -> OpsResult<Vec<PixelBuffer>> {
    source_grid.check_same_shape(dest_grid)?;
    debug!(width = src.width(), height = src.height(), frames, "tween");
    match frames {
        0 => Ok(Vec::new()),
        1 => Ok(vec![warp(src, source_grid, dest_grid)?]),
        _ => (0..frames)
            .map(|i| {
                let t = i as f32 / (frames - 1) as f32;
                let grid = source_grid.lerp(t, dest_grid)?;
                trace!(frame = i, t, "tween frame");
                warp(src, source_grid, &grid)
            })
            .collect(),
    }
}

/// Lays equally sized frames side by side, left to right.
pub fn filmstrip(frames: &[PixelBuffer]) -> OpsResult<PixelBuffer> {
    let Some(first) = frames.first() else {
        return Ok(PixelBuffer::default());
    };
    for frame in &frames[1..] {
        check_same_size(first, frame)?;
    }
    let (w, h) = first.dimensions();
    let total = u32::try_from(frames.len())
        .ok()
        .and_then(|n| n.checked_mul(w))
        .ok_or_else(|| OpsError::InvalidParameter(format!("{} frames of width {w} overflow", frames.len())))?;
    debug!(frames = frames.len(), width = total, height = h, "filmstrip");

    let mut out = PixelBuffer::new(total, h)?;
    let w = w as usize;
    for y in 0..h {
        let row = out.row_mut(y);
        for (frame, dst) in frames.iter().zip(row.chunks_exact_mut(w.max(1))) {
            dst.copy_from_slice(frame.row(y));
        }
    }
    Ok(out)
}

/// Per-channel blend of two equally sized images: `t = 0` gives `a`,
/// `t = 1` gives `b`.
pub fn cross_dissolve(a: &PixelBuffer, b: &PixelBuffer, t: f32) -> OpsResult<PixelBuffer> {
    check_same_size(a, b)?;
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&pa, &pb)| argb::mix(t, pa, pb))
        .collect();
    Ok(PixelBuffer::from_vec(a.width(), a.height(), data)?)
}

fn check_same_size(a: &PixelBuffer, b: &PixelBuffer) -> OpsResult<()> {
    if a.dimensions() != b.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "{}x{} vs {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| if (x + y) % 2 == 0 { 0xffffffff } else { 0xff000000 }).unwrap()
    }

    fn ramp(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::from_fn(w, h, |x, y| 0xff000000 | ((x * 7 % 256) << 16) | ((y * 5 % 256) << 8) | 0x33).unwrap()
    }

    #[test]
    fn test_identity_uniform() {
        let src = ramp(40, 30);
        let grid = ControlGrid::new(4, 5, 40, 30).unwrap();
        assert_eq!(warp(&src, &grid, &grid).unwrap(), src);
    }

    #[test]
    fn test_identity_edited_grid() {
        let src = ramp(50, 50);
        let mut grid = ControlGrid::new(4, 4, 50, 50).unwrap();
        grid.translate_point(1, 2, 4.0, -3.0).unwrap();
        grid.insert_col(1).unwrap();
        assert_eq!(warp(&src, &grid, &grid).unwrap(), src);
    }

    #[test]
    fn test_identity_two_by_two_checker() {
        let src = checker(10, 10);
        let grid = ControlGrid::new(2, 2, 10, 10).unwrap();
        let out = warp(&src, &grid, &grid).unwrap();
        for (i, (a, b)) in out.as_slice().iter().zip(src.as_slice()).enumerate() {
            assert_eq!(a, b, "pixel {i}");
        }
    }

    #[test]
    fn test_solid_stays_solid() {
        let src = PixelBuffer::filled(100, 100, 0xff2080c0).unwrap();
        let from = ControlGrid::new(4, 4, 100, 100).unwrap();
        let mut to = from.clone();
        to.translate_point(1, 2, 10.0, 10.0).unwrap();
        let out = warp(&src, &from, &to).unwrap();
        assert!(out.as_slice().iter().all(|&p| p == 0xff2080c0));
    }

    #[test]
    fn test_moved_point_moves_content() {
        // a vertical stripe at x = 20 follows the grid column that sits on it
        let src = PixelBuffer::from_fn(61, 61, |x, _| if x == 20 { 0xffffffff } else { 0xff000000 }).unwrap();
        let from = ControlGrid::new(2, 4, 61, 61).unwrap();
        let mut to = from.clone();
        to.translate_point(0, 1, 10.0, 0.0).unwrap();
        to.translate_point(1, 1, 10.0, 0.0).unwrap();
        let out = warp(&src, &from, &to).unwrap();

        // the spline slope at the moved knot is below 1, so the stripe
        // covers most but not all of its destination pixel
        let row = out.row(30);
        let (brightest, &px) = row.iter().enumerate().max_by_key(|&(_, &p)| argb::unpack(p)[1]).unwrap();
        assert_eq!(brightest, 30);
        assert!(argb::unpack(px)[1] > 0xe0, "{px:#010x}");
        assert_eq!(argb::alpha(px), 0xff);
        assert_eq!(out.get(20, 30), Some(0xff000000));
    }

    #[test]
    fn test_grid_mismatch() {
        let src = ramp(8, 8);
        let a = ControlGrid::new(3, 3, 8, 8).unwrap();
        let b = ControlGrid::new(3, 4, 8, 8).unwrap();
        assert!(matches!(warp(&src, &a, &b), Err(OpsError::GridMismatch { .. })));
        assert!(matches!(morph(&src, &src, &a, &b, 0.5), Err(OpsError::GridMismatch { .. })));
        assert!(matches!(tween(&src, &a, &b, 3), Err(OpsError::GridMismatch { .. })));
    }

    #[test]
    fn test_morph_endpoints() {
        let a = ramp(32, 24);
        let b = checker(32, 24);
        let ga = ControlGrid::new(3, 3, 32, 24).unwrap();
        let mut gb = ga.clone();
        gb.translate_point(1, 1, 3.0, 2.0).unwrap();
        assert_eq!(morph(&a, &b, &ga, &gb, 0.0).unwrap(), a);
        assert_eq!(morph(&a, &b, &ga, &gb, 1.0).unwrap(), b);
    }

    #[test]
    fn test_morph_size_mismatch() {
        let g = ControlGrid::new(2, 2, 8, 8).unwrap();
        let err = morph(&ramp(8, 8), &ramp(8, 9), &g, &g, 0.5);
        assert!(matches!(err, Err(OpsError::SizeMismatch(_))));
    }

    #[test]
    fn test_cancelled() {
        let src = ramp(16, 16);
        let g = ControlGrid::new(2, 2, 16, 16).unwrap();
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(warp_with_cancel(&src, &g, &g, &token), Err(OpsError::Cancelled));
        assert_eq!(morph_with_cancel(&src, &src, &g, &g, 0.5, &token), Err(OpsError::Cancelled));
    }

    #[test]
    fn test_tween_counts() {
        let src = ramp(12, 12);
        let a = ControlGrid::new(2, 2, 12, 12).unwrap();
        let mut b = a.clone();
        b.translate_point(1, 1, -2.0, -2.0).unwrap();
        assert!(tween(&src, &a, &b, 0).unwrap().is_empty());
        let one = tween(&src, &a, &b, 1).unwrap();
        assert_eq!(one, vec![warp(&src, &a, &b).unwrap()]);
        let frames = tween(&src, &a, &b, 4).unwrap();
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0], src);
    }

    #[test]
    fn test_filmstrip_layout() {
        let a = PixelBuffer::filled(3, 2, 1).unwrap();
        let b = PixelBuffer::filled(3, 2, 2).unwrap();
        let strip = filmstrip(&[a, b]).unwrap();
        assert_eq!(strip.dimensions(), (6, 2));
        assert_eq!(strip.row(1), &[1, 1, 1, 2, 2, 2]);
        assert!(filmstrip(&[]).unwrap().is_empty());
        let odd = PixelBuffer::filled(2, 2, 0).unwrap();
        assert!(filmstrip(&[strip, odd]).is_err());
    }

    #[test]
    fn test_cross_dissolve() {
        let a = PixelBuffer::filled(2, 2, 0xff000000).unwrap();
        let b = PixelBuffer::filled(2, 2, 0x00ffffff).unwrap();
        let mid = cross_dissolve(&a, &b, 0.5).unwrap();
        assert!(mid.as_slice().iter().all(|&p| p == 0x80808080));
        let small = PixelBuffer::filled(1, 2, 0).unwrap();
        assert!(matches!(cross_dissolve(&a, &small, 0.5), Err(OpsError::SizeMismatch(_))));
    }

    #[test]
    fn test_empty_image() {
        let src = PixelBuffer::new(0, 5).unwrap();
        let g = ControlGrid::new(2, 2, 1, 1).unwrap();
        assert_eq!(warp(&src, &g, &g).unwrap().dimensions(), (0, 5));
    }
}
