//! One-dimensional scanline resampling.
//!
//! The separable mesh warp reduces a 2-D deformation to a sequence of
//! 1-D remaps. Each remap is described by a forward table: entry `i` is
//! the destination coordinate that the leading edge of source pixel `i`
//! moves to, and the last entry closes the final pixel.
//!
//! [`Resampler`] inverts that table into "which source span lands on
//! destination pixel `j`" and box-filters the span:
//!
//! ```text
//! forward  f[i]  : source edge i      -> destination coordinate
//! inverse  g[j]  : destination edge j -> source coordinate
//! dst[j] = average of src over [g[j], g[j+1]]
//! ```
//!
//! Tables that fold back on themselves are made monotone first, and all
//! coordinates are clamped to the buffers, so any table yields a valid
//! scanline.

use warpkit_core::argb;

use crate::{OpsError, OpsResult};

/// Source spans shorter than this take the single pixel under them.
const MIN_COVERAGE: f32 = 1e-4;

/// Reusable scratch space for resampling many scanlines.
#[derive(Debug, Clone, Default)]
pub struct Resampler {
    forward: Vec<f32>,
    inverse: Vec<f32>,
}

impl Resampler {
    /// Creates a resampler with empty scratch buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resamples `src` into `dst` through the forward `table`.
    ///
    /// `table` needs `src.len() + 1` entries; its values are destination
    /// coordinates in `[0, dst.len()]` (values outside are clamped).
    ///
    /// # Example
    ///
    /// ```rust
    /// use warpkit_ops::resample::Resampler;
    ///
    /// let src = [0xff000000, 0xff0000ff];
    /// let mut dst = [0u32; 4];
    /// // stretch two pixels over four
    /// Resampler::new().resample(&src, &[0.0, 2.0, 4.0], &mut dst).unwrap();
    /// assert_eq!(dst, [0xff000000, 0xff000000, 0xff0000ff, 0xff0000ff]);
    /// ```
    pub fn resample(&mut self, src: &[u32], table: &[f32], dst: &mut [u32]) -> OpsResult<()> {
        let n = src.len();
        if table.len() != n + 1 {
            return Err(OpsError::SizeMismatch(format!(
                "resample table has {} entries for {n} source pixels",
                table.len()
            )));
        }
        if n == 0 {
            dst.fill(0);
            return Ok(());
        }
        let m = dst.len();
        self.make_monotone(table, m as f32);
        self.invert(m, n as f32);

        for (j, out) in dst.iter_mut().enumerate() {
            let (a, b) = (self.inverse[j], self.inverse[j + 1]);
            *out = box_average(src, a, b);
        }
        Ok(())
    }

    /// Clamps the forward table into `[0, limit]` and removes fold-backs.
    fn make_monotone(&mut self, table: &[f32], limit: f32) {
        self.forward.clear();
        let mut prev = 0.0f32;
        for &v in table {
            // NaN loses both comparisons and keeps `prev`
            prev = prev.max(v.clamp(0.0, limit));
            self.forward.push(prev);
        }
    }

    /// Inverts the monotone forward table into `m + 1` source coordinates
    /// in `[0, limit]`.
    fn invert(&mut self, m: usize, limit: f32) {
        let f = &self.forward;
        let last = f.len() - 1;
        self.inverse.clear();
        let mut i = 0;
        for j in 0..=m {
            let target = j as f32;
            while i < last && f[i + 1] < target {
                i += 1;
            }
            let s = if i >= last {
                limit
            } else if target <= f[i] {
                i as f32
            } else {
                i as f32 + (target - f[i]) / (f[i + 1] - f[i])
            };
            self.inverse.push(s.min(limit));
        }
    }
}

/// Area-weighted mean of `src` over `[a, b]`, rounded per channel.
#[inline]
fn box_average(src: &[u32], a: f32, b: f32) -> u32 {
    let n = src.len();
    if b - a < MIN_COVERAGE {
        return src[(a.floor() as usize).min(n - 1)];
    }
    let first = a.floor() as usize;
    let end = (b.ceil() as usize).min(n);
    if end == first + 1 {
        return src[first];
    }

    let mut acc = [0.0f32; 4];
    for (k, &px) in src.iter().enumerate().take(end).skip(first) {
        let w = b.min((k + 1) as f32) - a.max(k as f32);
        if w <= 0.0 {
            continue;
        }
        for (sum, c) in acc.iter_mut().zip(argb::unpack(px)) {
            *sum += w * c as f32;
        }
    }
    let norm = 1.0 / (b - a);
    argb::pack_f32(acc.map(|v| v * norm))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_table(n: usize) -> Vec<f32> {
        (0..=n).map(|i| i as f32).collect()
    }

    #[test]
    fn test_identity_exact() {
        let src: Vec<u32> = (0..9).map(|i| 0xff000000 | i * 0x0a0b0c).collect();
        let mut dst = vec![0; 9];
        Resampler::new().resample(&src, &identity_table(9), &mut dst).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_constant_stays_constant() {
        let src = vec![0x80336699u32; 16];
        let table: Vec<f32> = (0..=16).map(|i| (i as f32 * 1.37).min(16.0)).collect();
        let mut dst = vec![0; 16];
        Resampler::new().resample(&src, &table, &mut dst).unwrap();
        assert!(dst.iter().all(|&p| p == 0x80336699));
    }

    #[test]
    fn test_shift_right() {
        let src = [1u32, 2, 3, 4, 5, 6];
        let table = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 6.0];
        let mut dst = [0u32; 6];
        Resampler::new().resample(&src, &table, &mut dst).unwrap();
        assert_eq!(dst, [1, 1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_shrink_averages() {
        // four pixels squeezed into two
        let src = [0xff000000, 0xff0000c8, 0xff000000, 0xff000064];
        let table = [0.0, 0.5, 1.0, 1.5, 2.0];
        let mut dst = [0u32; 2];
        Resampler::new().resample(&src, &table, &mut dst).unwrap();
        assert_eq!(dst, [0xff000064, 0xff000032]);
    }

    #[test]
    fn test_folded_table_is_finite() {
        let src = [0xff112233u32; 5];
        let table = [0.0, 3.0, 1.0, f32::NAN, -2.0, 5.0];
        let mut dst = [0u32; 5];
        Resampler::new().resample(&src, &table, &mut dst).unwrap();
        assert!(dst.iter().all(|&p| p == 0xff112233));
    }

    #[test]
    fn test_table_length_checked() {
        let mut dst = [0u32; 3];
        let err = Resampler::new().resample(&[1, 2, 3], &[0.0, 1.0, 2.0], &mut dst);
        assert!(matches!(err, Err(OpsError::SizeMismatch(_))));
    }

    #[test]
    fn test_empty_source() {
        let mut dst = [7u32; 3];
        Resampler::new().resample(&[], &[0.0], &mut dst).unwrap();
        assert_eq!(dst, [0, 0, 0]);
    }
}
