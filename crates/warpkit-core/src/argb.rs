//! Packed 32-bit ARGB channel math.
//!
//! Pixels are `0xAARRGGBB` words. Blends treat each of the four channels
//! independently in 0-255 space and round to the nearest integer; alpha
//! premultiplication is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use warpkit_core::argb;
//!
//! let c = argb::pack([255, 10, 20, 30]);
//! assert_eq!(c, 0xff0a141e);
//! assert_eq!(argb::unpack(c), [255, 10, 20, 30]);
//! assert_eq!(argb::mix(0.5, 0xff000000, 0xff0000fe), 0xff00007f);
//! ```

/// Mask selecting the color channels of a pixel (alpha cleared).
pub const RGB_MASK: u32 = 0x00ff_ffff;

/// Splits a pixel into `[a, r, g, b]`.
#[inline]
pub const fn unpack(argb: u32) -> [u8; 4] {
    argb.to_be_bytes()
}

/// Packs `[a, r, g, b]` into a pixel.
#[inline]
pub const fn pack(channels: [u8; 4]) -> u32 {
    u32::from_be_bytes(channels)
}

/// Alpha channel of a pixel.
#[inline]
pub const fn alpha(argb: u32) -> u8 {
    (argb >> 24) as u8
}

#[inline]
fn to_channel(v: f32) -> u8 {
    // NaN saturates to 0 through `as`
    (v + 0.5).clamp(0.0, 255.0) as u8
}

/// Packs four float channels `[a, r, g, b]`, rounding and clamping to 0-255.
#[inline]
pub fn pack_f32(channels: [f32; 4]) -> u32 {
    pack(channels.map(to_channel))
}

/// Linear per-channel blend: `t = 0` gives `a`, `t = 1` gives `b`.
#[inline]
pub fn mix(t: f32, a: u32, b: u32) -> u32 {
    let ca = unpack(a);
    let cb = unpack(b);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let (va, vb) = (ca[i] as f32, cb[i] as f32);
        out[i] = to_channel(va + t * (vb - va));
    }
    pack(out)
}

/// Bilinear blend of four neighbours.
///
/// `fx`, `fy` are the fractional offsets from `nw` towards `ne`/`sw`.
/// Weights are `(1-fx)(1-fy)`, `fx(1-fy)`, `(1-fx)fy` and `fx*fy`, so a
/// zero offset returns `nw` exactly.
#[inline]
pub fn bilinear(fx: f32, fy: f32, nw: u32, ne: u32, sw: u32, se: u32) -> u32 {
    let (cnw, cne, csw, cse) = (unpack(nw), unpack(ne), unpack(sw), unpack(se));
    let gx = 1.0 - fx;
    let gy = 1.0 - fy;
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = gx * cnw[i] as f32 + fx * cne[i] as f32;
        let bottom = gx * csw[i] as f32 + fx * cse[i] as f32;
        out[i] = to_channel(gy * top + fy * bottom);
    }
    pack(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_unpack() {
        assert_eq!(unpack(0x80402010), [0x80, 0x40, 0x20, 0x10]);
        assert_eq!(pack([1, 2, 3, 4]), 0x01020304);
        assert_eq!(alpha(0xfe000000), 0xfe);
    }

    #[test]
    fn test_pack_f32_rounds_and_clamps() {
        assert_eq!(pack_f32([254.6, -3.0, 300.0, 0.4]), 0xff00ff00);
        assert_eq!(pack_f32([f32::NAN, 0.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn test_mix_endpoints_exact() {
        let a = 0x12345678;
        let b = 0xfedcba98;
        assert_eq!(mix(0.0, a, b), a);
        assert_eq!(mix(1.0, a, b), b);
    }

    #[test]
    fn test_mix_midpoint() {
        assert_eq!(mix(0.5, 0x00000000, 0xc8c8c8c8), 0x64646464);
    }

    #[test]
    fn test_bilinear_corners() {
        let (nw, ne, sw, se) = (0xff000000, 0xffff0000, 0xff00ff00, 0xff0000ff);
        assert_eq!(bilinear(0.0, 0.0, nw, ne, sw, se), nw);
        assert_eq!(bilinear(1.0, 0.0, nw, ne, sw, se), ne);
        assert_eq!(bilinear(0.0, 1.0, nw, ne, sw, se), sw);
        assert_eq!(bilinear(1.0, 1.0, nw, ne, sw, se), se);
    }

    #[test]
    fn test_bilinear_center() {
        let v = bilinear(0.5, 0.5, 0x00000000, 0x00000000, 0xc8c8c8c8, 0xc8c8c8c8);
        assert_eq!(v, 0x64646464);
    }
}
