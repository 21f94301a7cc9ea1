use crate::error::{BannerError, BannerResult};
use crate::surface::Surface;

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff "over" on premultiplied RGBA8: `out = src + dst*(1 - sa)`.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Composite a full layer over `dst` in place. Dimensions must match.
pub fn over_in_place(dst: &mut Surface, src: &Surface) -> BannerResult<()> {
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(BannerError::validation(
            "over_in_place expects surfaces of equal dimensions",
        ));
    }
    for (d, s) in dst
        .data_mut()
        .chunks_exact_mut(4)
        .zip(src.data().chunks_exact(4))
    {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
