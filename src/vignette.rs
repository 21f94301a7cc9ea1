use rayon::prelude::*;

use crate::composite_cpu::{add_sat_u8, mul_div255};
use crate::surface::Surface;

const MASK_STRENGTH: f64 = 0.4;
const MASK_CEILING: u8 = 180;

/// Radial vignette mask, one intensity byte per pixel.
///
/// `d = dx² + dy²` with coordinates normalized to [-1,1] from the image
/// center; intensity is `round(255·d·0.4)` clamped to [0,180]. The ceiling
/// keeps corners short of pure black. Pure function of coordinates.
pub fn mask(width: u32, height: u32) -> Vec<u8> {
    let w = width as usize;
    let half_w = f64::from(width) / 2.0;
    let half_h = f64::from(height) / 2.0;

    let mut out = vec![0u8; w * height as usize];
    out.par_chunks_exact_mut(w).enumerate().for_each(|(y, row)| {
        let dy = (y as f64 - half_h) / half_h;
        for (x, v) in row.iter_mut().enumerate() {
            let dx = (x as f64 - half_w) / half_w;
            let d = dx * dx + dy * dy;
            let raw = (255.0 * d * MASK_STRENGTH).round();
            *v = (raw as i64).clamp(0, i64::from(MASK_CEILING)) as u8;
        }
    });
    out
}

/// Blend `base` toward opaque black by the mask intensity:
/// `out = black·v/255 + base·(255−v)/255`.
pub fn apply(base: &mut Surface) {
    let m = mask(base.width(), base.height());
    for (px, &v) in base.data_mut().chunks_exact_mut(4).zip(&m) {
        if v == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(v);
        for c in &mut px[..3] {
            *c = mul_div255(u16::from(*c), inv);
        }
        // Black contributes 255·v/255 = v to alpha.
        px[3] = add_sat_u8(mul_div255(u16::from(px[3]), inv), v);
    }
}
