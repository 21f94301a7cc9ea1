use rayon::prelude::*;

use crate::error::{BannerError, BannerResult};
use crate::surface::Surface;

/// Separable Gaussian blur over a premultiplied RGBA8 surface.
///
/// The kernel is quantized to Q16 fixed point and normalized to sum exactly
/// 65536, so a constant image blurs to itself and channel values never leave
/// `[0,255]`. Sampling clamps to the edge. Rows (and output rows of the
/// vertical pass) are independent, so both passes run in parallel with
/// identical output regardless of thread count.
pub fn blur_surface(src: &Surface, radius: u32, sigma: f32) -> BannerResult<Surface> {
    if radius == 0 {
        return Ok(src.clone());
    }

    let (width, height) = (src.width(), src.height());
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; src.data().len()];
    let mut out = vec![0u8; src.data().len()];

    horizontal_pass(src.data(), &mut tmp, width, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Surface::from_premul_bytes(width, height, out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> BannerResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(BannerError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(BannerError::raster("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Force the quantized weights to sum to exactly 1.0 in Q16.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        weights[mid] = (mid_val + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let row_bytes = (width as usize) * 4;

    dst.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src[y * row_bytes..(y + 1) * row_bytes];
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let dx = ki as i32 - radius;
                    let sx = (x + dx).clamp(0, w - 1);
                    let idx = (sx as usize) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src_row[idx + c]);
                    }
                }
                let out_idx = (x as usize) * 4;
                for c in 0..4 {
                    row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as usize;
    let h = height as i32;
    let row_bytes = w * 4;

    dst.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as i32;
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let dy = ki as i32 - radius;
                    let sy = (y + dy).clamp(0, h - 1);
                    let idx = ((sy as usize) * w + x) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                for c in 0..4 {
                    row[x * 4 + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_radius_0_is_identity() {
        let src = Surface::from_premul_bytes(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let out = blur_surface(&src, 0, 1.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn blur_constant_image_is_identity() {
        let px = [10u8, 20, 30, 40];
        let data = px.repeat(12);
        let src = Surface::from_premul_bytes(4, 3, data).unwrap();
        let out = blur_surface(&src, 3, 2.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn blur_spreads_energy_from_single_pixel() {
        let mut data = vec![0u8; 5 * 5 * 4];
        let center = (2 * 5 + 2) * 4;
        data[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
        let src = Surface::from_premul_bytes(5, 5, data).unwrap();

        let out = blur_surface(&src, 2, 1.2).unwrap();

        let nonzero = out.data().chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);

        let sum_a: u32 = out.data().chunks_exact(4).map(|px| u32::from(px[3])).sum();
        assert!((sum_a as i32 - 255).abs() <= 4);
    }

    #[test]
    fn blur_rejects_bad_sigma() {
        let src = Surface::new_transparent(2, 2).unwrap();
        assert!(blur_surface(&src, 1, 0.0).is_err());
        assert!(blur_surface(&src, 1, f32::NAN).is_err());
    }
}
