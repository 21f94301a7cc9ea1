use rayon::prelude::*;

use crate::composite_cpu::over_in_place;
use crate::error::BannerResult;
use crate::surface::Surface;

const NOISE_ALPHA: u8 = 12;

/// Per-pixel gray noise layer composited over `base`.
///
/// Each pixel samples v uniformly in `[0, intensity]` and contributes
/// `(v,v,v)` at alpha 12. Rows are filled in parallel; every row gets its own
/// seed drawn sequentially from `rng` first, so the result is identical
/// whatever the thread count.
pub fn apply(base: &mut Surface, intensity: u8, rng: &mut fastrand::Rng) -> BannerResult<()> {
    let layer = noise_layer(base.width(), base.height(), intensity, rng)?;
    over_in_place(base, &layer)
}

pub(crate) fn noise_layer(
    width: u32,
    height: u32,
    intensity: u8,
    rng: &mut fastrand::Rng,
) -> BannerResult<Surface> {
    let mut layer = Surface::new_transparent(width, height)?;
    let row_seeds: Vec<u64> = (0..height).map(|_| rng.u64(..)).collect();
    let row_bytes = (width as usize) * 4;

    layer
        .data_mut()
        .par_chunks_exact_mut(row_bytes)
        .zip(row_seeds)
        .for_each(|(row, seed)| {
            let mut row_rng = fastrand::Rng::with_seed(seed);
            for px in row.chunks_exact_mut(4) {
                let v = row_rng.u8(0..=intensity);
                let p = premul_gray(v);
                px.copy_from_slice(&[p, p, p, NOISE_ALPHA]);
            }
        });

    Ok(layer)
}

fn premul_gray(v: u8) -> u8 {
    ((u16::from(v) * u16::from(NOISE_ALPHA) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb8;

    #[test]
    fn layer_is_deterministic_per_seed() {
        let mut a = fastrand::Rng::with_seed(99);
        let mut b = fastrand::Rng::with_seed(99);
        let la = noise_layer(64, 16, 18, &mut a).unwrap();
        let lb = noise_layer(64, 16, 18, &mut b).unwrap();
        assert_eq!(la, lb);
    }

    #[test]
    fn layer_values_bounded_by_intensity() {
        let mut rng = fastrand::Rng::with_seed(5);
        let layer = noise_layer(32, 8, 18, &mut rng).unwrap();
        let cap = premul_gray(18);
        for px in layer.data().chunks_exact(4) {
            assert!(px[0] <= cap);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], NOISE_ALPHA);
        }
    }

    #[test]
    fn zero_intensity_layer_is_pure_alpha() {
        let mut rng = fastrand::Rng::with_seed(5);
        let layer = noise_layer(8, 8, 0, &mut rng).unwrap();
        for px in layer.data().chunks_exact(4) {
            assert_eq!(&px[..3], &[0, 0, 0]);
            assert_eq!(px[3], NOISE_ALPHA);
        }
    }

    #[test]
    fn apply_keeps_base_opaque() {
        let mut base = Surface::new_opaque(16, 16, Rgb8::new(100, 100, 100)).unwrap();
        let mut rng = fastrand::Rng::with_seed(11);
        apply(&mut base, 18, &mut rng).unwrap();
        assert!(base.data().chunks_exact(4).all(|px| px[3] == 255));
    }
}
