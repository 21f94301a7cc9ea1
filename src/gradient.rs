use crate::color::Rgb8;
use crate::error::BannerResult;
use crate::surface::Surface;

/// Opaque vertical gradient: row 0 is exactly `top`, the last row exactly
/// `bottom`, with linear interpolation between.
pub fn fill(width: u32, height: u32, top: Rgb8, bottom: Rgb8) -> BannerResult<Surface> {
    let mut surface = Surface::new_transparent(width, height)?;
    let row_bytes = (width as usize) * 4;
    let denom = height.saturating_sub(1).max(1);

    for (y, row) in surface.data_mut().chunks_exact_mut(row_bytes).enumerate() {
        let t = y as f32 / denom as f32;
        let c = top.blend(bottom, t);
        for px in row.chunks_exact_mut(4) {
            px.copy_from_slice(&[c.r, c.g, c.b, 255]);
        }
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_and_last_rows_are_exact() {
        let top = Rgb8::new(20, 120, 140);
        let bottom = Rgb8::new(120, 40, 140);
        let g = fill(8, 5, top, bottom).unwrap();

        assert_eq!(g.pixel(0, 0), [20, 120, 140, 255]);
        assert_eq!(g.pixel(7, 4), [120, 40, 140, 255]);
    }

    #[test]
    fn rows_match_blend_formula() {
        let top = Rgb8::new(0, 0, 0);
        let bottom = Rgb8::new(200, 100, 50);
        let h = 11;
        let g = fill(3, h, top, bottom).unwrap();

        for y in 0..h {
            let t = y as f32 / (h - 1) as f32;
            let expect = top.blend(bottom, t);
            let px = g.pixel(1, y);
            assert_eq!(px, [expect.r, expect.g, expect.b, 255], "row {y}");
        }
    }

    #[test]
    fn rows_are_uniform_and_opaque() {
        let g = fill(5, 3, Rgb8::new(1, 2, 3), Rgb8::new(9, 8, 7)).unwrap();
        for y in 0..3 {
            let first = g.pixel(0, y);
            assert_eq!(first[3], 255);
            for x in 1..5 {
                assert_eq!(g.pixel(x, y), first);
            }
        }
    }
}
