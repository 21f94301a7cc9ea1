use crate::color::Rgb8;
use crate::error::{BannerError, BannerResult};

/// Owned premultiplied RGBA8 pixel buffer, row-major.
///
/// All pipeline stages operate on this type; straight-alpha colors are
/// premultiplied once when a layer is drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface (all channels zero). Dimensions must be
    /// nonzero.
    pub fn new_transparent(width: u32, height: u32) -> BannerResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Opaque surface filled with a single color.
    pub fn new_opaque(width: u32, height: u32, color: Rgb8) -> BannerResult<Self> {
        let mut s = Self::new_transparent(width, height)?;
        for px in s.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
        Ok(s)
    }

    /// Wrap premultiplied RGBA8 bytes, validating the length.
    pub fn from_premul_bytes(width: u32, height: u32, data: Vec<u8>) -> BannerResult<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(BannerError::validation(
                "surface bytes must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied RGBA of one pixel. Panics out of bounds (test/assert use).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Force every pixel fully opaque, un-premultiplying where needed.
    pub fn flatten_alpha(&mut self) {
        for px in self.data.chunks_exact_mut(4) {
            let a = px[3];
            if a == 255 {
                continue;
            }
            if a == 0 {
                px.copy_from_slice(&[0, 0, 0, 255]);
                continue;
            }
            for c in &mut px[..3] {
                let v = (u16::from(*c) * 255 + u16::from(a) / 2) / u16::from(a);
                *c = v.min(255) as u8;
            }
            px[3] = 255;
        }
    }

    /// Flatten to straight RGB8 bytes for encoding.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            if a == 255 {
                out.extend_from_slice(&px[..3]);
            } else if a == 0 {
                out.extend_from_slice(&[0, 0, 0]);
            } else {
                for &c in &px[..3] {
                    let v = (u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a);
                    out.push(v.min(255) as u8);
                }
            }
        }
        out
    }
}

fn byte_len(width: u32, height: u32) -> BannerResult<usize> {
    if width == 0 || height == 0 {
        return Err(BannerError::validation("surface dimensions must be nonzero"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BannerError::validation("surface size overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_surface_is_zeroed() {
        let s = Surface::new_transparent(3, 2).unwrap();
        assert_eq!(s.data().len(), 24);
        assert!(s.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn opaque_fill_sets_every_pixel() {
        let s = Surface::new_opaque(2, 2, Rgb8::new(10, 20, 30)).unwrap();
        for px in s.data().chunks_exact(4) {
            assert_eq!(px, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(Surface::new_transparent(0, 4).is_err());
        assert!(Surface::new_transparent(4, 0).is_err());
        assert!(Surface::from_premul_bytes(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn from_premul_bytes_rejects_bad_length() {
        assert!(Surface::from_premul_bytes(2, 2, vec![0u8; 15]).is_err());
    }

    #[test]
    fn to_rgb8_unpremultiplies() {
        // half-alpha mid gray premul: (64,64,64,128) -> straight ~(128,128,128)
        let s = Surface::from_premul_bytes(1, 1, vec![64, 64, 64, 128]).unwrap();
        let rgb = s.to_rgb8();
        assert_eq!(rgb.len(), 3);
        assert!((i32::from(rgb[0]) - 128).abs() <= 1);
    }

    #[test]
    fn flatten_alpha_makes_everything_opaque() {
        let mut s = Surface::from_premul_bytes(2, 1, vec![64, 64, 64, 128, 0, 0, 0, 0]).unwrap();
        s.flatten_alpha();
        assert!(s.data().chunks_exact(4).all(|px| px[3] == 255));
    }
}
