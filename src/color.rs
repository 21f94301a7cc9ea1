/// Opaque RGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation toward `other`.
    ///
    /// `t` is expected in `[0,1]` but is not rejected outside it; extrapolated
    /// channel values clamp to `[0,255]`.
    pub fn blend(self, other: Rgb8, t: f32) -> Rgb8 {
        Rgb8 {
            r: lerp_u8(self.r, other.r, t),
            g: lerp_u8(self.g, other.g, t),
            b: lerp_u8(self.b, other.b, t),
        }
    }

    pub fn with_alpha(self, a: u8) -> Rgba8 {
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

/// Straight-alpha RGBA color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to premultiplied RGBA8 bytes.
    pub fn to_premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

/// Channel interpolation with integer truncation, matching `a + (b-a)*t`.
pub fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let v = f32::from(a) + (f32::from(b) - f32::from(a)) * t;
    (v as i32).clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints_are_exact() {
        assert_eq!(lerp_u8(20, 140, 0.0), 20);
        assert_eq!(lerp_u8(20, 140, 1.0), 140);
    }

    #[test]
    fn lerp_truncates_toward_zero() {
        // 10 + (13 - 10) * 0.5 = 11.5 -> 11
        assert_eq!(lerp_u8(10, 13, 0.5), 11);
    }

    #[test]
    fn lerp_extrapolation_clamps_channels() {
        assert_eq!(lerp_u8(10, 200, 2.0), 255);
        assert_eq!(lerp_u8(200, 10, 2.0), 0);
    }

    #[test]
    fn blend_midpoint() {
        let a = Rgb8::new(0, 100, 200);
        let b = Rgb8::new(100, 0, 200);
        assert_eq!(a.blend(b, 0.5), Rgb8::new(50, 50, 200));
    }

    #[test]
    fn premul_scales_channels_and_keeps_alpha() {
        let c = Rgba8::new(255, 128, 0, 128);
        let p = c.to_premul();
        assert_eq!(p[0], 128);
        assert_eq!(p[3], 128);
        assert_eq!(p[2], 0);
    }

    #[test]
    fn premul_opaque_is_identity() {
        let c = Rgba8::new(12, 34, 56, 255);
        assert_eq!(c.to_premul(), [12, 34, 56, 255]);
    }
}
