use vello_cpu::kurbo::{BezPath, Circle, Shape as _};

use crate::blur_cpu::blur_surface;
use crate::color::Rgba8;
use crate::composite_cpu::over_in_place;
use crate::error::BannerResult;
use crate::raster::{PathFill, fill_layer};
use crate::surface::Surface;

/// Blur that turns hard-edged disks into soft glows.
pub const GLOW_BLUR_RADIUS: u32 = 80;
pub const GLOW_BLUR_SIGMA: f32 = 40.0;

/// One randomly placed translucent disk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeDescriptor {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub color: Rgba8,
}

/// Sample `count` disks: centers uniform in the middle 80% of the image,
/// radii uniform in [0.2, 0.6] of min(width,height), colors alternating
/// between a teal-leaning and a blue-leaning palette that darken per index.
pub fn sample_shapes(
    width: u32,
    height: u32,
    count: u32,
    rng: &mut fastrand::Rng,
) -> Vec<ShapeDescriptor> {
    let min_dim = width.min(height);
    let r_lo = (f64::from(min_dim) * 0.2) as u32;
    let r_hi = (f64::from(min_dim) * 0.6) as u32;
    let x_lo = (f64::from(width) * 0.1) as u32;
    let x_hi = (f64::from(width) * 0.9) as u32;
    let y_lo = (f64::from(height) * 0.1) as u32;
    let y_hi = (f64::from(height) * 0.9) as u32;

    (0..count)
        .map(|i| {
            let cx = rng.u32(x_lo..=x_hi);
            let cy = rng.u32(y_lo..=y_hi);
            let radius = rng.u32(r_lo..=r_hi);
            ShapeDescriptor {
                cx: f64::from(cx),
                cy: f64::from(cy),
                radius: f64::from(radius),
                color: palette_color(i),
            }
        })
        .collect()
}

fn palette_color(i: u32) -> Rgba8 {
    let i = i as i32;
    let ch = |v: i32| v.clamp(0, 255) as u8;
    if i % 2 == 0 {
        Rgba8::new(ch(255 - i * 30), ch(200 - i * 20), 230, 40)
    } else {
        Rgba8::new(200, 230, ch(255 - i * 20), 36)
    }
}

/// Draw `count` random disks on a transparent layer, blur the layer into soft
/// glows, and composite it over `base`.
pub fn apply(base: &mut Surface, count: u32, rng: &mut fastrand::Rng) -> BannerResult<()> {
    if count == 0 {
        return Ok(());
    }

    let shapes = sample_shapes(base.width(), base.height(), count, rng);
    let fills: Vec<PathFill> = shapes
        .iter()
        .map(|s| {
            let circle = Circle::new((s.cx, s.cy), s.radius);
            let mut path = BezPath::new();
            for el in circle.path_elements(0.1) {
                path.push(el);
            }
            PathFill {
                path,
                color: s.color,
            }
        })
        .collect();

    let layer = fill_layer(base.width(), base.height(), &fills)?;
    let blurred = blur_surface(&layer, GLOW_BLUR_RADIUS, GLOW_BLUR_SIGMA)?;
    over_in_place(base, &blurred)
}
