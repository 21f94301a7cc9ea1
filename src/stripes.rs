use vello_cpu::kurbo::BezPath;

use crate::blur_cpu::blur_surface;
use crate::color::Rgba8;
use crate::composite_cpu::over_in_place;
use crate::error::BannerResult;
use crate::raster::{PathFill, fill_layer};
use crate::surface::Surface;

const SPACING_PX: i64 = 40;
const THICKNESS_PX: f64 = 10.0;
const STRIPE_COLOR: Rgba8 = Rgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 8,
};
const STRIPE_BLUR_RADIUS: u32 = 6;
const STRIPE_BLUR_SIGMA: f32 = 3.0;

/// Faint diagonal white stripes, softened with a small blur and composited
/// over `base`. No randomness: fixed spacing, thickness, and slope.
pub fn apply(base: &mut Surface) -> BannerResult<()> {
    let w = f64::from(base.width());
    let h = f64::from(base.height());

    // Start columns span [-w, 2w) so the diagonals cover the whole visible
    // region regardless of slope.
    let mut fills = Vec::new();
    let mut x = -(base.width() as i64);
    while x < (base.width() as i64) * 2 {
        fills.push(PathFill {
            path: stripe_quad(x as f64, w, h),
            color: STRIPE_COLOR,
        });
        x += SPACING_PX;
    }

    let layer = fill_layer(base.width(), base.height(), &fills)?;
    let softened = blur_surface(&layer, STRIPE_BLUR_RADIUS, STRIPE_BLUR_SIGMA)?;
    over_in_place(base, &softened)
}

/// A thick line from (x,0) to (x+w,h) expressed as a filled quad.
fn stripe_quad(x: f64, w: f64, h: f64) -> BezPath {
    let len = (w * w + h * h).sqrt();
    let half = THICKNESS_PX / 2.0;
    let (px, py) = (-h / len * half, w / len * half);

    let mut path = BezPath::new();
    path.move_to((x + px, py));
    path.line_to((x + w + px, h + py));
    path.line_to((x + w - px, h - py));
    path.line_to((x - px, -py));
    path.close_path();
    path
}
