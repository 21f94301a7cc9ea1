use std::path::{Path, PathBuf};

use crate::blur_cpu::blur_surface;
use crate::color::Rgb8;
use crate::error::{BannerError, BannerResult};
use crate::surface::Surface;
use crate::text::TextCompositor;
use crate::{gradient, noise, shapes, stripes, vignette};

pub const BANNER_WIDTH: u32 = 1500;
pub const BANNER_HEIGHT: u32 = 500;

pub const DEFAULT_TITLE: &str = "Your Brand";
pub const DEFAULT_SUBTITLE: &str = "@yourhandle";
pub const DEFAULT_OUT: &str = "social-header-1500x500.png";

/// Teal top, purple bottom.
pub const DEFAULT_TOP_COLOR: Rgb8 = Rgb8 {
    r: 20,
    g: 120,
    b: 140,
};
pub const DEFAULT_BOTTOM_COLOR: Rgb8 = Rgb8 {
    r: 120,
    g: 40,
    b: 140,
};

pub const DEFAULT_SHAPE_COUNT: u32 = 4;
pub const DEFAULT_NOISE_INTENSITY: u8 = 18;

const GLOBAL_BLUR_RADIUS: u32 = 1;
const GLOBAL_BLUR_SIGMA: f32 = 1.0;
const MAX_SHAPE_COUNT: u32 = 64;

/// Everything needed to render one banner. Loadable from JSON; every field
/// has a default.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerSpec {
    pub title: String,
    pub subtitle: String,
    /// Seed for the shape/noise RNG; `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    pub top_color: Rgb8,
    pub bottom_color: Rgb8,
    pub shape_count: u32,
    pub noise_intensity: u8,
    /// Ordered font candidates; empty means the built-in list.
    pub font_candidates: Vec<PathBuf>,
}

impl Default for BannerSpec {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            seed: None,
            top_color: DEFAULT_TOP_COLOR,
            bottom_color: DEFAULT_BOTTOM_COLOR,
            shape_count: DEFAULT_SHAPE_COUNT,
            noise_intensity: DEFAULT_NOISE_INTENSITY,
            font_candidates: Vec::new(),
        }
    }
}

impl BannerSpec {
    pub fn validate(&self) -> BannerResult<()> {
        if self.shape_count > MAX_SHAPE_COUNT {
            return Err(BannerError::validation(format!(
                "shape_count must be <= {MAX_SHAPE_COUNT}"
            )));
        }
        Ok(())
    }

    fn font_candidates(&self) -> Vec<PathBuf> {
        if self.font_candidates.is_empty() {
            crate::text::default_font_candidates()
        } else {
            self.font_candidates.clone()
        }
    }
}

/// Run the full compositing pipeline and return the final 1500x500 surface.
///
/// Stage order is a correctness constraint: gradient, shapes, stripes, noise,
/// global blur, text, vignette. Each stage completes before the next starts.
#[tracing::instrument(skip(spec), fields(seed = ?spec.seed))]
pub fn render_banner(spec: &BannerSpec) -> BannerResult<Surface> {
    spec.validate()?;

    let mut rng = match spec.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    tracing::debug!("gradient base");
    let mut img = gradient::fill(
        BANNER_WIDTH,
        BANNER_HEIGHT,
        spec.top_color,
        spec.bottom_color,
    )?;

    tracing::debug!(count = spec.shape_count, "shape glows");
    shapes::apply(&mut img, spec.shape_count, &mut rng)?;

    tracing::debug!("stripes");
    stripes::apply(&mut img)?;

    tracing::debug!(intensity = spec.noise_intensity, "noise");
    noise::apply(&mut img, spec.noise_intensity, &mut rng)?;

    tracing::debug!("global blur");
    img = blur_surface(&img, GLOBAL_BLUR_RADIUS, GLOBAL_BLUR_SIGMA)?;

    tracing::debug!("text");
    TextCompositor::new().draw(&mut img, &spec.title, &spec.subtitle, &spec.font_candidates())?;

    img.flatten_alpha();

    tracing::debug!("vignette");
    vignette::apply(&mut img);

    Ok(img)
}

/// Encode the surface as opaque RGB8 PNG. Write failures surface as
/// [`BannerError::Encode`]; no partial file is guaranteed.
pub fn save_png(surface: &Surface, path: &Path) -> BannerResult<()> {
    let rgb = surface.to_rgb8();
    image::save_buffer_with_format(
        path,
        &rgb,
        surface.width(),
        surface.height(),
        image::ExtendedColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .map_err(|e| BannerError::encode(format!("write png '{}': {e}", path.display())))
}

/// Render and persist in one call.
pub fn generate(spec: &BannerSpec, out: &Path) -> BannerResult<()> {
    let surface = render_banner(spec)?;
    save_png(&surface, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_spec(seed: u64) -> BannerSpec {
        BannerSpec {
            title: String::new(),
            subtitle: String::new(),
            seed: Some(seed),
            ..BannerSpec::default()
        }
    }

    #[test]
    fn output_dimensions_are_fixed() {
        let img = render_banner(&small_spec(1)).unwrap();
        assert_eq!(img.width(), BANNER_WIDTH);
        assert_eq!(img.height(), BANNER_HEIGHT);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = render_banner(&small_spec(7)).unwrap();
        let b = render_banner(&small_spec(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = render_banner(&small_spec(1)).unwrap();
        let b = render_banner(&small_spec(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn final_surface_is_fully_opaque() {
        let img = render_banner(&small_spec(3)).unwrap();
        assert!(img.data().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn center_pixel_survives_vignette() {
        // The vignette mask is 0 at the exact center, so the center pixel of
        // the final image equals the pre-vignette composite there.
        let img = render_banner(&small_spec(4)).unwrap();
        let px = img.pixel(BANNER_WIDTH / 2, BANNER_HEIGHT / 2);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn excessive_shape_count_is_rejected() {
        let spec = BannerSpec {
            shape_count: MAX_SHAPE_COUNT + 1,
            ..BannerSpec::default()
        };
        assert!(matches!(
            render_banner(&spec),
            Err(BannerError::Validation(_))
        ));
    }

    #[test]
    fn spec_json_round_trip_with_defaults() {
        let spec: BannerSpec = serde_json::from_str(r#"{"title":"T","seed":9}"#).unwrap();
        assert_eq!(spec.title, "T");
        assert_eq!(spec.subtitle, DEFAULT_SUBTITLE);
        assert_eq!(spec.seed, Some(9));
        assert_eq!(spec.shape_count, DEFAULT_SHAPE_COUNT);
    }

    #[test]
    fn spec_json_rejects_unknown_fields() {
        assert!(serde_json::from_str::<BannerSpec>(r#"{"titel":"oops"}"#).is_err());
    }
}
