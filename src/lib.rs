//! Procedural 1500x500 social banner generator.
//!
//! A fixed, ordered CPU compositing pipeline: vertical gradient base, blurred
//! random glow disks, faint diagonal stripes, per-pixel noise, a small global
//! blur, centered title/subtitle text with drop shadows, and a radial
//! vignette. All buffers are premultiplied RGBA8; the final image is
//! flattened to opaque RGB for PNG output.
//!
//! Stage order is a correctness constraint, since alpha compositing is not
//! commutative. Given a fixed seed the pipeline is fully deterministic.
#![forbid(unsafe_code)]

pub mod blur_cpu;
pub mod color;
pub mod composite_cpu;
pub mod error;
pub mod gradient;
pub mod noise;
pub mod pipeline;
pub mod raster;
pub mod shapes;
pub mod stripes;
pub mod surface;
pub mod text;
pub mod vignette;

pub use color::{Rgb8, Rgba8};
pub use error::{BannerError, BannerResult};
pub use pipeline::{
    BANNER_HEIGHT, BANNER_WIDTH, BannerSpec, generate, render_banner, save_png,
};
pub use surface::Surface;
pub use text::TextCompositor;
