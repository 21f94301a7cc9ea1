use crate::color::Rgba8;
use crate::error::{BannerError, BannerResult};
use crate::surface::Surface;

/// One filled path on a layer, straight-alpha color.
pub struct PathFill {
    pub path: vello_cpu::kurbo::BezPath,
    pub color: Rgba8,
}

/// Rasterize filled paths onto a fresh transparent layer.
///
/// Antialiased coverage comes from `vello_cpu`; the resulting pixmap is
/// premultiplied RGBA8, matching the pipeline's surface convention.
pub fn fill_layer(width: u32, height: u32, fills: &[PathFill]) -> BannerResult<Surface> {
    let (w16, h16) = dims_u16(width, height)?;

    let mut ctx = vello_cpu::RenderContext::new(w16, h16);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for fill in fills {
        let c = fill.color;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        ctx.fill_path(&fill.path);
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
    ctx.render_to_pixmap(&mut pixmap);
    Surface::from_premul_bytes(width, height, pixmap.data_as_u8_slice().to_vec())
}

pub(crate) fn dims_u16(width: u32, height: u32) -> BannerResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BannerError::raster("layer width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BannerError::raster("layer height exceeds u16"))?;
    Ok((w, h))
}
