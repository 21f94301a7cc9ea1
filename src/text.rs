use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::Rgba8;
use crate::composite_cpu::over_in_place;
use crate::error::{BannerError, BannerResult};
use crate::raster::dims_u16;
use crate::surface::Surface;

pub const TITLE_SIZE_PX: f32 = 60.0;
pub const SUBTITLE_SIZE_PX: f32 = 28.0;

/// Vertical lift of the text anchor above the image center.
const ANCHOR_LIFT_PX: f32 = 30.0;
/// Gap between the title box and the subtitle box.
const TITLE_GAP_PX: f32 = 10.0;

const TITLE_FILL: Rgba8 = Rgba8 {
    r: 255,
    g: 255,
    b: 255,
    a: 230,
};
const SUBTITLE_FILL: Rgba8 = Rgba8 {
    r: 245,
    g: 245,
    b: 245,
    a: 220,
};
const TITLE_SHADOW: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 120,
};
const SUBTITLE_SHADOW: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 90,
};
const TITLE_SHADOW_OFFSET: f32 = 2.0;
const SUBTITLE_SHADOW_OFFSET: f32 = 1.0;

/// Font candidates probed in order; first one that loads wins.
pub fn default_font_candidates() -> Vec<PathBuf> {
    [
        "/Library/Fonts/Arial.ttf",
        "/System/Library/Fonts/SFNS.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Brush type for Parley layouts. Paint color is chosen at draw time, so the
/// brush carries no state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GlyphBrush;

/// A font usable for both layout and glyph rasterization.
#[derive(Clone)]
pub struct ResolvedFont {
    bytes: Arc<Vec<u8>>,
    family: String,
}

impl ResolvedFont {
    pub fn family(&self) -> &str {
        &self.family
    }
}

/// Lays out and draws centered title/subtitle text with drop shadows.
pub struct TextCompositor {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
}

impl Default for TextCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCompositor {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Probe `candidates` in order, then the host's generic sans-serif
    /// family. `None` means no usable font exists on this host.
    pub fn resolve_font(&mut self, candidates: &[PathBuf]) -> Option<ResolvedFont> {
        for path in candidates {
            if let Some(font) = self.try_load(path) {
                tracing::debug!(path = %path.display(), family = %font.family, "resolved font");
                return Some(font);
            }
        }
        let fallback = self.system_sans();
        if let Some(ref font) = fallback {
            tracing::debug!(family = %font.family, "resolved system sans-serif fallback");
        }
        fallback
    }

    /// Load one candidate. A candidate counts as loaded only if Parley
    /// registers at least one named family from its bytes.
    fn try_load(&mut self, path: &Path) -> Option<ResolvedFont> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "font candidate unreadable");
                return None;
            }
        };
        self.register(bytes)
    }

    fn register(&mut self, bytes: Vec<u8>) -> Option<ResolvedFont> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let (family_id, _) = families.first()?;
        let family = self.font_ctx.collection.family_name(*family_id)?.to_string();
        Some(ResolvedFont {
            bytes: Arc::new(bytes),
            family,
        })
    }

    /// Pull bytes for the host's generic sans-serif family out of the system
    /// font collection.
    fn system_sans(&mut self) -> Option<ResolvedFont> {
        let ids: Vec<parley::fontique::FamilyId> = self
            .font_ctx
            .collection
            .generic_families(parley::fontique::GenericFamily::SansSerif)
            .collect();
        for id in ids {
            let Some(family) = self.font_ctx.collection.family(id) else {
                continue;
            };
            let fonts = family.fonts().to_vec();
            for info in fonts {
                if let Some(blob) = self.font_ctx.source_cache.get(info.source()) {
                    if let Some(font) = self.register(blob.as_ref().to_vec()) {
                        return Some(font);
                    }
                }
            }
        }
        None
    }

    fn layout(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
    ) -> parley::Layout<GlyphBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Draw title and subtitle centered on `base` with drop shadows.
    ///
    /// Empty strings draw nothing and measure 0x0; when both are empty no
    /// font is resolved at all. If no font can be resolved anywhere the text
    /// stage is skipped with a warning and the banner stays valid.
    pub fn draw(
        &mut self,
        base: &mut Surface,
        title: &str,
        subtitle: &str,
        candidates: &[PathBuf],
    ) -> BannerResult<()> {
        if title.is_empty() && subtitle.is_empty() {
            return Ok(());
        }

        let Some(font) = self.resolve_font(candidates) else {
            let err = BannerError::font("no usable font on this host");
            tracing::warn!(%err, "skipping text stage");
            return Ok(());
        };

        let title_layout = (!title.is_empty()).then(|| self.layout(title, &font, TITLE_SIZE_PX));
        let sub_layout =
            (!subtitle.is_empty()).then(|| self.layout(subtitle, &font, SUBTITLE_SIZE_PX));

        let (title_w, title_h) = measure(title_layout.as_ref());
        let (sub_w, _) = measure(sub_layout.as_ref());

        let cx = base.width() as f32 / 2.0;
        let cy = base.height() as f32 / 2.0 - ANCHOR_LIFT_PX;
        let title_xy = ((cx - title_w / 2.0).round(), (cy - title_h / 2.0).round());
        let sub_xy = (
            (cx - sub_w / 2.0).round(),
            (cy + title_h / 2.0 + TITLE_GAP_PX).round(),
        );

        let (w16, h16) = dims_u16(base.width(), base.height())?;
        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        let blob = vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone());
        let font_data = vello_cpu::peniko::FontData::new(blob, 0);

        // Shadows first, then the foreground glyphs.
        if let Some(layout) = &title_layout {
            let off = TITLE_SHADOW_OFFSET;
            draw_layout(
                &mut ctx,
                layout,
                &font_data,
                (title_xy.0 + off, title_xy.1 + off),
                TITLE_SHADOW,
            );
        }
        if let Some(layout) = &sub_layout {
            let off = SUBTITLE_SHADOW_OFFSET;
            draw_layout(
                &mut ctx,
                layout,
                &font_data,
                (sub_xy.0 + off, sub_xy.1 + off),
                SUBTITLE_SHADOW,
            );
        }
        if let Some(layout) = &title_layout {
            draw_layout(&mut ctx, layout, &font_data, title_xy, TITLE_FILL);
        }
        if let Some(layout) = &sub_layout {
            draw_layout(&mut ctx, layout, &font_data, sub_xy, SUBTITLE_FILL);
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);
        let layer = Surface::from_premul_bytes(
            base.width(),
            base.height(),
            pixmap.data_as_u8_slice().to_vec(),
        )?;
        over_in_place(base, &layer)
    }
}

fn measure(layout: Option<&parley::Layout<GlyphBrush>>) -> (f32, f32) {
    layout.map_or((0.0, 0.0), |l| (l.width(), l.height()))
}

fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<GlyphBrush>,
    font: &vello_cpu::peniko::FontData,
    origin: (f32, f32),
    color: Rgba8,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        f64::from(origin.0),
        f64::from(origin.1),
    )));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
