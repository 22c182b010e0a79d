//! Glyph coverage from font outlines
//!
//! Glyph ids come from the shaper, so the painter only has to turn them into
//! coverage at the shaped positions.

use crate::error::{RasterError, Result};
use ab_glyph::{Font, FontArc, FontVec, GlyphId, PxScale};
use formula::Color;
use text_engine::{LoadedFont, ShapedRun};
use tiny_skia::{ColorU8, Pixmap, PixmapPaint, Transform};

/// Paints shaped runs with ab_glyph outlines
#[derive(Clone)]
pub struct GlyphPainter {
    font: FontArc,
    /// ab_glyph scales by line height, the shaper by em size
    height_per_em: f32,
}

impl std::fmt::Debug for GlyphPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphPainter")
            .field("height_per_em", &self.height_per_em)
            .finish()
    }
}

impl GlyphPainter {
    pub fn from_font(font: &LoadedFont) -> Result<Self> {
        let font = FontVec::try_from_vec_and_index(font.bytes().to_vec(), font.index)
            .map_err(|e| RasterError::InvalidFont(format!("{}: {}", font.family, e)))?;
        let font = FontArc::new(font);

        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        let height_per_em = font.height_unscaled() / units_per_em;
        Ok(Self { font, height_per_em })
    }

    /// ab_glyph scale that sets glyphs at `font_size` pixels per em
    pub fn px_scale(&self, font_size: f32) -> PxScale {
        PxScale::from(font_size * self.height_per_em)
    }

    /// Paint `run` with its pen origin at `(x, baseline)`
    pub fn paint_run(&self, pixmap: &mut Pixmap, run: &ShapedRun, x: f32, baseline: f32, color: Color) {
        let scale = self.px_scale(run.font_size);

        for (glyph, (dx, dy)) in run.glyphs.iter().zip(run.glyph_positions()) {
            let positioned = GlyphId(glyph.glyph_id)
                .with_scale_and_position(scale, ab_glyph::point(x + dx, baseline + dy));
            let Some(outlined) = self.font.outline_glyph(positioned) else {
                continue;
            };

            let bounds = outlined.px_bounds();
            let Some(mut coverage) = Pixmap::new(bounds.width() as u32, bounds.height() as u32) else {
                continue;
            };
            let stride = coverage.width() as usize;
            let pixels = coverage.pixels_mut();
            outlined.draw(|gx, gy, value| {
                if let Some(pixel) = pixels.get_mut(gy as usize * stride + gx as usize) {
                    *pixel = glyph_color(color, value).premultiply();
                }
            });

            pixmap.draw_pixmap(
                bounds.min.x as i32,
                bounds.min.y as i32,
                coverage.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }
}

/// `color` with its alpha scaled by glyph coverage
fn glyph_color(color: Color, coverage: f32) -> ColorU8 {
    let alpha = (color.a as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
    ColorU8::from_rgba(color.r, color.g, color.b, alpha)
}
