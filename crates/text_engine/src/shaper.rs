//! Text shaping using rustybuzz
//!
//! Shaping turns a string into positioned glyphs. With a loaded font this is
//! done by rustybuzz; without one the shaper estimates advances per
//! character so text can still be measured.

use crate::{FontMetrics, LoadedFont, Result, TextError};

/// A shaped glyph with position information
#[derive(Debug, Clone)]
pub struct ShapedGlyph {
    /// Glyph ID in the font
    pub glyph_id: u16,
    /// Horizontal advance in font units
    pub x_advance: i32,
    /// Vertical advance in font units
    pub y_advance: i32,
    /// Horizontal offset from the origin
    pub x_offset: i32,
    /// Vertical offset from the origin
    pub y_offset: i32,
    /// Byte offset in the original text
    pub cluster: u32,
    /// Character this glyph represents (for fallback when no font)
    pub character: Option<char>,
}

impl ShapedGlyph {
    /// Get the advance width scaled to a specific font size
    pub fn advance_width(&self, font_size: f32, units_per_em: u16) -> f32 {
        self.x_advance as f32 * font_size / units_per_em as f32
    }
}

/// A run of shaped glyphs with associated metrics
#[derive(Debug, Clone)]
pub struct ShapedRun {
    /// The shaped glyphs
    pub glyphs: Vec<ShapedGlyph>,
    /// Total width of the run in pixels
    pub width: f32,
    /// Font size used for shaping
    pub font_size: f32,
    /// Units per em of the font used
    pub units_per_em: u16,
    /// Ascender height scaled to font size
    pub ascender: f32,
    /// Descender depth scaled to font size (positive value)
    pub descender: f32,
    /// Line gap scaled to font size
    pub line_gap: f32,
}

impl ShapedRun {
    /// Ascender plus descender, the height of one line of text
    pub fn height(&self) -> f32 {
        self.ascender + self.descender
    }

    pub fn line_height(&self) -> f32 {
        self.height() + self.line_gap
    }

    /// Pixels per font unit
    pub fn scale(&self) -> f32 {
        self.font_size / self.units_per_em as f32
    }

    /// Pen position of each glyph in pixels, relative to the run origin
    pub fn glyph_positions(&self) -> Vec<(f32, f32)> {
        let scale = self.scale();
        let mut pen = 0i32;
        self.glyphs
            .iter()
            .map(|glyph| {
                let position = (
                    (pen + glyph.x_offset) as f32 * scale,
                    -(glyph.y_offset as f32) * scale,
                );
                pen += glyph.x_advance;
                position
            })
            .collect()
    }
}

/// Text shaper using rustybuzz
#[derive(Debug)]
pub struct TextShaper {
    font: Option<LoadedFont>,
    metrics: FontMetrics,
}

impl TextShaper {
    /// Shaper for `font`; fails if rustybuzz cannot parse the face
    pub fn new(font: LoadedFont) -> Result<Self> {
        let face = rustybuzz::Face::from_slice(font.bytes(), font.index)
            .ok_or_else(|| TextError::InvalidFontData(format!("Failed to parse {}", font.family)))?;

        let metrics = FontMetrics {
            units_per_em: face.units_per_em() as u16,
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        };
        tracing::debug!(family = %font.family, units_per_em = metrics.units_per_em, "loaded face");

        Ok(Self {
            font: Some(font),
            metrics,
        })
    }

    /// Shaper without a font, estimating advances per character
    pub fn estimating() -> Self {
        Self {
            font: None,
            metrics: FontMetrics::default(),
        }
    }

    pub fn font(&self) -> Option<&LoadedFont> {
        self.font.as_ref()
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// Shape `text` at `font_size` pixels per em
    pub fn shape(&self, text: &str, font_size: f32) -> Result<ShapedRun> {
        match &self.font {
            Some(font) => {
                let face = rustybuzz::Face::from_slice(font.bytes(), font.index).ok_or_else(|| {
                    TextError::InvalidFontData(format!("Failed to parse {}", font.family))
                })?;
                Ok(self.shape_with_face(text, font_size, &face))
            }
            None => Ok(self.shape_estimated(text, font_size)),
        }
    }

    fn shape_with_face(&self, text: &str, font_size: f32, face: &rustybuzz::Face<'_>) -> ShapedRun {
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let output = rustybuzz::shape(face, &[], buffer);

        let glyphs = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
                cluster: info.cluster,
                character: None,
            })
            .collect();

        self.build_run(glyphs, font_size)
    }

    fn shape_estimated(&self, text: &str, font_size: f32) -> ShapedRun {
        let units_per_em = self.metrics.units_per_em;
        let glyphs = text
            .char_indices()
            .map(|(offset, ch)| ShapedGlyph {
                glyph_id: 0,
                x_advance: estimate_char_width(ch, units_per_em),
                y_advance: 0,
                x_offset: 0,
                y_offset: 0,
                cluster: offset as u32,
                character: Some(ch),
            })
            .collect();

        self.build_run(glyphs, font_size)
    }

    fn build_run(&self, glyphs: Vec<ShapedGlyph>, font_size: f32) -> ShapedRun {
        let scale = self.metrics.scale(font_size);
        let total_advance: i32 = glyphs.iter().map(|g| g.x_advance).sum();

        ShapedRun {
            glyphs,
            width: total_advance as f32 * scale,
            font_size,
            units_per_em: self.metrics.units_per_em,
            ascender: self.metrics.ascender as f32 * scale,
            descender: self.metrics.descender.unsigned_abs() as f32 * scale,
            line_gap: self.metrics.line_gap as f32 * scale,
        }
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::estimating()
    }
}

/// Estimate character width in font units
fn estimate_char_width(ch: char, units_per_em: u16) -> i32 {
    let em = units_per_em as i32;

    match ch {
        // Narrow characters
        ' ' | 'i' | 'l' | 'j' | 't' | 'f' | 'r' | '!' | '|' | '\'' | '.' | ',' | ':' | ';' => {
            em * 30 / 100
        }
        'I' | '1' => em * 35 / 100,
        // Wide characters
        'm' | 'w' | 'M' | 'W' | '%' => em * 90 / 100,
        'A'..='Z' => em * 70 / 100,
        'a'..='z' => em * 55 / 100,
        '0'..='9' => em * 60 / 100,
        // Big operators
        '\u{2211}' | '\u{220F}' => em * 80 / 100,
        '\u{222B}' => em * 40 / 100,
        // Zero-width characters
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => 0,
        _ => em * 60 / 100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_estimating_shaper_metrics() {
        let shaper = TextShaper::estimating();
        let run = shaper.shape("x", 50.0).unwrap();
        assert_eq!(run.glyphs.len(), 1);
        assert_eq!(run.ascender, 40.0);
        assert_eq!(run.descender, 10.0);
        assert_eq!(run.height(), 50.0);
        assert!((run.width - 27.5).abs() < 1e-4);
    }

    #[test]
    fn test_clusters_are_byte_offsets() {
        let run = TextShaper::estimating().shape("a\u{2211}b", 10.0).unwrap();
        let clusters: Vec<u32> = run.glyphs.iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, vec![0, 1, 4]);
    }

    #[test]
    fn test_glyph_positions_accumulate_advances() {
        let run = TextShaper::estimating().shape("ab", 100.0).unwrap();
        let positions = run.glyph_positions();
        assert_eq!(positions[0], (0.0, 0.0));
        assert!((positions[1].0 - 55.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text() {
        let run = TextShaper::estimating().shape("", 50.0).unwrap();
        assert!(run.glyphs.is_empty());
        assert_eq!(run.width, 0.0);
        assert_eq!(run.height(), 50.0);
    }

    #[test]
    fn test_invalid_font_data_is_rejected() {
        let font = LoadedFont::new("Broken", vec![0, 1, 2, 3], 0);
        assert!(matches!(
            TextShaper::new(font),
            Err(TextError::InvalidFontData(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_width_scales_with_size(text in "[a-z0-9 ]{0,20}", size in 1.0f32..200.0) {
            let shaper = TextShaper::estimating();
            let unit = shaper.shape(&text, 1.0).unwrap().width;
            let scaled = shaper.shape(&text, size).unwrap().width;
            prop_assert!((scaled - unit * size).abs() < 1e-2 * size.max(1.0));
        }
    }
}
