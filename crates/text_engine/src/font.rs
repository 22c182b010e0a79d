//! Loaded fonts and metrics

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Font file bytes ready for shaping and rasterizing
#[derive(Debug, Clone)]
pub struct LoadedFont {
    /// Family name reported by the font
    pub family: String,
    /// File the bytes were read from, if any
    pub path: Option<PathBuf>,
    /// Raw font file
    pub data: Arc<Vec<u8>>,
    /// Face index within the file (for TTC files)
    pub index: u32,
}

impl LoadedFont {
    pub fn new(family: impl Into<String>, data: Vec<u8>, index: u32) -> Self {
        Self {
            family: family.into(),
            path: None,
            data: Arc::new(data),
            index,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.data.as_slice()
    }
}

/// Vertical font metrics in font units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontMetrics {
    /// Units per em
    pub units_per_em: u16,
    /// Ascender (positive)
    pub ascender: i16,
    /// Descender (negative)
    pub descender: i16,
    /// Line gap
    pub line_gap: i16,
}

impl FontMetrics {
    /// Scale from font units to pixels at `font_size`
    pub fn scale(&self, font_size: f32) -> f32 {
        font_size / self.units_per_em as f32
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            line_gap: 0,
        }
    }
}
