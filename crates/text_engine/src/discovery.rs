//! Font Discovery Module
//!
//! Selects the formula font from the system fonts using font-kit and reads
//! its file into memory.

use crate::{LoadedFont, Result, TextError};
use font_kit::family_name::FamilyName;
use font_kit::handle::Handle;
use font_kit::properties::Properties;
use font_kit::source::SystemSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about a discovered font
#[derive(Debug, Clone)]
pub struct FontInfo {
    /// Font family name
    pub family: String,
    /// PostScript name (unique identifier)
    pub postscript_name: Option<String>,
    /// Font file path
    pub path: Option<PathBuf>,
    /// Font index within the file (for TTC files)
    pub font_index: u32,
    /// Font bytes when the system hands them over in memory
    data: Option<Arc<Vec<u8>>>,
}

/// Map a family name onto a font-kit family, recognising generic names
fn family_name(family: &str) -> FamilyName {
    match family.to_lowercase().as_str() {
        "sans-serif" => FamilyName::SansSerif,
        "serif" => FamilyName::Serif,
        "monospace" => FamilyName::Monospace,
        "cursive" => FamilyName::Cursive,
        "fantasy" => FamilyName::Fantasy,
        _ => FamilyName::Title(family.to_string()),
    }
}

/// Font discovery service backed by the system font source
pub struct FontDiscovery {
    source: SystemSource,
}

impl FontDiscovery {
    pub fn new() -> Self {
        Self {
            source: SystemSource::new(),
        }
    }

    /// Best regular-weight match for `family`
    pub fn select_font(&self, family: &str) -> Result<FontInfo> {
        let handle = self
            .source
            .select_best_match(&[family_name(family)], &Properties::new())
            .map_err(|_| TextError::FontNotFound(family.to_string()))?;

        let font = handle
            .load()
            .map_err(|e| TextError::InvalidFontData(format!("Failed to load font: {}", e)))?;

        let (path, font_index, data) = match handle {
            Handle::Path { path, font_index } => (Some(path), font_index, None),
            Handle::Memory { bytes, font_index } => (None, font_index, Some(bytes)),
        };

        tracing::debug!(requested = family, family = %font.family_name(), "selected font");
        Ok(FontInfo {
            family: font.family_name(),
            postscript_name: font.postscript_name(),
            path,
            font_index,
            data,
        })
    }

    /// Read the bytes of a discovered font
    pub fn load_font(&self, info: &FontInfo) -> Result<LoadedFont> {
        let data = match (&info.data, &info.path) {
            (Some(bytes), _) => bytes.clone(),
            (None, Some(path)) => Arc::new(std::fs::read(path).map_err(|e| {
                TextError::LoadingFailed(format!("Failed to read {}: {}", path.display(), e))
            })?),
            (None, None) => {
                return Err(TextError::LoadingFailed(format!(
                    "Font {} has neither a file nor data",
                    info.family
                )))
            }
        };

        Ok(LoadedFont {
            family: info.family.clone(),
            path: info.path.clone(),
            data,
            index: info.font_index,
        })
    }

    /// Select and load `family` in one step
    pub fn load_family(&self, family: &str) -> Result<LoadedFont> {
        let info = self.select_font(family)?;
        self.load_font(&info)
    }

    /// Load the first face of a font file
    pub fn load_path(&self, path: &Path) -> Result<LoadedFont> {
        let data = std::fs::read(path)?;
        let family = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(LoadedFont {
            family,
            path: Some(path.to_path_buf()),
            data: Arc::new(data),
            index: 0,
        })
    }
}

impl Default for FontDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
