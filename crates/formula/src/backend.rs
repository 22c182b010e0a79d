//! Rendering backend capability
//!
//! The layout engine only needs text metrics while measuring. Everything a
//! backend does after that works from a finished [`RenderOutput`].

use crate::error::FormulaResult;
use crate::layout::TextMetrics;
use crate::render::RenderOutput;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Image encoding chosen for an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl OutputFormat {
    /// Format named by the file extension, PNG when unknown or absent
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("jpg") | Some("jpeg") => OutputFormat::Jpeg,
            Some("bmp") => OutputFormat::Bmp,
            _ => OutputFormat::Png,
        }
    }
}

/// A backend that measures text, paints render output and writes images
pub trait RenderBackend: TextMetrics {
    /// Pixel surface painted by this backend
    type Surface;

    /// Blank surface of `width` by `height` pixels in the background colour
    fn create_canvas(&self, width: u32, height: u32) -> FormulaResult<Self::Surface>;

    /// Paint every primitive of `output` onto `surface`
    fn paint(&self, surface: &mut Self::Surface, output: &RenderOutput) -> FormulaResult<()>;

    /// Encode `surface` to `path`
    fn export_image(
        &self,
        surface: &Self::Surface,
        path: &Path,
        format: OutputFormat,
    ) -> FormulaResult<()>;
}
