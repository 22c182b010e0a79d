//! Raster - paints formula render output onto tiny-skia pixmaps
//!
//! # Modules
//!
//! - `backend`: The [`RasterBackend`] implementing measurement, painting and export
//! - `glyphs`: Glyph coverage from ab_glyph outlines
//! - `stroke`: Anti-aliased tiny-skia strokes for lines and bracket paths

mod backend;
mod error;
pub mod glyphs;
pub mod stroke;

pub use backend::{RasterBackend, TEXT_PADDING};
pub use error::*;
