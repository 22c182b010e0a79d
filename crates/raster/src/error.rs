//! Error types for the raster backend

use formula::FormulaError;
use text_engine::TextError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Text engine error: {0}")]
    Text(#[from] TextError),

    #[error("Invalid glyph font: {0}")]
    InvalidFont(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Surface of {width}x{height} pixels is too large")]
    SurfaceTooLarge { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, RasterError>;

impl From<RasterError> for FormulaError {
    fn from(err: RasterError) -> Self {
        FormulaError::Backend(err.to_string())
    }
}
