//! Error types for the formula crate

use thiserror::Error;

/// Errors that can occur while turning a formula into an image
#[derive(Error, Debug)]
pub enum FormulaError {
    /// The formula text was rejected by the parser
    #[error("{0}")]
    Parse(String),

    /// The expression tree violates a structural precondition
    #[error("Structural error: {0}")]
    Structural(String),

    /// Failure inside the rendering backend (fonts, shaping, encoding)
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be written as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for formula operations
pub type FormulaResult<T> = Result<T, FormulaError>;
