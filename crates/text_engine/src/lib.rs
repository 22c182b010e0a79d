//! Text Engine - Font discovery and text shaping
//!
//! This crate finds the formula font on the system and shapes text with it
//! using rustybuzz. Without a font it falls back to per-character width
//! estimates so layout still works.
//!
//! # Modules
//!
//! - `shaper`: Text shaping using rustybuzz
//! - `font`: Loaded font data and default metrics
//! - `discovery`: System font selection through font-kit

mod error;
mod font;
mod shaper;
pub mod discovery;

pub use error::*;
pub use font::*;
pub use shaper::*;

pub use discovery::{FontDiscovery, FontInfo};
