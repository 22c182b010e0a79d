//! Layout Boxes - the fixed catalogue of box types
//!
//! - Primitives: [`TextBox`], [`BracketBox`]
//! - Single-child transforms: [`TranslateBox`], [`ScaleBox`], [`AutoscaleBox`], [`SmallBox`]
//! - Composites: [`HorizontalBox`], [`FractionBox`], [`TripleVerticalBox`], [`GridBox`]

mod bracket;
mod fraction;
mod grid;
mod horizontal;
mod text;
mod transform;
mod triple;

pub use bracket::{BracketBox, BracketKind};
pub use fraction::{FractionBox, DIVIDER_INSET, FRACTION_PADDING};
pub use grid::{GridBox, GRID_CELL_PADDING};
pub use horizontal::HorizontalBox;
pub use text::TextBox;
pub use transform::{AutoscaleBox, ScaleBox, SmallBox, SmallRole, TranslateBox, SMALL_SCALE};
pub use triple::TripleVerticalBox;
