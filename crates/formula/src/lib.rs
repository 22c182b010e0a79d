//! Formula Crate - lays out mathematical expressions as boxes
//!
//! This crate provides:
//! - An expression tree and a parser for the formula input language
//! - A box model with a measure, layout, draw protocol
//! - The box builder mapping expressions onto boxes
//! - Render primitives and the backend capability they are painted through
//! - The render driver and its settings

pub mod backend;
pub mod boxes;
pub mod builder;
pub mod driver;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;
pub mod settings;

#[cfg(test)]
mod testing;

pub use backend::{OutputFormat, RenderBackend};
pub use builder::BoxBuilder;
pub use driver::{RenderDriver, RenderReport};
pub use error::*;
pub use layout::{
    BoxKind, Frame, LaidOut, LayoutTree, MathBox, MeasureContext, Measured, Point, Rect, Size,
    TextMetrics, Unmeasured,
};
pub use model::{symbols, Case, Expression, MAX_DEPTH};
pub use parser::{parse_formula, FormulaParser};
pub use render::{Canvas, Color, DrawList, Path, PathCommand, RenderOutput, RenderPrimitive, Transform};
pub use settings::{DrawerSettings, SettingsLoader};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedMetrics;

    // =============================================================================
    // Pipeline Tests
    // =============================================================================

    fn lay_out(input: &str) -> LayoutTree<LaidOut> {
        let expr = parse_formula(input).unwrap();
        let root = BoxBuilder::default().build(&expr).unwrap();
        LayoutTree::new(root).measure(&FixedMetrics).layout()
    }

    fn draw(tree: &LayoutTree<LaidOut>) -> Vec<RenderPrimitive> {
        let mut list = DrawList::new(3.0, Color::BLACK);
        tree.draw(&mut list);
        list.primitives().to_vec()
    }

    #[test]
    fn test_single_literal() {
        let tree = lay_out("x");
        assert_eq!(tree.root().kind(), BoxKind::Text);
        assert_eq!(tree.frame().size(), FixedMetrics.measure_text("x"));

        let primitives = draw(&tree);
        assert_eq!(
            primitives,
            vec![RenderPrimitive::Text {
                text: "x".to_string(),
                bounds: Rect::new(0.0, 0.0, 22.0, 60.0),
                scale: 1.0,
                color: Color::BLACK,
            }]
        );
    }

    #[test]
    fn test_fraction_of_literals() {
        let tree = lay_out("1/xyz");
        let frame = tree.frame();
        // max(22, 42) + 6
        assert_eq!(frame.width, 48.0);
        assert_eq!(frame.height, 120.0);

        let divider = draw(&tree).into_iter().find_map(|p| match p {
            RenderPrimitive::Line { start, end, .. } => Some((start, end)),
            _ => None,
        });
        assert_eq!(divider, Some((Point::new(4.0, 60.0), Point::new(44.0, 60.0))));
    }

    #[test]
    fn test_drawing_twice_is_identical() {
        let tree = lay_out(r"\sum_{i=1}^{n} (x_i)^2");
        assert_eq!(draw(&tree), draw(&tree));
    }

    #[test]
    fn test_brackets_wrap_nested_fraction() {
        let tree = lay_out("(1/2)");
        let root = tree.root();
        let children = root.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].frame().height, children[1].frame().height);
        assert_eq!(root.frame().width, 22.0 + 28.0 + 22.0);
    }

    #[test]
    fn test_every_box_measures_idempotently() {
        let expr = parse_formula(r"\cases{x^2, x > 0; -x_1, x < 0} + \matrix{a, b; c, d}").unwrap();
        let mut root = BoxBuilder::default().build(&expr).unwrap();
        let mut ctx = MeasureContext::new(&FixedMetrics);
        root.measure(&mut ctx);
        let first = *root.frame();
        root.measure(&mut ctx);
        assert_eq!(first, *root.frame());
    }
}
