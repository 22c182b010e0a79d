//! Box Builder - maps an expression tree onto a box tree
//!
//! The tree is validated once up front; after that every node has exactly one
//! construction rule and building cannot fail.

use crate::boxes::{
    BracketBox, FractionBox, GridBox, HorizontalBox, ScaleBox, TextBox, TranslateBox,
    TripleVerticalBox,
};
use crate::error::FormulaResult;
use crate::layout::MathBox;
use crate::model::Expression;
use crate::settings::LayoutSettings;

/// Scale applied to exponents and indices
pub const SCRIPT_SCALE: f32 = 0.5;

/// Builds box trees with a fixed script shift
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBuilder {
    script_shift: f32,
}

impl Default for BoxBuilder {
    fn default() -> Self {
        Self::from_settings(&LayoutSettings::default())
    }
}

impl BoxBuilder {
    pub fn new(script_shift: f32) -> Self {
        Self { script_shift }
    }

    pub fn from_settings(settings: &LayoutSettings) -> Self {
        Self::new(settings.script_shift)
    }

    pub fn script_shift(&self) -> f32 {
        self.script_shift
    }

    /// Validate `expr` and build its box tree
    pub fn build(&self, expr: &Expression) -> FormulaResult<Box<dyn MathBox>> {
        expr.validate()?;
        Ok(self.build_node(expr))
    }

    fn build_node(&self, expr: &Expression) -> Box<dyn MathBox> {
        match expr {
            Expression::Literal(text) => Box::new(TextBox::new(text.as_str())),
            Expression::Bracketed(inner) => Box::new(HorizontalBox::new(vec![
                Box::new(BracketBox::open_round()),
                self.build_node(inner),
                Box::new(BracketBox::close_round()),
            ])),
            Expression::Power { base, exponent } => Box::new(HorizontalBox::new(vec![
                self.build_node(base),
                self.script(exponent, -self.script_shift),
            ])),
            Expression::Index { base, index } => Box::new(HorizontalBox::new(vec![
                self.build_node(base),
                self.script(index, self.script_shift),
            ])),
            Expression::Unary { sign, operand } => Box::new(HorizontalBox::new(vec![
                Box::new(TextBox::new(sign.as_str())),
                self.build_node(operand),
            ])),
            Expression::Binary { sign, left, right } => {
                let mut row = HorizontalBox::new(vec![self.build_node(left)]);
                if !sign.is_empty() {
                    row.push(Box::new(TextBox::new(sign.as_str())));
                }
                row.push(self.build_node(right));
                Box::new(row)
            }
            Expression::Fraction {
                numerator,
                denominator,
            } => Box::new(FractionBox::new(
                self.build_node(numerator),
                self.build_node(denominator),
            )),
            Expression::Variadic {
                sign,
                lower,
                upper,
                body,
            } => {
                let operator = TripleVerticalBox::new(
                    self.optional(upper.as_deref()),
                    Box::new(TextBox::new(sign.as_str())),
                    self.optional(lower.as_deref()),
                );
                Box::new(HorizontalBox::new(vec![
                    Box::new(operator),
                    self.build_node(body),
                ]))
            }
            Expression::CaseBlock(cases) => {
                let rows = cases
                    .iter()
                    .map(|case| vec![self.build_node(&case.body), self.build_node(&case.condition)])
                    .collect();
                Box::new(HorizontalBox::new(vec![
                    Box::new(BracketBox::open_curly()),
                    Box::new(GridBox::new(rows)),
                ]))
            }
            Expression::Block(rows) => {
                let rows = rows
                    .iter()
                    .map(|row| row.iter().map(|cell| self.build_node(cell)).collect())
                    .collect();
                Box::new(HorizontalBox::new(vec![
                    Box::new(BracketBox::open_round()),
                    Box::new(GridBox::new(rows)),
                    Box::new(BracketBox::close_round()),
                ]))
            }
        }
    }

    fn script(&self, expr: &Expression, shift: f32) -> Box<dyn MathBox> {
        let scaled = ScaleBox::new(self.build_node(expr), SCRIPT_SCALE);
        Box::new(TranslateBox::new(Box::new(scaled), shift))
    }

    fn optional(&self, expr: Option<&Expression>) -> Box<dyn MathBox> {
        match expr {
            Some(expr) => self.build_node(expr),
            None => Box::new(HorizontalBox::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;
    use crate::layout::{BoxKind, MeasureContext};
    use crate::model::Case;
    use crate::testing::FixedMetrics;

    fn lit(text: &str) -> Expression {
        Expression::literal(text)
    }

    fn kinds(b: &dyn MathBox) -> Vec<BoxKind> {
        b.children().iter().map(|c| c.kind()).collect()
    }

    fn build(expr: &Expression) -> Box<dyn MathBox> {
        BoxBuilder::default().build(expr).unwrap()
    }

    #[test]
    fn test_literal_is_text() {
        let b = build(&lit("x"));
        assert_eq!(b.kind(), BoxKind::Text);
        assert!(b.children().is_empty());
    }

    #[test]
    fn test_bracketed() {
        let b = build(&Expression::bracketed(lit("x")));
        assert_eq!(b.kind(), BoxKind::Horizontal);
        assert_eq!(kinds(b.as_ref()), vec![BoxKind::Bracket, BoxKind::Text, BoxKind::Bracket]);
    }

    #[test]
    fn test_power_raises_scaled_exponent() {
        let mut b = build(&Expression::power(lit("x"), lit("2")));
        assert_eq!(kinds(b.as_ref()), vec![BoxKind::Text, BoxKind::Translate]);

        let metrics = FixedMetrics;
        b.measure(&mut MeasureContext::new(&metrics));
        let script = b.children()[1];
        // Scaled "2" is 11x30 with baseline 15, lifted by 20
        assert_eq!(script.frame().height, 35.0);
        assert_eq!(script.frame().baseline, 35.0);
        assert_eq!(script.children()[0].kind(), BoxKind::Scale);
    }

    #[test]
    fn test_index_lowers_scaled_index() {
        let mut b = build(&Expression::index(lit("a"), lit("i")));
        let metrics = FixedMetrics;
        b.measure(&mut MeasureContext::new(&metrics));
        let script = b.children()[1];
        // target baseline 15 - 20 < 0: child pushed down by 5
        assert_eq!(script.frame().baseline, 0.0);
        assert_eq!(script.frame().height, 35.0);
    }

    #[test]
    fn test_custom_script_shift() {
        let builder = BoxBuilder::new(10.0);
        let mut b = builder.build(&Expression::power(lit("x"), lit("2"))).unwrap();
        let metrics = FixedMetrics;
        b.measure(&mut MeasureContext::new(&metrics));
        assert_eq!(b.children()[1].frame().baseline, 25.0);
    }

    #[test]
    fn test_unary_and_binary() {
        let b = build(&Expression::unary("-", lit("x")));
        assert_eq!(kinds(b.as_ref()), vec![BoxKind::Text, BoxKind::Text]);

        let b = build(&Expression::binary("+", lit("a"), lit("b")));
        assert_eq!(kinds(b.as_ref()).len(), 3);

        let b = build(&Expression::juxtaposed(lit("2"), lit("x")));
        assert_eq!(kinds(b.as_ref()), vec![BoxKind::Text, BoxKind::Text]);
    }

    #[test]
    fn test_fraction() {
        let b = build(&Expression::fraction(lit("1"), lit("2")));
        assert_eq!(b.kind(), BoxKind::Fraction);
    }

    #[test]
    fn test_variadic_with_missing_bound() {
        let mut b = build(&Expression::sum(Some(lit("i")), None, lit("a")));
        assert_eq!(kinds(b.as_ref()), vec![BoxKind::TripleVertical, BoxKind::Text]);

        let metrics = FixedMetrics;
        b.measure(&mut MeasureContext::new(&metrics));
        let operator = b.children()[0];
        let parts = operator.children();
        assert_eq!(parts[0].kind(), BoxKind::Horizontal);
        assert_eq!(parts[0].frame().height, 0.0);
        assert_eq!(operator.frame().baseline, 30.0);
        assert_eq!(operator.frame().height, 120.0);
    }

    #[test]
    fn test_case_block() {
        let b = build(&Expression::cases(vec![
            Case::new(lit("x"), lit("x>0")),
            Case::new(lit("0"), lit("x<0")),
        ]));
        assert_eq!(kinds(b.as_ref()), vec![BoxKind::Bracket, BoxKind::Grid]);
        assert_eq!(b.children()[1].children().len(), 4);
    }

    #[test]
    fn test_block_rows() {
        let row = |n: usize| (0..n).map(|i| lit(&i.to_string())).collect::<Vec<_>>();

        let ragged = Expression::block(vec![row(2), row(2), row(3)]);
        assert!(matches!(
            BoxBuilder::default().build(&ragged),
            Err(FormulaError::Structural(_))
        ));

        let square = Expression::block(vec![row(2), row(2), row(2)]);
        let b = build(&square);
        assert_eq!(kinds(b.as_ref()), vec![BoxKind::Bracket, BoxKind::Grid, BoxKind::Bracket]);
    }

    #[test]
    fn test_integral_sign_is_text() {
        let b = build(&Expression::integral(Some(lit("0")), Some(lit("1")), lit("f")));
        let operator = b.children()[0];
        let sign = operator.children()[1];
        assert_eq!(sign.kind(), BoxKind::Text);
        assert_eq!(operator.children()[0].kind(), BoxKind::Text);
    }
}
