//! Expression Tree - the parsed form of a formula
//!
//! This module defines the tree the parser produces and the box builder
//! consumes, together with the one structural check performed on it.

use crate::error::{FormulaError, FormulaResult};
use serde::{Deserialize, Serialize};

// =============================================================================
// Expression - Core AST
// =============================================================================

/// A node in the expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// A number, identifier, or symbol drawn as plain text
    Literal(String),
    /// An expression enclosed in round brackets
    Bracketed(Box<Expression>),
    /// Base raised to an exponent
    Power {
        base: Box<Expression>,
        exponent: Box<Expression>,
    },
    /// Base with a subscript index
    Index {
        base: Box<Expression>,
        index: Box<Expression>,
    },
    /// Prefix sign applied to an operand (e.g. `-x`)
    Unary {
        sign: String,
        operand: Box<Expression>,
    },
    /// Infix sign between two operands; an empty sign is juxtaposition
    Binary {
        sign: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Numerator over denominator
    Fraction {
        numerator: Box<Expression>,
        denominator: Box<Expression>,
    },
    /// Big operator (sum, product, integral) with optional bounds
    Variadic {
        /// The operator glyph, e.g. '\u{2211}'
        sign: String,
        lower: Option<Box<Expression>>,
        upper: Option<Box<Expression>>,
        body: Box<Expression>,
    },
    /// Piecewise definition: one `(body, condition)` pair per line
    CaseBlock(Vec<Case>),
    /// Rectangular block of cells (a matrix)
    Block(Vec<Vec<Expression>>),
}

/// One line of a case block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub body: Expression,
    pub condition: Expression,
}

impl Case {
    pub fn new(body: Expression, condition: Expression) -> Self {
        Self { body, condition }
    }
}

/// Deepest expression tree accepted for layout
pub const MAX_DEPTH: usize = 256;

impl Expression {
    /// Create a literal
    pub fn literal(text: impl Into<String>) -> Self {
        Expression::Literal(text.into())
    }

    /// Wrap an expression in round brackets
    pub fn bracketed(inner: Expression) -> Self {
        Expression::Bracketed(Box::new(inner))
    }

    /// Create a power
    pub fn power(base: Expression, exponent: Expression) -> Self {
        Expression::Power {
            base: Box::new(base),
            exponent: Box::new(exponent),
        }
    }

    /// Create an indexed (subscripted) expression
    pub fn index(base: Expression, index: Expression) -> Self {
        Expression::Index {
            base: Box::new(base),
            index: Box::new(index),
        }
    }

    /// Create a unary expression
    pub fn unary(sign: impl Into<String>, operand: Expression) -> Self {
        Expression::Unary {
            sign: sign.into(),
            operand: Box::new(operand),
        }
    }

    /// Create a binary expression
    pub fn binary(sign: impl Into<String>, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            sign: sign.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a juxtaposition (`2x`)
    pub fn juxtaposed(left: Expression, right: Expression) -> Self {
        Self::binary("", left, right)
    }

    /// Create a fraction
    pub fn fraction(numerator: Expression, denominator: Expression) -> Self {
        Expression::Fraction {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        }
    }

    /// Create a big-operator expression
    pub fn variadic(
        sign: impl Into<String>,
        lower: Option<Expression>,
        upper: Option<Expression>,
        body: Expression,
    ) -> Self {
        Expression::Variadic {
            sign: sign.into(),
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            body: Box::new(body),
        }
    }

    /// Create a summation
    pub fn sum(lower: Option<Expression>, upper: Option<Expression>, body: Expression) -> Self {
        Self::variadic(symbols::SUM.to_string(), lower, upper, body)
    }

    /// Create an integral
    pub fn integral(lower: Option<Expression>, upper: Option<Expression>, body: Expression) -> Self {
        Self::variadic(symbols::INTEGRAL.to_string(), lower, upper, body)
    }

    /// Create a case block
    pub fn cases(cases: Vec<Case>) -> Self {
        Expression::CaseBlock(cases)
    }

    /// Create a block (matrix)
    pub fn block(rows: Vec<Vec<Expression>>) -> Self {
        Expression::Block(rows)
    }

    /// Get the direct children of this node
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal(_) => vec![],
            Expression::Bracketed(inner) => vec![inner.as_ref()],
            Expression::Power { base, exponent } => vec![base.as_ref(), exponent.as_ref()],
            Expression::Index { base, index } => vec![base.as_ref(), index.as_ref()],
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expression::Fraction {
                numerator,
                denominator,
            } => vec![numerator.as_ref(), denominator.as_ref()],
            Expression::Variadic {
                lower, upper, body, ..
            } => {
                let mut children = Vec::with_capacity(3);
                if let Some(upper) = upper {
                    children.push(upper.as_ref());
                }
                if let Some(lower) = lower {
                    children.push(lower.as_ref());
                }
                children.push(body.as_ref());
                children
            }
            Expression::CaseBlock(cases) => cases
                .iter()
                .flat_map(|case| [&case.body, &case.condition])
                .collect(),
            Expression::Block(rows) => rows.iter().flatten().collect(),
        }
    }

    /// Check the structural preconditions of the whole tree.
    ///
    /// Every block must be rectangular: all of its rows have the same number
    /// of cells. The tree may be at most [`MAX_DEPTH`] levels deep, since
    /// building, measuring and drawing all recurse per level. This runs once
    /// before any box is built.
    pub fn validate(&self) -> FormulaResult<()> {
        let mut pending = vec![(self, 1usize)];

        while let Some((node, depth)) = pending.pop() {
            if depth > MAX_DEPTH {
                return Err(FormulaError::Structural(format!(
                    "expression nests deeper than {} levels",
                    MAX_DEPTH
                )));
            }
            node.check_block()?;
            // Reversed so siblings are checked left to right
            pending.extend(node.children().into_iter().rev().map(|child| (child, depth + 1)));
        }
        Ok(())
    }

    fn check_block(&self) -> FormulaResult<()> {
        let Expression::Block(rows) = self else {
            return Ok(());
        };
        let Some(first) = rows.first() else {
            return Ok(());
        };
        let expected = first.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(FormulaError::Structural(format!(
                    "block row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    expected
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Symbols
// =============================================================================

/// Characters used when spelling commands out as literals and signs
pub mod symbols {
    // Greek letters (lowercase)
    pub const ALPHA: char = '\u{03B1}';
    pub const BETA: char = '\u{03B2}';
    pub const GAMMA: char = '\u{03B3}';
    pub const DELTA: char = '\u{03B4}';
    pub const EPSILON: char = '\u{03B5}';
    pub const ZETA: char = '\u{03B6}';
    pub const ETA: char = '\u{03B7}';
    pub const THETA: char = '\u{03B8}';
    pub const KAPPA: char = '\u{03BA}';
    pub const LAMBDA: char = '\u{03BB}';
    pub const MU: char = '\u{03BC}';
    pub const NU: char = '\u{03BD}';
    pub const XI: char = '\u{03BE}';
    pub const PI: char = '\u{03C0}';
    pub const RHO: char = '\u{03C1}';
    pub const SIGMA: char = '\u{03C3}';
    pub const TAU: char = '\u{03C4}';
    pub const PHI: char = '\u{03C6}';
    pub const CHI: char = '\u{03C7}';
    pub const PSI: char = '\u{03C8}';
    pub const OMEGA: char = '\u{03C9}';

    // Greek letters (uppercase)
    pub const GAMMA_UPPER: char = '\u{0393}';
    pub const DELTA_UPPER: char = '\u{0394}';
    pub const THETA_UPPER: char = '\u{0398}';
    pub const LAMBDA_UPPER: char = '\u{039B}';
    pub const PI_UPPER: char = '\u{03A0}';
    pub const SIGMA_UPPER: char = '\u{03A3}';
    pub const PHI_UPPER: char = '\u{03A6}';
    pub const OMEGA_UPPER: char = '\u{03A9}';

    // Big operators
    pub const SUM: char = '\u{2211}';
    pub const PRODUCT: char = '\u{220F}';
    pub const INTEGRAL: char = '\u{222B}';

    // Binary operators
    pub const MINUS: char = '\u{2212}';
    pub const TIMES: char = '\u{00D7}';
    pub const DOT: char = '\u{22C5}';
    pub const PLUS_MINUS: char = '\u{00B1}';

    // Relations
    pub const NOT_EQUAL: char = '\u{2260}';
    pub const LESS_EQUAL: char = '\u{2264}';
    pub const GREATER_EQUAL: char = '\u{2265}';
    pub const APPROX: char = '\u{2248}';
    pub const EQUIV: char = '\u{2261}';

    // Miscellaneous
    pub const INFINITY: char = '\u{221E}';
    pub const PARTIAL: char = '\u{2202}';
    pub const NABLA: char = '\u{2207}';
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Expression> {
        cells.iter().map(|c| Expression::literal(*c)).collect()
    }

    #[test]
    fn test_basic_node_creation() {
        let lit = Expression::literal("x");
        assert!(matches!(lit, Expression::Literal(ref text) if text == "x"));
    }

    #[test]
    fn test_power_creation() {
        let power = Expression::power(Expression::literal("x"), Expression::literal("2"));
        if let Expression::Power { base, exponent } = power {
            assert_eq!(*base, Expression::literal("x"));
            assert_eq!(*exponent, Expression::literal("2"));
        } else {
            panic!("Expected Power");
        }
    }

    #[test]
    fn test_sum_creation() {
        let sum = Expression::sum(
            Some(Expression::literal("i")),
            None,
            Expression::literal("a"),
        );
        if let Expression::Variadic { sign, lower, upper, .. } = sum {
            assert_eq!(sign, symbols::SUM.to_string());
            assert!(lower.is_some());
            assert!(upper.is_none());
        } else {
            panic!("Expected Variadic");
        }
    }

    #[test]
    fn test_children() {
        let frac = Expression::fraction(Expression::literal("a"), Expression::literal("b"));
        assert_eq!(frac.children().len(), 2);

        let cases = Expression::cases(vec![
            Case::new(Expression::literal("x"), Expression::literal("x>0")),
            Case::new(Expression::literal("0"), Expression::literal("x<0")),
        ]);
        assert_eq!(cases.children().len(), 4);
    }

    #[test]
    fn test_rectangular_block_is_valid() {
        let block = Expression::block(vec![
            row(&["a", "b"]),
            row(&["c", "d"]),
            row(&["e", "f"]),
        ]);
        assert!(block.validate().is_ok());
    }

    #[test]
    fn test_ragged_block_is_structural_error() {
        let block = Expression::block(vec![
            row(&["a", "b"]),
            row(&["c", "d"]),
            row(&["e", "f", "g"]),
        ]);
        let err = block.validate().unwrap_err();
        assert!(matches!(err, FormulaError::Structural(_)));
        assert!(err.to_string().contains("row 3"));
    }

    #[test]
    fn test_nested_ragged_block_is_found() {
        let inner = Expression::block(vec![row(&["a"]), row(&["b", "c"])]);
        let expr = Expression::fraction(Expression::literal("1"), Expression::bracketed(inner));
        assert!(matches!(
            expr.validate(),
            Err(FormulaError::Structural(_))
        ));
    }

    fn nested_brackets(levels: usize) -> Expression {
        (1..levels).fold(Expression::literal("x"), |inner, _| Expression::bracketed(inner))
    }

    #[test]
    fn test_depth_limit_is_inclusive() {
        assert!(nested_brackets(MAX_DEPTH).validate().is_ok());
        let err = nested_brackets(MAX_DEPTH + 1).validate().unwrap_err();
        assert_eq!(err.to_string(), "Structural error: expression nests deeper than 256 levels");
    }

    #[test]
    fn test_long_chain_is_rejected_without_recursing() {
        let chain = (0..2_000).fold(Expression::literal("x"), |left, _| {
            Expression::binary("+", left, Expression::literal("x"))
        });
        assert!(matches!(chain.validate(), Err(FormulaError::Structural(_))));
    }

    #[test]
    fn test_empty_block_is_valid() {
        assert!(Expression::block(vec![]).validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let node = Expression::fraction(Expression::literal("1"), Expression::literal("2"));
        let json = serde_json::to_string(&node).unwrap();
        let deserialized: Expression = serde_json::from_str(&json).unwrap();
        assert_eq!(node, deserialized);
    }
}
