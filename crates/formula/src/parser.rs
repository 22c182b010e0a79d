//! Formula Parser - Parse textual formulas into expression trees
//!
//! This module parses notation like `x^2 + \frac{1}{n}` into [`Expression`]
//! trees. Rejections carry a human-readable message with the byte position
//! of the offending input.

use crate::error::{FormulaError, FormulaResult};
use crate::model::*;
use std::fmt;

// =============================================================================
// Tokenizer
// =============================================================================

/// Token types for formula parsing
#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    /// A number (integer or decimal)
    Number(String),
    /// An identifier (variable name)
    Identifier(String),
    /// An operator (+, -, *, /, =, <, >)
    Operator(char),
    /// Superscript marker (^)
    Superscript,
    /// Subscript marker (_)
    Subscript,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    /// Cell separator inside `\cases` and `\matrix`
    Comma,
    /// Row separator inside `\cases` and `\matrix`
    Semicolon,
    /// Backslash command (like \frac, \sum)
    Command(String),
    /// End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number '{}'", n),
            TokenKind::Identifier(s) => write!(f, "identifier '{}'", s),
            TokenKind::Operator(c) => write!(f, "'{}'", c),
            TokenKind::Superscript => write!(f, "'^'"),
            TokenKind::Subscript => write!(f, "'_'"),
            TokenKind::OpenParen => write!(f, "'('"),
            TokenKind::CloseParen => write!(f, "')'"),
            TokenKind::OpenBrace => write!(f, "'{{'"),
            TokenKind::CloseBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Command(cmd) => write!(f, "'\\{}'", cmd),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    /// Byte offset of the token in the input
    position: usize,
}

/// Tokenizer for formula notation
struct Tokenizer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn next_token(&mut self) -> FormulaResult<Token> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }

        let (position, c) = match self.chars.peek() {
            Some(&(i, c)) => (i, c),
            None => {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    position: self.input.len(),
                })
            }
        };

        let kind = match c {
            '0'..='9' | '.' => self.read_number(),
            '\\' => self.read_command(position)?,
            c if c.is_alphabetic() => self.read_identifier(),
            _ => {
                self.chars.next();
                match c {
                    '^' => TokenKind::Superscript,
                    '_' => TokenKind::Subscript,
                    '(' => TokenKind::OpenParen,
                    ')' => TokenKind::CloseParen,
                    '{' => TokenKind::OpenBrace,
                    '}' => TokenKind::CloseBrace,
                    ',' => TokenKind::Comma,
                    ';' => TokenKind::Semicolon,
                    '+' | '-' | '*' | '/' | '=' | '<' | '>' => TokenKind::Operator(c),
                    _ => {
                        return Err(FormulaError::Parse(format!(
                            "unexpected character '{}' at position {}",
                            c, position
                        )))
                    }
                }
            }
        };

        Ok(Token { kind, position })
    }

    fn read_number(&mut self) -> TokenKind {
        let mut num = String::new();
        let mut has_dot = false;

        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '0'..='9' => num.push(c),
                '.' if !has_dot => {
                    has_dot = true;
                    num.push(c);
                }
                _ => break,
            }
            self.chars.next();
        }

        TokenKind::Number(num)
    }

    fn read_identifier(&mut self) -> TokenKind {
        let mut ident = String::new();

        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_alphanumeric() {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        TokenKind::Identifier(ident)
    }

    fn read_command(&mut self, position: usize) -> FormulaResult<TokenKind> {
        // Skip the backslash
        self.chars.next();

        let mut cmd = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphabetic() {
                cmd.push(c);
                self.chars.next();
            } else {
                break;
            }
        }

        if cmd.is_empty() {
            return Err(FormulaError::Parse(format!(
                "expected command name after '\\' at position {}",
                position
            )));
        }

        Ok(TokenKind::Command(cmd))
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parser for formula notation
pub struct FormulaParser {
    tokens: Vec<Token>,
    position: usize,
    /// Open groups, commands and sign chains around the current token
    depth: usize,
}

impl FormulaParser {
    /// Create a new parser for the given input
    pub fn new(input: &str) -> FormulaResult<Self> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();

        loop {
            let token = tokenizer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }

        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the whole input into one expression
    pub fn parse(&mut self) -> FormulaResult<Expression> {
        if self.is_at_end() {
            return Err(FormulaError::Parse("empty expression".to_string()));
        }

        let expr = self.parse_relation()?;

        if !self.is_at_end() {
            return Err(self.unexpected());
        }
        Ok(expr)
    }

    /// relation := additive (REL additive)*
    fn parse_relation(&mut self) -> FormulaResult<Expression> {
        let mut left = self.parse_additive()?;

        while let Some(sign) = self.relation_sign() {
            self.advance();
            let right = self.parse_additive()?;
            left = Expression::binary(sign, left, right);
        }

        Ok(left)
    }

    /// additive := multiplicative (ADD multiplicative)*
    fn parse_additive(&mut self) -> FormulaResult<Expression> {
        let mut left = self.parse_multiplicative()?;

        while let Some(sign) = self.additive_sign() {
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::binary(sign, left, right);
        }

        Ok(left)
    }

    /// multiplicative := unary ((MUL | '/') unary | postfix)*
    fn parse_multiplicative(&mut self) -> FormulaResult<Expression> {
        let mut left = self.parse_unary()?;

        loop {
            if let Some(sign) = self.multiplicative_sign() {
                self.advance();
                let right = self.parse_unary()?;
                left = Expression::binary(sign, left, right);
            } else if self.peek() == &TokenKind::Operator('/') {
                self.advance();
                let right = self.parse_unary()?;
                left = Expression::fraction(left, right);
            } else if self.starts_primary() {
                let right = self.parse_postfix()?;
                left = Expression::juxtaposed(left, right);
            } else {
                break;
            }
        }

        Ok(left)
    }

    /// unary := SIGN unary | postfix
    fn parse_unary(&mut self) -> FormulaResult<Expression> {
        match self.prefix_sign() {
            Some(sign) => {
                self.advance();
                let operand = self.nested(Self::parse_unary)?;
                Ok(Expression::unary(sign, operand))
            }
            None => self.parse_postfix(),
        }
    }

    /// postfix := primary ('^' script | '_' script)*
    fn parse_postfix(&mut self) -> FormulaResult<Expression> {
        let mut current = self.parse_primary()?;

        loop {
            match self.peek() {
                TokenKind::Superscript => {
                    self.advance();
                    let exponent = self.parse_script()?;
                    current = Expression::power(current, exponent);
                }
                TokenKind::Subscript => {
                    self.advance();
                    let index = self.parse_script()?;
                    current = Expression::index(current, index);
                }
                _ => break,
            }
        }

        Ok(current)
    }

    /// A script argument: a primary, optionally signed (`x^-1`)
    fn parse_script(&mut self) -> FormulaResult<Expression> {
        match self.prefix_sign() {
            Some(sign) => {
                self.advance();
                let operand = self.nested(Self::parse_script)?;
                Ok(Expression::unary(sign, operand))
            }
            None => self.parse_primary(),
        }
    }

    /// Parse a primary expression (atom, command, or grouped expression)
    fn parse_primary(&mut self) -> FormulaResult<Expression> {
        match self.peek().clone() {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expression::Literal(n))
            }
            TokenKind::Identifier(s) => {
                self.advance();
                Ok(Expression::Literal(s))
            }
            TokenKind::OpenParen => {
                self.advance();
                let inner = self.nested(Self::parse_relation)?;
                self.expect(TokenKind::CloseParen)?;
                Ok(Expression::bracketed(inner))
            }
            TokenKind::OpenBrace => {
                self.advance();
                let inner = self.nested(Self::parse_relation)?;
                self.expect(TokenKind::CloseBrace)?;
                Ok(inner)
            }
            TokenKind::Command(cmd) => {
                let position = self.current_position();
                self.advance();
                self.nested(|parser| parser.parse_command(&cmd, position))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parse a backslash command in primary position
    fn parse_command(&mut self, cmd: &str, position: usize) -> FormulaResult<Expression> {
        match cmd {
            "frac" => {
                let numerator = self.parse_primary()?;
                let denominator = self.parse_primary()?;
                Ok(Expression::fraction(numerator, denominator))
            }
            "sum" => self.parse_variadic(symbols::SUM),
            "prod" => self.parse_variadic(symbols::PRODUCT),
            "int" => self.parse_variadic(symbols::INTEGRAL),
            "cases" => self.parse_cases(),
            "matrix" => self.parse_matrix(),
            _ => match symbol_literal(cmd) {
                Some(c) => Ok(Expression::Literal(c.to_string())),
                None => Err(FormulaError::Parse(format!(
                    "unknown command '\\{}' at position {}",
                    cmd, position
                ))),
            },
        }
    }

    /// Parse the bounds and body of `\sum`, `\prod`, `\int`
    fn parse_variadic(&mut self, sign: char) -> FormulaResult<Expression> {
        let mut lower = None;
        let mut upper = None;

        loop {
            match self.peek() {
                TokenKind::Subscript => {
                    if lower.is_some() {
                        return Err(self.duplicate("lower bound"));
                    }
                    self.advance();
                    lower = Some(self.parse_script()?);
                }
                TokenKind::Superscript => {
                    if upper.is_some() {
                        return Err(self.duplicate("upper bound"));
                    }
                    self.advance();
                    upper = Some(self.parse_script()?);
                }
                _ => break,
            }
        }

        let body = self.parse_multiplicative()?;
        Ok(Expression::variadic(sign.to_string(), lower, upper, body))
    }

    /// `\cases{body, condition; body, condition}`
    fn parse_cases(&mut self) -> FormulaResult<Expression> {
        self.expect(TokenKind::OpenBrace)?;
        let mut cases = Vec::new();

        loop {
            let body = self.parse_relation()?;
            self.expect(TokenKind::Comma)?;
            let condition = self.parse_relation()?;
            cases.push(Case::new(body, condition));

            if self.peek() == &TokenKind::Semicolon {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(TokenKind::CloseBrace)?;
        Ok(Expression::cases(cases))
    }

    /// `\matrix{a, b; c, d}`; row lengths are checked by validation, not here
    fn parse_matrix(&mut self) -> FormulaResult<Expression> {
        self.expect(TokenKind::OpenBrace)?;
        let mut rows = Vec::new();

        loop {
            let mut row = vec![self.parse_relation()?];
            while self.peek() == &TokenKind::Comma {
                self.advance();
                row.push(self.parse_relation()?);
            }
            rows.push(row);

            if self.peek() == &TokenKind::Semicolon {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(TokenKind::CloseBrace)?;
        Ok(Expression::block(rows))
    }

    /// Run `parse` one level deeper, refusing input nested past [`MAX_DEPTH`]
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> FormulaResult<T>) -> FormulaResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaError::Parse(format!(
                "expression nested too deeply at position {}",
                self.current_position()
            )));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn relation_sign(&self) -> Option<String> {
        let sign = match self.peek() {
            TokenKind::Operator(c @ ('=' | '<' | '>')) => *c,
            TokenKind::Command(cmd) => match cmd.as_str() {
                "le" | "leq" => symbols::LESS_EQUAL,
                "ge" | "geq" => symbols::GREATER_EQUAL,
                "ne" | "neq" => symbols::NOT_EQUAL,
                "approx" => symbols::APPROX,
                "equiv" => symbols::EQUIV,
                _ => return None,
            },
            _ => return None,
        };
        Some(sign.to_string())
    }

    fn additive_sign(&self) -> Option<String> {
        match self.peek() {
            TokenKind::Operator('+') => Some("+".to_string()),
            TokenKind::Operator('-') => Some(symbols::MINUS.to_string()),
            TokenKind::Command(cmd) if cmd == "pm" => Some(symbols::PLUS_MINUS.to_string()),
            _ => None,
        }
    }

    fn multiplicative_sign(&self) -> Option<String> {
        match self.peek() {
            TokenKind::Operator('*') => Some(symbols::DOT.to_string()),
            TokenKind::Command(cmd) if cmd == "cdot" => Some(symbols::DOT.to_string()),
            TokenKind::Command(cmd) if cmd == "times" => Some(symbols::TIMES.to_string()),
            _ => None,
        }
    }

    fn prefix_sign(&self) -> Option<String> {
        // Prefix signs are the additive ones
        self.additive_sign()
    }

    /// Whether the next token can begin a juxtaposed operand
    fn starts_primary(&self) -> bool {
        match self.peek() {
            TokenKind::Number(_)
            | TokenKind::Identifier(_)
            | TokenKind::OpenParen
            | TokenKind::OpenBrace => true,
            TokenKind::Command(cmd) => {
                matches!(cmd.as_str(), "frac" | "sum" | "prod" | "int" | "cases" | "matrix")
                    || symbol_literal(cmd).is_some()
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> FormulaResult<()> {
        if self.peek() == &kind {
            self.advance();
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "expected {} at position {}, found {}",
                kind,
                self.current_position(),
                self.peek()
            )))
        }
    }

    fn unexpected(&self) -> FormulaError {
        FormulaError::Parse(format!(
            "unexpected {} at position {}",
            self.peek(),
            self.current_position()
        ))
    }

    fn duplicate(&self, what: &str) -> FormulaError {
        FormulaError::Parse(format!(
            "duplicate {} at position {}",
            what,
            self.current_position()
        ))
    }

    fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.position)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn current_position(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map(|t| t.position)
            .unwrap_or(0)
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }
}

/// Map symbol commands to the character they stand for
fn symbol_literal(cmd: &str) -> Option<char> {
    let c = match cmd {
        "alpha" => symbols::ALPHA,
        "beta" => symbols::BETA,
        "gamma" => symbols::GAMMA,
        "delta" => symbols::DELTA,
        "epsilon" => symbols::EPSILON,
        "zeta" => symbols::ZETA,
        "eta" => symbols::ETA,
        "theta" => symbols::THETA,
        "kappa" => symbols::KAPPA,
        "lambda" => symbols::LAMBDA,
        "mu" => symbols::MU,
        "nu" => symbols::NU,
        "xi" => symbols::XI,
        "pi" => symbols::PI,
        "rho" => symbols::RHO,
        "sigma" => symbols::SIGMA,
        "tau" => symbols::TAU,
        "phi" => symbols::PHI,
        "chi" => symbols::CHI,
        "psi" => symbols::PSI,
        "omega" => symbols::OMEGA,
        "Gamma" => symbols::GAMMA_UPPER,
        "Delta" => symbols::DELTA_UPPER,
        "Theta" => symbols::THETA_UPPER,
        "Lambda" => symbols::LAMBDA_UPPER,
        "Pi" => symbols::PI_UPPER,
        "Sigma" => symbols::SIGMA_UPPER,
        "Phi" => symbols::PHI_UPPER,
        "Omega" => symbols::OMEGA_UPPER,
        "infty" => symbols::INFINITY,
        "partial" => symbols::PARTIAL,
        "nabla" => symbols::NABLA,
        _ => return None,
    };
    Some(c)
}

/// Parse formula notation into an [`Expression`]
pub fn parse_formula(input: &str) -> FormulaResult<Expression> {
    let mut parser = FormulaParser::new(input)?;
    parser.parse()
}

// =============================================================================
// Tests
// =============================================================================
