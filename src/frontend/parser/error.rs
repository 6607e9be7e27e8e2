//! Parse error type and result.

use crate::prelude::*;
use crate::frontend::ast::Position;

/// Parse result type.
pub type ParseResult<T = ()> = Result<T, ParseError>;

/// The reason a parse failed.
#[derive(Clone, Debug)]
pub enum ParseErrorKind {
    SyntaxError,
    InvalidNumerical,
}

/// An error reported by the parser, with the position of the offending input.
#[derive(Clone, Debug)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    position: Position,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, position: Position) -> ParseError {
        Self { kind, position }
    }
    /// Computes the 1-based line and column of the error within the given input.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position.loc(input)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &ParseErrorKind {
        &self.kind
    }
}

impl Display for ParseError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::SyntaxError => write!(f, "Syntax error"),
            ParseErrorKind::InvalidNumerical => write!(f, "Invalid numerical value"),
        }
    }
}
