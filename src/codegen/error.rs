//! Code generation error type and result.

use crate::prelude::*;
use crate::frontend::ast::Position;

/// Code generation result type.
pub type GenerateResult<T = ()> = Result<T, GenerateError>;

/// The reason code generation failed. Code generation runs on a fully resolved
/// program, so any failure here indicates a compiler bug, not a source error.
#[derive(Clone, Debug)]
pub enum GenerateErrorKind {
    Internal(String),
}

/// An error reported by the code generator.
#[derive(Clone, Debug)]
pub struct GenerateError {
    pub kind: GenerateErrorKind,
    position: Position,
}

impl GenerateError {
    /// Computes the 1-based line and column of the error within the given input.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position.loc(input)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &GenerateErrorKind {
        &self.kind
    }
}

impl Display for GenerateError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            GenerateErrorKind::Internal(message) => write!(f, "Internal error: {}", message),
        }
    }
}

/// Extension to convert an `Option<T>` into a `GenerateResult<T>`.
pub(crate) trait SomeOrGenerateError<T> {
    fn unwrap_or_ice(self: Self, message: &str) -> GenerateResult<T>;
}

impl<T> SomeOrGenerateError<T> for Option<T> {
    fn unwrap_or_ice(self: Self, message: &str) -> GenerateResult<T> {
        match self {
            Some(value) => Ok(value),
            None => ice(message),
        }
    }
}

/// Returns an internal compiler error. Anything that triggers this is a bug.
pub(crate) fn ice<T>(message: &str) -> GenerateResult<T> {
    Err(GenerateError {
        kind: GenerateErrorKind::Internal(message.to_string()),
        position: Position(0),
    })
}
