//! Resolver error type and result.

use crate::prelude::*;
use crate::frontend::ast::{Position, Positioned};

/// Resolve result type.
pub type ResolveResult<T = ()> = Result<T, ResolveError>;

/// The reason a resolve pass failed.
#[derive(Clone, Debug)]
pub enum ResolveErrorKind {
    TypeMismatch(String, String),
    UndefinedVariable(String),
    UndefinedType(String),
    UndefinedMember(String),
    DuplicateDefinition(String),
    NumberOfArguments(String, usize, usize),
    NumberOfInitializers(String, usize, usize),
    NotAFunction(String),
    NotAPointer(String),
    NotAStruct(String),
    InvalidMemberAccess(String, String),
    NotAddressable,
    MissingReturn(String),
    EmptyStruct(String),
    UnsizedType(String),
    IllegalStructOperation,
    IllegalReturn,
    Internal(String),
}

/// An error reported by the resolver, with the position of the offending AST node.
#[derive(Clone, Debug)]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    position: Position,
}

impl ResolveError {
    pub(crate) fn new(item: &impl Positioned, kind: ResolveErrorKind) -> ResolveError {
        Self { kind, position: item.position() }
    }
    /// Computes the 1-based line and column of the error within the given input.
    pub fn loc(self: &Self, input: &str) -> (u32, u32) {
        self.position.loc(input)
    }
    /// The kind of the error.
    pub fn kind(self: &Self) -> &ResolveErrorKind {
        &self.kind
    }
}

impl Display for ResolveError {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ResolveErrorKind::TypeMismatch(g, e) => write!(f, "Expected type '{}', got '{}'", e, g),
            ResolveErrorKind::UndefinedVariable(v) => write!(f, "Undefined variable '{}'", v),
            ResolveErrorKind::UndefinedType(t) => write!(f, "Undefined type '{}'", t),
            ResolveErrorKind::UndefinedMember(m) => write!(f, "Undefined member '{}'", m),
            ResolveErrorKind::DuplicateDefinition(d) => write!(f, "Duplicate definition of '{}'", d),
            ResolveErrorKind::NumberOfArguments(name, e, g) => write!(f, "Function '{}' takes {} argument(s), got {}", name, e, g),
            ResolveErrorKind::NumberOfInitializers(name, e, g) => write!(f, "Struct '{}' has {} field(s), got {} initializer(s)", name, e, g),
            ResolveErrorKind::NotAFunction(t) => write!(f, "Type '{}' is not callable", t),
            ResolveErrorKind::NotAPointer(t) => write!(f, "Type '{}' is not a pointer", t),
            ResolveErrorKind::NotAStruct(t) => write!(f, "Type '{}' is not a struct", t),
            ResolveErrorKind::InvalidMemberAccess(op, t) => write!(f, "Cannot use '{}' on type '{}'", op, t),
            ResolveErrorKind::NotAddressable => write!(f, "Cannot take the address of this expression"),
            ResolveErrorKind::MissingReturn(name) => write!(f, "Function '{}' does not return a value on all paths", name),
            ResolveErrorKind::EmptyStruct(name) => write!(f, "Struct '{}' has no fields", name),
            ResolveErrorKind::UnsizedType(t) => write!(f, "Type '{}' has no size", t),
            ResolveErrorKind::IllegalStructOperation => write!(f, "Operation not supported on struct values"),
            ResolveErrorKind::IllegalReturn => write!(f, "Return outside of function"),
            ResolveErrorKind::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

/// Extension to convert an `Option<T>` into a `ResolveResult<T>`.
pub(crate) trait SomeOrResolveError<T> {
    fn unwrap_or_err(self: Self, item: Option<&dyn Positioned>, kind: ResolveErrorKind) -> ResolveResult<T>;
    fn unwrap_or_ice(self: Self, message: &str) -> ResolveResult<T>;
}

impl<T> SomeOrResolveError<T> for Option<T> {
    fn unwrap_or_err(self: Self, item: Option<&dyn Positioned>, kind: ResolveErrorKind) -> ResolveResult<T> {
        match self {
            Some(value) => Ok(value),
            None => Err(ResolveError {
                kind,
                position: item.map_or(Position(0), |i| i.position()),
            }),
        }
    }
    fn unwrap_or_ice(self: Self, message: &str) -> ResolveResult<T> {
        match self {
            Some(value) => Ok(value),
            None => ice(message),
        }
    }
}

/// Returns an internal compiler error. Anything that triggers this is a bug.
pub(crate) fn ice<T>(message: &str) -> ResolveResult<T> {
    Err(ResolveError {
        kind: ResolveErrorKind::Internal(message.to_string()),
        position: Position(0),
    })
}
