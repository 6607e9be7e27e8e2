//! Compiler frontend. Generates a type-checked and resolved AST.

pub mod ast;
pub mod parser;
pub mod resolver;

/// Parsed program AST.
pub type Program = Vec<ast::Statement>;

pub use parser::parse;
pub use resolver::{resolve, Resolved, ResolvedProgram};
