//! A compiler for a small statically typed, C-like language targeting a flat,
//! byte-addressed linear memory.
//!
//! The language supports primitive integer types, pointers, structs, functions
//! and the usual control flow constructs. Compilation runs in two passes over
//! a single AST: the [frontend] parses and resolves the program, the [codegen]
//! backend emits text against a small runtime ABI (stack pointer, typed memory
//! views, allocate/copy/zero primitives).
//!
//! ```
//! let output = minic::compile("
//!     struct Point { int x; int y; };
//!     int sum(Point p) {
//!         return p.x + p.y;
//!     }
//! ").unwrap();
//! assert!(output.contains("function sum(p) {"));
//! ```

pub mod frontend;
pub mod codegen;
pub mod shared;
pub(crate) mod prelude;

pub use crate::shared::error::Error;

/// Compiles the given source text and returns the emitted output text, or the
/// first error encountered. Partial output is never returned.
pub fn compile(source: &str) -> Result<String, Error> {
    let program = frontend::parse(source)?;
    let resolved = frontend::resolve(program)?;
    let output = codegen::generate(&resolved)?;
    Ok(output)
}
