pub use minic::{compile, Error};
pub use minic::frontend::parse;
pub use minic::frontend::parser::error::ParseErrorKind;
pub use minic::frontend::resolver::error::ResolveErrorKind;

/// Compiles the given source, panicking on error.
#[allow(dead_code)]
pub fn compile_ok(source: &str) -> String {
    match compile(source) {
        Ok(output) => output,
        Err(err) => panic!("Expected successful compilation, got: {}", err),
    }
}

/// Compiles the given source, expecting a resolve error, and returns its kind.
#[allow(dead_code)]
pub fn resolve_err(source: &str) -> ResolveErrorKind {
    match compile(source) {
        Err(Error::ResolveError(err)) => err.kind,
        Ok(_) => panic!("Expected a resolve error, compilation succeeded"),
        Err(err) => panic!("Expected a resolve error, got: {}", err),
    }
}
