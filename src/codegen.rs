//! Compiler backend. Generates output text from a resolved program.

pub mod error;
mod generator;
mod writer;

pub use generator::generate;
