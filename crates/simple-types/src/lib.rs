//! Shared types for Simple.
//!
//! This crate defines the AST node types, source spans and the parse error
//! record shared by the parser, the evaluator and the CLI.

mod error;
mod span;
pub mod ast;

pub use error::ParseError;
pub use span::{SourceFile, Span};
