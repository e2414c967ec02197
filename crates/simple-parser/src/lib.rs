//! Simple parser: converts source text into an AST.
//!
//! Tokenizing and rule matching are driven by the pest grammar in
//! `simple.pest`; this crate only maps the resulting pairs onto
//! [`simple_types::ast`] nodes.

mod parser;

pub use parser::{parse, Rule, SimpleParser, MAX_EXPR_DEPTH, MAX_NESTING};
