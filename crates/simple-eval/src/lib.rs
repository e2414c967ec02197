//! Simple tree-walking evaluator.
//!
//! Executes a parsed [`simple_types::ast::Program`] directly: one recursive,
//! depth-first walk over the tree with a single global environment. The only
//! observable effect is the text written by the `write` builtin.

mod builtins;
mod env;
mod error;
mod evaluator;
mod operators;
mod value;

pub use env::Environment;
pub use error::{ErrorKind, EvalError, EvalResult};
pub use evaluator::{evaluate, Evaluator, EvaluatorOptions, DEFAULT_MAX_DEPTH};
pub use value::{NativeFn, NativeFnPtr, Value};
