//! Runtime error types for the Simple evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Evaluation error. Every variant aborts the whole run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Identifier read or called with no binding in the environment
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    /// Call target is bound to something other than a native function
    #[error("not callable: {0}")]
    NotCallable(String),
    /// Operator applied to operand kinds it does not support
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Loop or branch condition is not a boolean
    #[error("not a boolean: {0}")]
    NotBoolean(String),
    /// The syntax tree broke the parser/evaluator contract
    #[error("internal error: {0}")]
    InternalError(String),
    /// 64-bit integer arithmetic or literal out of range
    #[error("integer overflow: {0}")]
    Overflow(String),
    /// Configured step budget exhausted
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),
    /// Evaluation nested deeper than the configured maximum
    #[error("stack overflow: nesting deeper than {0} levels")]
    StackOverflow(usize),
    /// The output sink rejected a write
    #[error("output error: {0}")]
    Output(String),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UndefinedVariable(_) => ErrorKind::UndefinedVariable,
            Self::NotCallable(_) => ErrorKind::NotCallable,
            Self::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Self::NotBoolean(_) => ErrorKind::NotBoolean,
            Self::InternalError(_) => ErrorKind::InternalError,
            Self::Overflow(_) => ErrorKind::Overflow,
            Self::StepLimitExceeded(_) => ErrorKind::StepLimitExceeded,
            Self::StackOverflow(_) => ErrorKind::StackOverflow,
            Self::Output(_) => ErrorKind::Output,
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

/// Fieldless mirror of [`EvalError`] for matching and structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UndefinedVariable,
    NotCallable,
    TypeMismatch,
    NotBoolean,
    InternalError,
    Overflow,
    StepLimitExceeded,
    StackOverflow,
    Output,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UndefinedVariable => "undefined_variable",
            Self::NotCallable => "not_callable",
            Self::TypeMismatch => "type_mismatch",
            Self::NotBoolean => "not_boolean",
            Self::InternalError => "internal_error",
            Self::Overflow => "overflow",
            Self::StepLimitExceeded => "step_limit_exceeded",
            Self::StackOverflow => "stack_overflow",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
