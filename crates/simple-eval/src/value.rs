//! Runtime values.

use crate::error::{EvalError, EvalResult};
use simple_types::ast::{Literal, LiteralKind};
use std::fmt;
use std::io::Write;
use std::num::IntErrorKind;
use std::rc::Rc;

/// Signature of a host function callable from scripts.
///
/// Receives the evaluator's output sink and the evaluated arguments in
/// call order. `None` means the call produced no value.
pub type NativeFnPtr = dyn Fn(&mut dyn Write, Vec<Value>) -> EvalResult<Option<Value>>;

/// A named host function bound in the environment like any other value.
#[derive(Clone)]
pub struct NativeFn {
    name: String,
    func: Rc<NativeFnPtr>,
}

impl NativeFn {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&mut dyn Write, Vec<Value>) -> EvalResult<Option<Value>> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, out: &mut dyn Write, args: Vec<Value>) -> EvalResult<Option<Value>> {
        (self.func)(out, args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// A runtime value. Values are immutable once built.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
    Native(NativeFn),
}

impl Value {
    /// Build a value from a literal token.
    ///
    /// Integer and float text parse to their own kinds; string text loses
    /// its enclosing quote characters.
    pub fn from_literal(lit: &Literal) -> EvalResult<Value> {
        let text = lit.text.as_str();
        match lit.kind {
            LiteralKind::Integer => text.parse::<i64>().map(Value::Integer).map_err(|e| {
                match e.kind() {
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                        EvalError::Overflow(format!("integer literal {text} is out of range"))
                    }
                    _ => EvalError::InternalError(format!("malformed integer literal '{text}'")),
                }
            }),
            LiteralKind::Float => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| EvalError::InternalError(format!("malformed float literal '{text}'"))),
            LiteralKind::String => strip_quotes(text)
                .map(|s| Value::String(s.to_string()))
                .ok_or_else(|| {
                    EvalError::InternalError(format!("malformed string literal {text}"))
                }),
            LiteralKind::Bool => match text {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(EvalError::InternalError(format!(
                    "malformed boolean literal '{text}'"
                ))),
            },
            LiteralKind::Null => Ok(Value::Null),
        }
    }

    /// Kind name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Native(_) => "function",
        }
    }

    /// Truthiness: only booleans have one.
    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::NotBoolean(format!(
                "expected boolean, got {}",
                other.type_name()
            ))),
        }
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    let open = chars.next()?;
    let close = chars.next_back()?;
    if open == close && (open == '"' || open == '\'') {
        Some(chars.as_str())
    } else {
        None
    }
}

/// Structural equality: same kind and same content.
///
/// Integer `1` and Float `1.0` are different values. A float is always
/// equal to itself, NaN included. A native function equals only itself.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(&a.func, &b.func),
            _ => false,
        }
    }
}

/// Text rendering shared by `write` and string concatenation.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            // Debug keeps the decimal point on whole floats: 3.0, not 3.
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Native(native) => write!(f, "<native fn {}>", native.name),
        }
    }
}
