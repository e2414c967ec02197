//! Binary operator implementations.
//!
//! Numeric operators share one promotion rule: two integers stay integer,
//! any float operand promotes the other side to float.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use simple_types::ast::BinOp;
use std::cmp::Ordering;

/// Evaluate `+`, `-` or `*`.
pub(crate) fn arithmetic(op: BinOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let int_op: fn(i64, i64) -> Option<i64> = match op {
        BinOp::Add => i64::checked_add,
        BinOp::Sub => i64::checked_sub,
        BinOp::Mul => i64::checked_mul,
        _ => {
            return Err(EvalError::InternalError(format!(
                "'{}' is not an additive operator",
                op.as_str()
            )))
        }
    };
    let float_op: fn(f64, f64) -> f64 = match op {
        BinOp::Add => |a: f64, b: f64| a + b,
        BinOp::Sub => |a: f64, b: f64| a - b,
        _ => |a: f64, b: f64| a * b,
    };

    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => {
            int_op(*a, *b).map(Value::Integer).ok_or_else(|| {
                EvalError::Overflow(format!("{a} {} {b} does not fit in 64 bits", op.as_str()))
            })
        }
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(*a, *b))),
        (Value::Integer(a), Value::Float(b)) => Ok(Value::Float(float_op(*a as f64, *b))),
        (Value::Float(a), Value::Integer(b)) => Ok(Value::Float(float_op(*a, *b as f64))),
        (Value::String(_), _) | (_, Value::String(_)) if op == BinOp::Add => {
            Ok(Value::String(format!("{left}{right}")))
        }
        _ => Err(EvalError::TypeMismatch(format!(
            "cannot apply '{}' to {} and {}",
            op.as_str(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Evaluate `==`, `!=`, `>` or `<`.
pub(crate) fn comparison(op: BinOp, left: &Value, right: &Value) -> EvalResult<Value> {
    match op {
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::NotEq => Ok(Value::Bool(left != right)),
        BinOp::Greater => {
            numeric_order(op, left, right).map(|o| Value::Bool(o == Some(Ordering::Greater)))
        }
        BinOp::Less => {
            numeric_order(op, left, right).map(|o| Value::Bool(o == Some(Ordering::Less)))
        }
        _ => Err(EvalError::InternalError(format!(
            "'{}' is not a comparison operator",
            op.as_str()
        ))),
    }
}

/// Order two numbers; `None` when a NaN is involved.
fn numeric_order(op: BinOp, left: &Value, right: &Value) -> EvalResult<Option<Ordering>> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(Some(a.cmp(b))),
        (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b)),
        (Value::Integer(a), Value::Float(b)) => Ok((*a as f64).partial_cmp(b)),
        (Value::Float(a), Value::Integer(b)) => Ok(a.partial_cmp(&(*b as f64))),
        _ => Err(EvalError::TypeMismatch(format!(
            "cannot compare {} and {} with '{}'",
            left.type_name(),
            right.type_name(),
            op.as_str()
        ))),
    }
}
