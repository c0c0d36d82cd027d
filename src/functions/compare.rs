//! # compare.rs
//!
//! Equality and ordering over the basic kinds.
//!
//! The basic kinds are bool, int, uint, float and string. Signed and
//! unsigned integers compare by mathematical value; every other mixed pair
//! is rejected as incompatible. Lists, maps and function values cannot be
//! compared at all.

use std::cmp::Ordering;

use crate::error::FuncError;
use crate::value::{Kind, Value};

/// Rejects operands whose kind takes no part in comparisons.
fn comparable(v: &Value) -> Result<(), FuncError>
{
    match v.kind() {
        Kind::List | Kind::Map | Kind::Func => Err(FuncError::InvalidComparisonType(v.kind())),
        _ => Ok(()),
    }
}

/// Equality of two comparable operands.
fn equal(a: &Value, b: &Value) -> Result<bool, FuncError>
{
    let eq = match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Nil, _) | (_, Value::Nil) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Uint(x), Value::Uint(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Int(x), Value::Uint(y)) | (Value::Uint(y), Value::Int(x)) => {
            u64::try_from(*x).is_ok_and(|x| x == *y)
        },
        _ => return Err(FuncError::IncompatibleTypes(a.kind(), b.kind())),
    };
    Ok(eq)
}

/// Ordering of two operands; `None` when unordered (NaN).
fn order(a: &Value, b: &Value) -> Result<Option<Ordering>, FuncError>
{
    for v in [a, b] {
        match v.kind() {
            Kind::Nil | Kind::Bool | Kind::List | Kind::Map | Kind::Func => {
                return Err(FuncError::InvalidComparisonType(v.kind()));
            },
            _ => {},
        }
    }

    let ord = match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Uint(x), Value::Uint(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Uint(y)) => Some(match u64::try_from(*x) {
            Ok(x) => x.cmp(y),
            Err(_) => Ordering::Less,
        }),
        (Value::Uint(x), Value::Int(y)) => Some(match u64::try_from(*y) {
            Ok(y) => x.cmp(&y),
            Err(_) => Ordering::Greater,
        }),
        _ => return Err(FuncError::IncompatibleTypes(a.kind(), b.kind())),
    };
    Ok(ord)
}

fn less(a: &Value, b: &Value) -> Result<bool, FuncError>
{
    Ok(order(a, b)? == Some(Ordering::Less))
}

/// `eq a b c ...` is true if `a` equals any of the remaining arguments.
pub(crate) fn eq(args: &[Value]) -> Result<Value, FuncError>
{
    let (first, rest) = args.split_first()
        .ok_or_else(|| FuncError::BadArgument("missing argument for comparison".into()))?;
    comparable(first)?;

    for other in rest {
        comparable(other)?;
        if equal(first, other)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

pub(crate) fn ne(args: &[Value]) -> Result<Value, FuncError>
{
    let eq = eq(args)?;
    Ok(Value::Bool(!eq.is_truthy()))
}

pub(crate) fn lt(args: &[Value]) -> Result<Value, FuncError>
{
    Ok(Value::Bool(less(&args[0], &args[1])?))
}

pub(crate) fn le(args: &[Value]) -> Result<Value, FuncError>
{
    let le = less(&args[0], &args[1])? || equal(&args[0], &args[1])?;
    Ok(Value::Bool(le))
}

pub(crate) fn gt(args: &[Value]) -> Result<Value, FuncError>
{
    let le = le(args)?;
    Ok(Value::Bool(!le.is_truthy()))
}

pub(crate) fn ge(args: &[Value]) -> Result<Value, FuncError>
{
    Ok(Value::Bool(!less(&args[0], &args[1])?))
}
