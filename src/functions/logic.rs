//! # logic.rs
//!
//! Boolean helpers and the dynamic call helper.

use crate::error::FuncError;
use crate::exec::ExecState;
use crate::value::Value;

/// Returns the first falsy argument, or the last argument.
pub(crate) fn and(args: &[Value]) -> Value
{
    args.iter()
        .find(|arg| !arg.is_truthy())
        .or_else(|| args.last())
        .cloned()
        .unwrap_or_default()
}

/// Returns the first truthy argument, or the last argument.
pub(crate) fn or(args: &[Value]) -> Value
{
    args.iter()
        .find(|arg| arg.is_truthy())
        .or_else(|| args.last())
        .cloned()
        .unwrap_or_default()
}

/// Returns the boolean negation of the argument's truthiness.
pub(crate) fn not(args: &[Value]) -> Value
{
    Value::Bool(!args[0].is_truthy())
}

/// Calls the function value in the first argument with the rest.
///
/// The callee runs inside the caller's execution, so a state-aware callee
/// sees the same request state.
pub(crate) fn call(state: &mut ExecState<'_>, args: &[Value]) -> Result<Value, FuncError>
{
    let (callee, rest) = args.split_first()
        .ok_or_else(|| FuncError::BadArgument("call of nil".into()))?;

    match callee {
        Value::Func(func) => func.call(state, rest).map_err(|err| FuncError::Nested {
            name: func.name().to_string(),
            source: Box::new(err),
        }),
        Value::Nil => Err(FuncError::BadArgument("call of nil".into())),
        other => Err(FuncError::NotAFunction(other.kind())),
    }
}
