//! # function.rs
//!
//! Function entries: a callable plus the arity it declares.
//!
//! A callable comes in one of two shapes:
//!  - a plain call taking the evaluated arguments, or
//!  - a state-aware call that also receives the [`ExecState`] of the
//!    execution it runs in.
//!
//! Both shapes return either a single value or a [`FuncError`].

use std::sync::Arc;

use crate::error::FuncError;
use crate::exec::ExecState;
use crate::value::Value;

type PlainFn = dyn Fn(&[Value]) -> Result<Value, FuncError> + Send + Sync;
type StatefulFn = dyn Fn(&mut ExecState<'_>, &[Value]) -> Result<Value, FuncError> + Send + Sync;

/// Number of arguments a function accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// `n` or more arguments.
    AtLeast(usize),
    /// Between `min` and `max` arguments, inclusive.
    Range(usize, usize),
}

impl Arity {
    /// Any number of arguments, including none.
    pub const VARIADIC: Arity = Arity::AtLeast(0);

    /// Reports whether `n` arguments satisfy this arity.
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(want) => n == want,
            Arity::AtLeast(min) => n >= min,
            Arity::Range(min, max) => (min..=max).contains(&n),
        }
    }

    /// Checks that the arity describes a non-empty set of argument counts.
    pub(crate) fn validate(&self) -> Result<(), String> {
        match *self {
            Arity::Range(min, max) if min > max => {
                Err(format!("minimum {min} exceeds maximum {max}"))
            },
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Arity
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::Range(min, max) => write!(f, "{min} to {max}"),
        }
    }
}

#[derive(Clone)]
enum Callable {
    Plain(Arc<PlainFn>),
    Stateful(Arc<StatefulFn>),
}

/// A named callable usable from template actions.
///
/// Cloning is cheap: the callable itself is reference counted, so clones
/// share it.
///
/// # Examples
///
/// ```
/// use tmplfunc::{Arity, Function, Value};
///
/// let double = Function::new(Arity::Exact(1), |args| match &args[0] {
///     Value::Int(i) => Ok(Value::Int(i * 2)),
///     other => Ok(other.clone()),
/// });
/// assert_eq!(double.invoke(&[Value::Int(21)]).unwrap(), Value::Int(42));
/// ```
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: Arity,
    callable: Callable,
}

impl Function {
    /// Creates a plain function that may fail.
    pub fn new<F>(arity: Arity, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        Self {
            name: String::new(),
            arity,
            callable: Callable::Plain(Arc::new(func)),
        }
    }

    /// Creates a plain function that always produces a value.
    pub fn infallible<F>(arity: Arity, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::new(arity, move |args| Ok(func(args)))
    }

    /// Creates a function that also sees the state of the running execution.
    pub fn stateful<F>(arity: Arity, func: F) -> Self
    where
        F: Fn(&mut ExecState<'_>, &[Value]) -> Result<Value, FuncError> + Send + Sync + 'static,
    {
        Self {
            name: String::new(),
            arity,
            callable: Callable::Stateful(Arc::new(func)),
        }
    }

    /// Returns a copy labelled with `name`.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// The name the function was registered under, or `""` if none yet.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared arity.
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Reports whether the callable wants the execution state.
    pub fn is_stateful(&self) -> bool {
        matches!(self.callable, Callable::Stateful(_))
    }

    /// Invokes the function inside an execution.
    ///
    /// # Errors
    ///
    /// Returns [`FuncError::WrongArgCount`] if `args` does not satisfy the
    /// arity, otherwise whatever the callable reports.
    pub fn call(&self, state: &mut ExecState<'_>, args: &[Value]) -> Result<Value, FuncError>
    {
        if !self.arity.accepts(args.len()) {
            return Err(FuncError::WrongArgCount {
                want: self.arity.to_string(),
                got: args.len(),
            });
        }

        match &self.callable {
            Callable::Plain(func) => func(args),
            Callable::Stateful(func) => func(state, args),
        }
    }

    /// Invokes the function outside any template, with a throwaway state.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, FuncError>
    {
        let mut state = ExecState::detached();
        self.call(&mut state, args)
    }

    /// Reports whether both values share one callable.
    pub(crate) fn same_callable(&self, other: &Self) -> bool {
        match (&self.callable, &other.callable) {
            (Callable::Plain(a), Callable::Plain(b)) => Arc::ptr_eq(a, b),
            (Callable::Stateful(a), Callable::Stateful(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("stateful", &self.is_stateful())
            .finish_non_exhaustive()
    }
}

/// Reports whether `name` may be used as a function name.
///
/// Names are non-empty, start with a letter or `_`, and continue with
/// letters, digits or `_`.
pub fn is_valid_name(name: &str) -> bool
{
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {},
        _ => return false,
    }
    chars.all(|ch| ch.is_alphanumeric() || ch == '_')
}
