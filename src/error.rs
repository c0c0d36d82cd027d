//! # error.rs
//!
//! Error types for every stage a function name passes through: registration,
//! parse-time resolution, execution-time resolution and the value-level
//! failures raised by the callables themselves.

use thiserror::Error;

use crate::value::Kind;

/// Line and column (both 1-based) of a location in template source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// Computes the position of byte `offset` within `source`.
    pub fn locate(source: &str, offset: usize) -> Self
    {
        let offset = offset.min(source.len());
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let col = match before.rfind('\n') {
            Some(nl) => before[nl + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self { line, col }
    }
}

impl std::fmt::Display for Position
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A failure reported by a callable for the operands it was given.
///
/// These never come from the resolver; a name that resolved fine can still
/// fail here when it is invoked.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FuncError {
    #[error("incompatible types for comparison: {0} and {1}")]
    IncompatibleTypes(Kind, Kind),
    #[error("invalid type for comparison: {0}")]
    InvalidComparisonType(Kind),
    #[error("index out of range: {index} (length {len})")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("can't index item of type {0}")]
    NotIndexable(Kind),
    #[error("cannot index {container} with {key}")]
    BadIndexType { container: Kind, key: Kind },
    #[error("can't slice item of type {0}")]
    NotSliceable(Kind),
    #[error("invalid slice index: {0}")]
    InvalidSliceIndex(String),
    #[error("len of type {0}")]
    NoLength(Kind),
    #[error("non-function {0} passed to call")]
    NotAFunction(Kind),
    #[error("wrong number of args: want {want}, got {got}")]
    WrongArgCount { want: String, got: usize },
    #[error("{0}")]
    BadArgument(String),
    #[error("error calling {name}: {source}")]
    Nested { name: String, source: Box<FuncError> },
}

/// Rejection of a function at registration time.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    #[error("function name {0:?} is not a valid identifier")]
    InvalidName(String),
    #[error("function {name:?} declares an invalid arity: {reason}")]
    InvalidArity { name: String, reason: String },
    #[error("cannot register {name:?}: scope {scope:?} is frozen")]
    Frozen { name: String, scope: String },
}

/// Failure to turn template text into a tree.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("template: {template}:{pos}: function {name:?} not defined")]
    UndefinedFunction { template: String, name: String, pos: Position },
    #[error("template: {template}:{pos}: {message}")]
    Syntax { template: String, message: String, pos: Position },
    #[error("template: {template}: unclosed action starting at {pos}")]
    UnclosedAction { template: String, pos: Position },
    #[error("template: {0}: redefinition of template")]
    Redefined(String),
}

/// Failure while rendering a parsed template.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExecError {
    #[error("template: {0:?} is undefined")]
    NoSuchTemplate(String),
    #[error("template: {template}:{pos}: function {name:?} not defined")]
    UndefinedFunction { template: String, name: String, pos: Position },
    #[error("template: {template}:{pos}: error calling {name}: {source}")]
    Call { template: String, name: String, pos: Position, source: FuncError },
    #[error("template: {template}:{pos}: can't evaluate field {field} in type {kind}")]
    Field { template: String, field: String, kind: Kind, pos: Position },
    #[error("template: {template}:{pos}: map has no entry for key {key:?}")]
    MissingKey { template: String, key: String, pos: Position },
    #[error("template: {template}:{pos}: {message}")]
    Other { template: String, message: String, pos: Position },
}

/// An option string that could not be applied.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("unrecognized option: {0:?}")]
    Unknown(String),
    #[error("unrecognized value {value:?} for option {key:?}")]
    BadValue { key: String, value: String },
}

/// Any failure of the one-shot [`render`](crate::render) helper.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Register(#[from] RegisterError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Exec(#[from] ExecError),
    #[error(transparent)]
    Options(#[from] OptionError),
}
