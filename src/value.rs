//! # value.rs
//!
//! The closed set of values that flow through template actions and into
//! functions.
//!
//! Builtins dispatch on [`Kind`] rather than on anything dynamic, so every
//! unsupported operand combination ends up in an explicit failure path.

use std::collections::BTreeMap;
use std::fmt;

use crate::function::Function;

/// A template value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A function value, invocable through the `call` builtin.
    Func(Function),
}

/// The category of a [`Value`], used for dispatch and in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    List,
    Map,
    Func,
}

impl fmt::Display for Kind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Nil => "nil",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Str => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Func => "func",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Func(_) => Kind::Func,
        }
    }

    /// Reports whether the value counts as true in `and`, `or` and `not`.
    ///
    /// Zero numbers, empty containers, `false` and `Nil` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Uint(u) => *u != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Func(_) => true,
        }
    }

    /// Returns the string slice if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Interprets the value as a signed integer index, if it is integral.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Uint(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Builds a map value from key/value pairs.
    pub fn map<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(items.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Builds a list value.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl PartialEq for Value {
    /// Structural equality. Function values compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a.same_callable(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("<no value>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            },
            Value::Map(map) => {
                f.write_str("map[")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}:{val}")?;
                }
                f.write_str("]")
            },
            Value::Func(func) => write!(f, "<func {}>", func.name()),
        }
    }
}

macro_rules! impl_from_value {
    ( $( $ty:ty => $variant:ident as $target:ty ), + $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self { Value::$variant(<$target>::from(v)) }
            }
        )+
    };
}

impl_from_value!(
    bool    => Bool     as bool,
    i8      => Int      as i64,
    i16     => Int      as i64,
    i32     => Int      as i64,
    i64     => Int      as i64,
    u8      => Uint     as u64,
    u16     => Uint     as u64,
    u32     => Uint     as u64,
    u64     => Uint     as u64,
    f32     => Float    as f64,
    f64     => Float    as f64,
    String  => Str      as String,
    &str    => Str      as String,
);

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self { Value::List(v) }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self { Value::Map(v) }
}

impl From<Function> for Value {
    fn from(v: Function) -> Self { Value::Func(v) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map_or(Value::Nil, Into::into) }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Value::Nil.kind(), Kind::Nil);
        assert_eq!(Value::from(3).kind(), Kind::Int);
        assert_eq!(Value::from(3u32).kind(), Kind::Uint);
        assert_eq!(Value::from("x").kind(), Kind::Str);
        assert_eq!(Value::list([1, 2]).kind(), Kind::List);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::from("a").is_truthy());
        assert!(Value::map([("k", 1)]).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Nil.to_string(), "<no value>");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::list([1, 2, 3]).to_string(), "[1 2 3]");
        assert_eq!(Value::map([("b", 2), ("a", 1)]).to_string(), "map[a:1 b:2]");
    }

    #[test]
    fn test_as_index() {
        assert_eq!(Value::from(4).as_index(), Some(4));
        assert_eq!(Value::from(4u8).as_index(), Some(4));
        assert_eq!(Value::from(u64::MAX).as_index(), None);
        assert_eq!(Value::from("4").as_index(), None);
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i32>), Value::Nil);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
