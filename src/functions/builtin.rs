//! # builtin.rs
//!
//! The fixed set of engine-provided functions.
//!
//! The table is described once, as a literal list of `name => function`
//! pairs. From that list the macro derives the static name list (usable
//! without building anything) and the constructor of the builtin scope,
//! which is only ever called through [`crate::cache`].

use super::{collection, compare, escape, format, logic};
use crate::function::{Arity, Function};
use crate::scope::Scope;

/// Error type for parsing builtin function names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParseBuiltinError {
    /// The name is not one of the builtins.
    UnknownFunction,
}

macro_rules! define_functions {
    ( $( $name:ident => $imp:expr ), + $(,)? ) => {
        /// Enumeration of the builtin functions.
        #[allow(non_camel_case_types)] // To use ident as string to compare them.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub(crate) enum FuncKind {
            $( $name ), +
        }

        impl FuncKind {
            /// Returns the list of builtin names.
            pub(crate) fn available_names() -> &'static [&'static str]
            {
                &[ $( stringify!($name) ),+ ]
            }

            /// Returns the name of this builtin.
            pub(crate) fn name(&self) -> &'static str
            {
                match self {
                    $( FuncKind::$name => stringify!($name), )+
                }
            }

            /// Builds the function for this builtin.
            pub(crate) fn function(&self) -> Function
            {
                match self {
                    $( FuncKind::$name => $imp, )+
                }
            }

            fn all() -> &'static [FuncKind]
            {
                &[ $( FuncKind::$name ),+ ]
            }
        }

        impl std::str::FromStr for FuncKind {
            type Err = ParseBuiltinError;

            fn from_str(s: &str) -> Result<Self, Self::Err>
            {
                match s {
                    $(
                        stringify!($name) => Ok(Self::$name),
                    )+
                    _ => Err(ParseBuiltinError::UnknownFunction),
                }
            }
        }
    };
}

define_functions!(
    and         => Function::infallible(Arity::AtLeast(1), logic::and),
    or          => Function::infallible(Arity::AtLeast(1), logic::or),
    not         => Function::infallible(Arity::Exact(1), logic::not),
    call        => Function::stateful(Arity::AtLeast(1), logic::call),
    eq          => Function::new(Arity::AtLeast(2), compare::eq),
    ne          => Function::new(Arity::Exact(2), compare::ne),
    lt          => Function::new(Arity::Exact(2), compare::lt),
    le          => Function::new(Arity::Exact(2), compare::le),
    gt          => Function::new(Arity::Exact(2), compare::gt),
    ge          => Function::new(Arity::Exact(2), compare::ge),
    html        => Function::infallible(Arity::VARIADIC, escape::html),
    js          => Function::infallible(Arity::VARIADIC, escape::js),
    urlquery    => Function::infallible(Arity::VARIADIC, escape::urlquery),
    len         => Function::new(Arity::Exact(1), collection::len),
    index       => Function::new(Arity::AtLeast(1), collection::index),
    slice       => Function::new(Arity::Range(1, 4), collection::slice),
    print       => Function::infallible(Arity::VARIADIC, format::print),
    printf      => Function::new(Arity::AtLeast(1), format::printf),
    println     => Function::infallible(Arity::VARIADIC, format::println),
);

/// Constructs the complete builtin scope.
///
/// Every call builds a new table; callers go through
/// [`crate::cache::builtins`] so this runs at most once per process.
pub(crate) fn build() -> Scope
{
    Scope::builtin(FuncKind::all().iter().map(|kind| (kind.name(), kind.function())))
}

#[cfg(test)]
mod builtin_tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_names_match_kinds() {
        let names = FuncKind::available_names();
        assert_eq!(names.len(), FuncKind::all().len());
        for name in names {
            let kind: FuncKind = name.parse().unwrap();
            assert_eq!(kind.name(), *name);
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!("nope".parse::<FuncKind>(), Err(ParseBuiltinError::UnknownFunction));
    }

    #[test]
    fn test_build_is_complete_and_frozen() {
        let scope = build();
        assert!(scope.is_frozen());
        assert_eq!(scope.len(), FuncKind::available_names().len());
        for name in FuncKind::available_names() {
            assert_eq!(scope.get(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_declared_arities() {
        let scope = build();
        assert_eq!(scope.get("not").unwrap().arity(), Arity::Exact(1));
        assert_eq!(scope.get("slice").unwrap().arity(), Arity::Range(1, 4));
        assert!(scope.get("call").unwrap().is_stateful());
    }

    #[test]
    fn test_eq_through_table() {
        let scope = build();
        let eq = scope.get("eq").unwrap();
        assert_eq!(eq.invoke(&[Value::from(3), Value::from(3)]).unwrap(), Value::Bool(true));
        assert!(eq.invoke(&[Value::from(3), Value::from("3")]).is_err());
    }
}
