//! Top-level functions module.
//!
//! This module groups the engine-provided functions. It provides:
//!
//! - `builtin`: the literal table of builtin names and the constructor of the
//!   builtin scope.
//! - `logic`: `and`, `or`, `not` and the dynamic `call` helper.
//! - `compare`: `eq`, `ne`, `lt`, `le`, `gt`, `ge` over the basic kinds.
//! - `escape`: `html`, `js` and `urlquery`.
//! - `collection`: `len`, `index` and `slice`.
//! - `format`: `print`, `printf` and `println`.
//!
//! Nothing here is built eagerly. The name queries below answer from the
//! static table without constructing the builtin scope.
pub(crate) mod builtin;
pub(crate) mod collection;
pub(crate) mod compare;
pub(crate) mod escape;
pub(crate) mod format;
pub(crate) mod logic;

/// Return the available builtin function names.
///
/// The slice is static and intended for use by error messages or
/// autocompletion.
pub fn names() -> &'static [&'static str]
{
    builtin::FuncKind::available_names()
}

/// Reports whether `name` is one of the builtin functions.
pub fn is_builtin(name: &str) -> bool
{
    name.parse::<builtin::FuncKind>().is_ok()
}

#[cfg(test)]
mod names_tests {
    use super::*;

    #[test]
    fn test_names() {
        for name in ["and", "or", "not", "call", "eq", "ne", "lt", "le", "gt", "ge",
                     "html", "js", "urlquery", "len", "index", "slice",
                     "print", "printf", "println"] {
            assert!(names().contains(&name), "missing builtin {name}");
            assert!(is_builtin(name));
        }
        assert!(!is_builtin("greet"));
    }
}
