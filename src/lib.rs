//! # tmplfunc
//!
//! `tmplfunc` is the function layer of a small text templating engine:
//! it decides, for every function name a template uses, which callable
//! that name means.
//!
//! ## Overview
//! - A fixed set of **builtin functions** (`and`, `eq`, `printf`, `index`, ...)
//!   that is constructed lazily, at most once per process, and only if some
//!   lookup actually falls through to it.
//! - **Registration scopes** owned by a [`TemplateSet`], which accept functions
//!   until the first template is parsed and are read-only afterwards.
//! - **Execution scopes** passed to a single execution, which shadow
//!   everything else for that execution only.
//! - A **resolver** that walks `[execution, registration, builtins]` and
//!   returns the first hit.
//!
//! Templates are lexed and parsed into a tree; names are checked at parse
//! time against the registration scope and the builtins, and resolved again
//! at execution time when an execution scope may be present.
//!
//! ## Example
//! ```rust
//! use tmplfunc::{Arity, Function, Scope, TemplateSet, Value};
//!
//! let mut set = TemplateSet::new("mail");
//! set.register("greeting", Function::infallible(Arity::Exact(0), |_| Value::from("Hello")))
//!     .unwrap();
//! set.parse("body", "{{ greeting }}, {{ .Name | html }}!").unwrap();
//!
//! let data = Value::map([("Name", "<Ann>")]);
//! assert_eq!(set.execute("body", &data).unwrap(), "Hello, &lt;Ann&gt;!");
//!
//! // Shadow a function for one execution only.
//! let mut request = Scope::execution("request");
//! request
//!     .register("greeting", Function::infallible(Arity::Exact(0), |_| Value::from("Hi")))
//!     .unwrap();
//! assert_eq!(set.execute_with("body", &data, request).unwrap(), "Hi, &lt;Ann&gt;!");
//! assert_eq!(set.execute("body", &data).unwrap(), "Hello, &lt;Ann&gt;!");
//! ```
//!
//! ## Example: Listing the Builtins
//! ```rust
//! let names: &[&str] = tmplfunc::functions::names();
//! assert!(names.contains(&"printf"));
//! assert!(tmplfunc::functions::is_builtin("eq"));
//! ```
//!
//! ## License
//! Licensed under either **MIT** or **Apache-2.0** at your option.

mod lexer;
pub mod builder;
pub mod cache;
pub mod error;
pub mod exec;
pub mod function;
pub mod functions;
pub mod options;
pub mod parser;
pub mod resolver;
pub mod scope;
pub mod template;
pub mod value;

pub use builder::Builder;
pub use error::{Error, ExecError, FuncError, OptionError, ParseError, Position, RegisterError};
pub use exec::ExecState;
pub use function::{Arity, Function};
pub use options::{MissingKey, Options};
pub use resolver::{resolve, ScopeChain};
pub use scope::{Scope, ScopeKind};
pub use template::TemplateSet;
pub use value::{Kind, Value};

/// Parses `text` as a one-off template and renders it with `data`.
///
/// Only builtin functions are available. For repeated rendering, parse once
/// into a [`TemplateSet`] instead.
///
/// # Example
/// ```rust
/// use tmplfunc::{render, Value};
///
/// let data = Value::map([("Items", Value::list([1, 2, 3]))]);
/// let out = render("{{ len .Items }} items, first {{ index .Items 0 }}", &data).unwrap();
/// assert_eq!(out, "3 items, first 1");
/// ```
pub fn render(text: &str, data: &Value) -> Result<String, Error>
{
    const NAME: &str = "render";
    let mut set = TemplateSet::new(NAME);
    set.parse(NAME, text)?;
    Ok(set.execute(NAME, data)?)
}

#[cfg(test)]
mod render_test {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(render("just text", &Value::Nil).unwrap(), "just text");
    }

    #[test]
    fn test_dot_and_builtins() {
        assert_eq!(render("{{ . }} {{ not . }}", &Value::Bool(false)).unwrap(), "false true");
        assert_eq!(render("{{ printf \"%05.1f\" 3.14159 }}", &Value::Nil).unwrap(), "003.1");
    }

    #[test]
    fn test_oversized_printf_directive() {
        let out = render("{{ printf \"%99999999999999999999999d\" 1 }}", &Value::Nil).unwrap();
        assert_eq!(out, "%!(BADWIDTH)1");
    }

    #[test]
    fn test_parse_failure() {
        let err = render("{{ nope }}", &Value::Nil).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::UndefinedFunction { ref name, .. }) if name == "nope"));
    }

    #[test]
    fn test_exec_failure() {
        let err = render("{{ index . 5 }}", &Value::list([1])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "template: render:1:4: error calling index: index out of range: 5 (length 1)",
        );
    }
}
