//! # builder.rs
//!
//! This module provides a fluent way to configure a [`TemplateSet`] before
//! its first template is parsed.

use crate::error::{OptionError, ParseError, RegisterError};
use crate::function::Function;
use crate::options::Options;
use crate::scope::Scope;
use crate::template::TemplateSet;

pub struct Builder
{
    name: String,
    options: Options,
    funcs: Scope,
}

impl Builder
{
    /// Creates a new `Builder` for a set called `name`.
    ///
    /// You can chain methods like `with_delims` and `with_function` to
    /// configure the set before calling `build` or `parse`.
    ///
    /// # Examples
    /// ```rust
    /// use tmplfunc::{Builder, Value};
    ///
    /// let set = Builder::new("page")
    ///     .parse("t", "{{ len . }}")
    ///     .expect("Failed to parse template");
    /// assert_eq!(set.execute("t", &Value::from("abc")).unwrap(), "3");
    /// ```
    pub fn new(name: &str) -> Self
    {
        Self {
            name: name.to_string(),
            options: Options::default(),
            funcs: Scope::registration(name),
        }
    }

    /// Replaces every option at once.
    pub fn with_options(mut self, options: Options) -> Self
    {
        self.options = options;
        self
    }

    /// Applies one `key=value` option such as `missingkey=error`.
    pub fn with_option(mut self, option: &str) -> Result<Self, OptionError>
    {
        self.options.apply(option)?;
        Ok(self)
    }

    /// Sets the action delimiters. An empty string keeps the default.
    ///
    /// # Examples
    /// ```rust
    /// use tmplfunc::{Builder, Value};
    ///
    /// let set = Builder::new("page")
    ///     .with_delims("<%", "%>")
    ///     .parse("t", "{{ <% print 1 %> }}")
    ///     .unwrap();
    /// assert_eq!(set.execute("t", &Value::Nil).unwrap(), "{{ 1 }}");
    /// ```
    pub fn with_delims(mut self, left: &str, right: &str) -> Self
    {
        let defaults = Options::default();
        self.options.left_delim = if left.is_empty() { defaults.left_delim } else { left.to_string() };
        self.options.right_delim = if right.is_empty() { defaults.right_delim } else { right.to_string() };
        self
    }

    /// Registers one function.
    ///
    /// # Examples
    /// ```rust
    /// use tmplfunc::{Arity, Builder, Function, Value};
    ///
    /// let set = Builder::new("page")
    ///     .with_function("double", Function::new(Arity::Exact(1), |args| {
    ///         Ok(Value::Int(args[0].as_index().unwrap_or(0) * 2))
    ///     }))
    ///     .unwrap()
    ///     .parse("t", "{{ double 21 }}")
    ///     .unwrap();
    /// assert_eq!(set.execute("t", &Value::Nil).unwrap(), "42");
    /// ```
    pub fn with_function(mut self, name: &str, func: Function) -> Result<Self, RegisterError>
    {
        if self.funcs.contains(name) && self.options.warn_on_overwrite {
            log::warn!("builder {:?}: function {:?} registered twice, last one wins", self.name, name);
        }
        self.funcs.register(name, func)?;
        Ok(self)
    }

    /// Registers every `(name, function)` pair in order.
    pub fn with_functions<I, S>(mut self, funcs: I) -> Result<Self, RegisterError>
    where
        I: IntoIterator<Item = (S, Function)>,
        S: AsRef<str>,
    {
        for (name, func) in funcs {
            self = self.with_function(name.as_ref(), func)?;
        }
        Ok(self)
    }

    /// Finishes configuration. The returned set still accepts registrations
    /// until its first parse.
    pub fn build(self) -> TemplateSet
    {
        TemplateSet::from_parts(&self.name, self.options, self.funcs)
    }

    /// Builds the set and parses one template into it.
    pub fn parse(self, name: &str, text: &str) -> Result<TemplateSet, ParseError>
    {
        let mut set = self.build();
        set.parse(name, text)?;
        Ok(set)
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::error::ExecError;
    use crate::function::Arity;
    use crate::options::MissingKey;
    use crate::value::Value;

    fn constant(v: &'static str) -> Function {
        Function::infallible(Arity::Exact(0), move |_| Value::from(v))
    }

    #[test]
    fn test_build_defaults() {
        let set = Builder::new("page").build();
        assert_eq!(set.name(), "page");
        assert_eq!(set.options(), &Options::default());
        assert!(set.funcs().is_empty());
        assert!(!set.funcs().is_frozen());
    }

    #[test]
    fn test_with_functions() {
        let set = Builder::new("page")
            .with_functions([("a", constant("A")), ("b", constant("B"))])
            .unwrap()
            .parse("t", "{{a}}{{b}}")
            .unwrap();
        assert_eq!(set.execute("t", &Value::Nil).unwrap(), "AB");
        assert!(set.funcs().is_frozen());
    }

    #[test]
    fn test_with_function_rejects_bad_name() {
        let err = Builder::new("page").with_function("not-ok", constant("x")).err();
        assert_eq!(err, Some(RegisterError::InvalidName("not-ok".into())));
    }

    #[test]
    fn test_later_registration_wins() {
        let set = Builder::new("page")
            .with_option("overwrite=warn")
            .unwrap()
            .with_function("who", constant("first"))
            .unwrap()
            .with_function("who", constant("second"))
            .unwrap()
            .parse("t", "{{who}}")
            .unwrap();
        assert_eq!(set.execute("t", &Value::Nil).unwrap(), "second");
    }

    #[test]
    fn test_with_options_and_delims() {
        let options = Options { missing_key: MissingKey::Error, ..Options::default() };
        let set = Builder::new("page")
            .with_options(options)
            .with_delims("[[", "")
            .parse("t", "[[ .Gone }}")
            .unwrap();
        assert_eq!(set.options().left_delim, "[[");
        assert_eq!(set.options().right_delim, "}}");
        assert!(matches!(set.execute("t", &Value::map([("A", 1)])), Err(ExecError::MissingKey { .. })));
    }

    #[test]
    fn test_with_options_empty_delims() {
        let options = Options { left_delim: String::new(), right_delim: String::new(), ..Options::default() };
        let set = Builder::new("page").with_options(options).parse("t", "abc {{ len \"xy\" }}").unwrap();
        assert_eq!(set.execute("t", &Value::Nil).unwrap(), "abc 2");
    }
}
