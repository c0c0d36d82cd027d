//! # template.rs
//!
//! A named collection of parsed templates sharing one registration scope.
//!
//! The registration scope accepts functions until the first template is
//! parsed. From then on it is frozen and shared read-only by every
//! execution, which is what makes concurrent execution safe without locks.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ExecError, OptionError, ParseError, RegisterError};
use crate::exec;
use crate::function::Function;
use crate::options::Options;
use crate::parser::{self, Tree};
use crate::resolver::ScopeChain;
use crate::scope::Scope;
use crate::value::Value;

/// Parsed templates together with the functions they may call.
///
/// # Examples
///
/// ```
/// use tmplfunc::{Arity, Function, TemplateSet, Value};
///
/// let mut set = TemplateSet::new("page");
/// set.register("shout", Function::infallible(Arity::Exact(1), |args| {
///     Value::from(args[0].to_string().to_uppercase())
/// })).unwrap();
/// set.parse("hello", "{{ .Name | shout }}!").unwrap();
///
/// let data = Value::map([("Name", "ann")]);
/// assert_eq!(set.execute("hello", &data).unwrap(), "ANN!");
/// ```
#[derive(Debug)]
pub struct TemplateSet {
    name: String,
    options: Options,
    funcs: Scope,
    trees: HashMap<String, Arc<Tree>>,
}

impl TemplateSet {
    /// Creates an empty set with default options.
    pub fn new(name: &str) -> Self {
        Self::from_parts(name, Options::default(), Scope::registration(name))
    }

    pub(crate) fn from_parts(name: &str, options: Options, funcs: Scope) -> Self {
        Self {
            name: name.to_string(),
            options,
            funcs,
            trees: HashMap::new(),
        }
    }

    /// The set's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The registration scope.
    pub fn funcs(&self) -> &Scope {
        &self.funcs
    }

    /// Applies one `key=value` option. See [`Options::apply`].
    pub fn option(&mut self, option: &str) -> Result<&mut Self, OptionError> {
        self.options.apply(option)?;
        Ok(self)
    }

    /// Registers `func` under `name`, replacing any earlier registration.
    ///
    /// Returns the replaced function, if there was one.
    ///
    /// # Errors
    ///
    /// Fails with [`RegisterError::Frozen`] once a template has been parsed,
    /// and with the validation errors of [`Scope::register`].
    pub fn register(&mut self, name: &str, func: Function) -> Result<Option<Function>, RegisterError>
    {
        let previous = self.funcs.register(name, func)?;
        if previous.is_some() && self.options.warn_on_overwrite {
            log::warn!("template set {:?}: function {:?} registered twice, last one wins", self.name, name);
        }
        Ok(previous)
    }

    /// Parses `text` and stores it as template `name`.
    ///
    /// The first parse freezes the registration scope. Every function name
    /// used by the template must then resolve against the registration scope
    /// or the builtins, unless `funccheck=skip` is set.
    pub fn parse(&mut self, name: &str, text: &str) -> Result<&mut Self, ParseError>
    {
        if self.trees.contains_key(name) {
            return Err(ParseError::Redefined(name.to_string()));
        }
        self.funcs.freeze();

        let tree = parser::parse(name, text, &self.options, &self.funcs)?;
        log::debug!("template set {:?}: parsed {:?}", self.name, name);
        self.trees.insert(name.to_string(), Arc::new(tree));
        Ok(self)
    }

    /// Looks up a parsed template.
    pub fn lookup(&self, name: &str) -> Option<&Tree> {
        self.trees.get(name).map(Arc::as_ref)
    }

    /// Names of the parsed templates, sorted.
    pub fn templates(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Renders template `name` with `data`.
    pub fn execute(&self, name: &str, data: &Value) -> Result<String, ExecError> {
        self.render(name, data, None)
    }

    /// Renders template `name` with `data`, resolving names through `funcs`
    /// before the registration scope.
    ///
    /// `funcs` lives only for this call; nothing it contains is visible to
    /// other executions.
    pub fn execute_with(&self, name: &str, data: &Value, funcs: Scope) -> Result<String, ExecError> {
        self.render(name, data, Some(&funcs))
    }

    fn render(&self, name: &str, data: &Value, exec_funcs: Option<&Scope>) -> Result<String, ExecError>
    {
        let tree = self
            .trees
            .get(name)
            .ok_or_else(|| ExecError::NoSuchTemplate(name.to_string()))?;
        let chain = ScopeChain::new().with_optional(exec_funcs).with(&self.funcs);

        let mut out = String::new();
        exec::execute(tree, chain, &self.options, data, &mut out).inspect_err(|err| {
            log::debug!("template set {:?}: executing {:?} failed: {err}", self.name, name);
        })?;
        Ok(out)
    }
}

impl Clone for TemplateSet {
    /// Copies the set. The copy's registration scope is mutable again and
    /// independent of this one; parsed templates are shared.
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            options: self.options.clone(),
            funcs: self.funcs.clone(),
            trees: self.trees.clone(),
        }
    }
}
