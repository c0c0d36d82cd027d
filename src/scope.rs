//! # scope.rs
//!
//! Named collections of function entries.
//!
//! A `Scope` is mutable until it is frozen. Freezing is one-way: a frozen
//! scope can only be read, and the only route back to a mutable table is
//! [`Clone`], which always produces a fresh mutable copy.

use std::collections::HashMap;

use crate::error::RegisterError;
use crate::function::{is_valid_name, Function};

/// Lifecycle class of a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// The engine's fixed function set.
    Builtin,
    /// Functions registered on a template set before parsing.
    Registration,
    /// Functions supplied to a single execution.
    Execution,
}

/// A name-unique table of functions.
///
/// # Examples
///
/// ```
/// use tmplfunc::{Arity, Function, Scope, Value};
///
/// let mut scope = Scope::registration("app");
/// scope.register("greet", Function::infallible(Arity::Exact(0), |_| Value::from("hi")))
///     .unwrap();
/// assert!(scope.contains("greet"));
///
/// scope.freeze();
/// assert!(scope.register("other", Function::infallible(Arity::Exact(0), |_| Value::Nil)).is_err());
/// ```
pub struct Scope {
    name: String,
    kind: ScopeKind,
    table: HashMap<String, Function>,
    frozen: bool,
}

impl Scope {
    fn new(name: &str, kind: ScopeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            table: HashMap::new(),
            frozen: false,
        }
    }

    /// Creates an empty, mutable registration scope.
    pub fn registration(name: &str) -> Self {
        Self::new(name, ScopeKind::Registration)
    }

    /// Creates an empty, mutable execution scope.
    pub fn execution(name: &str) -> Self {
        Self::new(name, ScopeKind::Execution)
    }

    /// Creates the builtin scope from its entries. The result is frozen.
    pub(crate) fn builtin<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Function)>,
    {
        let mut scope = Self::new("builtin", ScopeKind::Builtin);
        scope.table = entries
            .into_iter()
            .map(|(name, func)| (name.to_string(), func.named(name)))
            .collect();
        scope.frozen = true;
        scope
    }

    /// Adds `func` under `name`.
    ///
    /// If the name already exists in this scope the previous function is
    /// replaced and returned.
    ///
    /// # Errors
    ///
    /// - [`RegisterError::InvalidName`] if `name` is not an identifier.
    /// - [`RegisterError::InvalidArity`] if the declared arity admits no
    ///   argument count.
    /// - [`RegisterError::Frozen`] if the scope no longer accepts entries.
    pub fn register(&mut self, name: &str, func: Function) -> Result<Option<Function>, RegisterError>
    {
        if self.frozen {
            return Err(RegisterError::Frozen {
                name: name.to_string(),
                scope: self.name.clone(),
            });
        }
        if !is_valid_name(name) {
            return Err(RegisterError::InvalidName(name.to_string()));
        }
        func.arity().validate().map_err(|reason| RegisterError::InvalidArity {
            name: name.to_string(),
            reason,
        })?;

        let previous = self.table.insert(name.to_string(), func.named(name));
        if previous.is_some() {
            log::debug!("scope {:?}: replaced function {:?}", self.name, name);
        }
        Ok(previous)
    }

    /// Registers every pair, stopping at the first rejection.
    pub fn extend<I, S>(&mut self, items: I) -> Result<(), RegisterError>
    where
        I: IntoIterator<Item = (S, Function)>,
        S: AsRef<str>,
    {
        for (name, func) in items {
            self.register(name.as_ref(), func)?;
        }
        Ok(())
    }

    /// Looks up `name` in this scope only.
    pub fn get(&self, name: &str) -> Option<&Function> {
        self.table.get(name)
    }

    /// Reports whether `name` is present in this scope.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Makes the scope read-only. Freezing twice is harmless.
    pub fn freeze(&mut self) {
        if !self.frozen {
            log::debug!("scope {:?}: frozen with {} function(s)", self.name, self.table.len());
            self.frozen = true;
        }
    }

    /// Reports whether registration is still accepted.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The scope's label, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scope's lifecycle class.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Returns the number of functions in the scope.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns true if the scope holds no functions.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterates over the registered names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

impl Clone for Scope {
    /// Copies the entries into a new, mutable scope.
    ///
    /// A builtin scope clones into a registration scope, since the builtin
    /// table itself is never modified.
    fn clone(&self) -> Self {
        let kind = match self.kind {
            ScopeKind::Builtin => ScopeKind::Registration,
            kind => kind,
        };
        Self {
            name: self.name.clone(),
            kind,
            table: self.table.clone(),
            frozen: false,
        }
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("frozen", &self.frozen)
            .field("functions", &names)
            .finish()
    }
}
