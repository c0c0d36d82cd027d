//! # resolver.rs
//!
//! Name resolution over an ordered chain of scopes.
//!
//! The chain is assembled at the moment of a lookup from whichever scopes
//! are in effect, highest priority first. The builtin scope is never part of
//! the list itself: it is consulted only after every active scope missed,
//! which is the only point where it may get constructed.

use smallvec::SmallVec;

use crate::cache;
use crate::function::Function;
use crate::scope::Scope;

/// Typical chains hold an execution and a registration scope.
const CHAIN_INLINE: usize = 4;

/// Where a resolved function was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin<'a> {
    /// The active scope at `index` in the chain, named `name`.
    Scope { index: usize, name: &'a str },
    /// The builtin scope.
    Builtin,
}

/// A successful resolution.
#[derive(Clone, Copy, Debug)]
pub struct Resolved<'a> {
    pub function: &'a Function,
    pub origin: Origin<'a>,
}

/// Resolves `name` against `scopes` in order, then the builtins.
///
/// Returns `None` when no scope defines the name. Lookup never modifies
/// any scope.
///
/// # Examples
///
/// ```
/// use tmplfunc::{resolve, Arity, Function, Scope, Value};
/// use tmplfunc::resolver::Origin;
///
/// let mut set = Scope::registration("set");
/// set.register("greet", Function::infallible(Arity::Exact(0), |_| Value::from("hi")))
///     .unwrap();
///
/// let found = resolve("greet", &[&set]).unwrap();
/// assert_eq!(found.origin, Origin::Scope { index: 0, name: "set" });
///
/// assert_eq!(resolve("eq", &[&set]).unwrap().origin, Origin::Builtin);
/// assert!(resolve("doesNotExist", &[&set]).is_none());
/// ```
pub fn resolve<'a>(name: &str, scopes: &[&'a Scope]) -> Option<Resolved<'a>>
{
    let hit = scopes.iter().enumerate().find_map(|(index, &scope)| {
        scope.get(name).map(|function| Resolved {
            function,
            origin: Origin::Scope { index, name: scope.name() },
        })
    });

    let resolved = hit.or_else(|| {
        cache::builtins().get(name).map(|function| Resolved {
            function,
            origin: Origin::Builtin,
        })
    });

    match &resolved {
        Some(found) => log::trace!("resolved {name:?} in {:?}", found.origin),
        None => log::trace!("{name:?} not found in {} scope(s) or builtins", scopes.len()),
    }
    resolved
}

/// An ordered list of active scopes, highest priority first.
///
/// # Examples
///
/// ```
/// use tmplfunc::{Arity, Function, Scope, ScopeChain, Value};
///
/// let mut set = Scope::registration("set");
/// set.register("eq", Function::infallible(Arity::Exact(2), |_| Value::from("mine")))
///     .unwrap();
///
/// let chain = ScopeChain::new().with(&set);
/// let eq = chain.resolve("eq").unwrap().function;
/// assert_eq!(eq.invoke(&[Value::Nil, Value::Nil]).unwrap(), Value::from("mine"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScopeChain<'a> {
    scopes: SmallVec<[&'a Scope; CHAIN_INLINE]>,
}

impl<'a> ScopeChain<'a> {
    /// Creates an empty chain; only builtins resolve through it.
    pub fn new() -> Self {
        Self { scopes: SmallVec::new() }
    }

    /// Appends `scope` with lower priority than every scope already present.
    pub fn with(mut self, scope: &'a Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Appends `scope` if there is one.
    pub fn with_optional(self, scope: Option<&'a Scope>) -> Self {
        match scope {
            Some(scope) => self.with(scope),
            None => self,
        }
    }

    /// The active scopes in priority order.
    pub fn scopes(&self) -> &[&'a Scope] {
        &self.scopes
    }

    /// Resolves `name` through this chain and then the builtins.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'a>> {
        resolve(name, &self.scopes)
    }
}
