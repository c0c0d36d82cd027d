//! # cache.rs
//!
//! Run-once access to the builtin scope.
//!
//! The builtin scope is not a static table: it is constructed by the first
//! caller that actually needs it. Concurrent first callers block until that
//! one construction finishes and then all observe the same, complete scope.
//! If nothing ever asks, nothing is built.

use once_cell::sync::OnceCell;

use crate::functions::builtin;
use crate::scope::Scope;

static BUILTINS: OnceCell<Scope> = OnceCell::new();

#[cfg(test)]
static CONSTRUCTIONS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Returns the process-wide builtin scope, constructing it on first use.
pub fn builtins() -> &'static Scope
{
    BUILTINS.get_or_init(|| {
        #[cfg(test)]
        CONSTRUCTIONS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let scope = builtin::build();
        log::debug!("constructed builtin scope with {} functions", scope.len());
        scope
    })
}

/// Reports whether the builtin scope has been constructed yet.
pub fn is_initialized() -> bool
{
    BUILTINS.get().is_some()
}
