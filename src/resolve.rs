//! Per-call resolution state
//!
//! A [`Resolution`] lives for exactly one outermost `get_instance` call. It
//! carries the resolve stack used for cycle detection and the instances
//! produced so far. Those instances are only written into entry caches by
//! [`Resolution::commit`], so a failed call leaves no trace.

use crate::initializer::Instance;
use crate::registry::InjectableEntry;
use crate::{DiError, Result};
use std::sync::Arc;

/// Ordered set of names currently being resolved.
#[derive(Debug, Default)]
pub(crate) struct ResolveStack {
    names: Vec<String>,
}

impl ResolveStack {
    /// Push `name`, failing if it is already on the stack
    pub fn enter(&mut self, name: &str) -> Result<()> {
        if self.names.iter().any(|entered| entered == name) {
            let mut path = self.names.clone();
            path.push(name.to_owned());
            return Err(DiError::circular(path));
        }
        self.names.push(name.to_owned());
        Ok(())
    }

    /// Pop `name`, which must be the innermost entry
    pub fn leave(&mut self, name: &str) {
        let left = self.names.pop();
        debug_assert_eq!(left.as_deref(), Some(name));
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.names.len()
    }
}

struct Staged<C> {
    entry: Arc<InjectableEntry<C>>,
    name: String,
    key: String,
    instance: Instance,
}

/// State of one outermost resolution call.
pub(crate) struct Resolution<C> {
    pub stack: ResolveStack,
    staged: Vec<Staged<C>>,
}

impl<C> Resolution<C> {
    pub fn new() -> Self {
        Self {
            stack: ResolveStack::default(),
            staged: Vec::new(),
        }
    }

    /// Instance produced earlier in this call for `name` under `key`
    pub fn staged(&self, name: &str, key: &str) -> Option<Instance> {
        self.staged
            .iter()
            .find(|staged| staged.name == name && staged.key == key)
            .map(|staged| Arc::clone(&staged.instance))
    }

    /// Remember an instance to cache once the call succeeds
    pub fn stage(&mut self, entry: Arc<InjectableEntry<C>>, name: &str, key: String, instance: Instance) {
        self.staged.push(Staged {
            entry,
            name: name.to_owned(),
            key,
            instance,
        });
    }

    /// Write staged instances into their entries' caches, dependencies first.
    ///
    /// Stops at the first key some other resolution cached in the meantime
    /// and returns `None`: everything staged after it may have been built on
    /// the instance that lost, so none of it is cached. Everything committed
    /// before it was built only from cached or committed instances.
    pub fn commit(self, root: Instance) -> Option<Instance> {
        for staged in self.staged {
            let stored = staged.entry.store(staged.key, Arc::clone(&staged.instance));
            if !Arc::ptr_eq(&stored, &staged.instance) {
                return None;
            }
        }
        Some(root)
    }

    /// Number of instances waiting to be committed
    #[inline]
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }
}
