//! Registry of injectable entries
//!
//! Uses DashMap for lock-free concurrent access. Entries are only ever added;
//! the sole mutation after insertion is growth of an entry's instance cache.

use crate::factory::{Factory, IdentityFactory};
use crate::initializer::{Initializer, Instance};
use crate::name::Nameable;
use crate::scope::{Scope, SingletonScope};
use crate::{DiError, Result};
use ahash::RandomState;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::fmt;
use std::sync::Arc;

/// Instance caches are small; a few shards are plenty
const INSTANCE_SHARDS: usize = 4;

// =============================================================================
// Options
// =============================================================================

/// Registration options.
///
/// Defaults: name inferred from the initializer, [`IdentityFactory`],
/// [`SingletonScope`], no dependencies.
///
/// # Examples
///
/// ```rust
/// use wirebox::{ClassFactory, InjectableOptions, PrototypeScope};
///
/// let options: InjectableOptions = InjectableOptions::new()
///     .name("userService")
///     .factory(ClassFactory)
///     .scope(PrototypeScope)
///     .dependencies(["database", "config"]);
/// ```
pub struct InjectableOptions<C = ()> {
    pub(crate) name: Option<Nameable>,
    pub(crate) factory: Arc<dyn Factory<C>>,
    pub(crate) scope: Arc<dyn Scope<C>>,
    pub(crate) dependencies: Vec<Nameable>,
}

impl<C: 'static> InjectableOptions<C> {
    /// Options with every field at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit name; wins over inference from the initializer
    pub fn name(mut self, name: impl Into<Nameable>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Instantiation strategy
    pub fn factory<F: Factory<C> + 'static>(mut self, factory: F) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Instantiation strategy, already shared
    pub fn shared_factory(mut self, factory: Arc<dyn Factory<C>>) -> Self {
        self.factory = factory;
        self
    }

    /// Caching strategy
    pub fn scope<S: Scope<C> + 'static>(mut self, scope: S) -> Self {
        self.scope = Arc::new(scope);
        self
    }

    /// Caching strategy, already shared
    pub fn shared_scope(mut self, scope: Arc<dyn Scope<C>>) -> Self {
        self.scope = scope;
        self
    }

    /// Replace the dependency list. Order determines argument order.
    pub fn dependencies<I, N>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Nameable>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Append one dependency
    pub fn dependency(mut self, dependency: impl Into<Nameable>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }
}

impl<C: 'static> Default for InjectableOptions<C> {
    fn default() -> Self {
        Self {
            name: None,
            factory: Arc::new(IdentityFactory),
            scope: Arc::new(SingletonScope),
            dependencies: Vec::new(),
        }
    }
}

impl<C> fmt::Debug for InjectableOptions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectableOptions")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Entry
// =============================================================================

/// One registered injectable.
///
/// Entries are created by [`Container::register`](crate::Container::register)
/// and read through [`Container::lookup`](crate::Container::lookup); the
/// registry holding them is internal.
///
/// ```rust,compile_fail
/// use wirebox::Registry;
/// ```
pub struct InjectableEntry<C> {
    initializer: Initializer,
    factory: Arc<dyn Factory<C>>,
    scope: Arc<dyn Scope<C>>,
    dependencies: Vec<String>,
    /// Produced instances by scope key
    instances: DashMap<String, Instance, RandomState>,
}

impl<C> InjectableEntry<C> {
    pub(crate) fn new(
        initializer: Initializer,
        factory: Arc<dyn Factory<C>>,
        scope: Arc<dyn Scope<C>>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            initializer,
            factory,
            scope,
            dependencies,
            instances: DashMap::with_capacity_and_hasher_and_shard_amount(
                0,
                RandomState::new(),
                INSTANCE_SHARDS,
            ),
        }
    }

    /// The raw registered value
    #[inline]
    pub fn initializer(&self) -> &Initializer {
        &self.initializer
    }

    /// Canonical dependency names, in declared order
    #[inline]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    #[inline]
    pub(crate) fn factory(&self) -> &dyn Factory<C> {
        &*self.factory
    }

    /// Cache key for a resolution in `context`
    #[inline]
    pub fn scope_key(&self, context: Option<&C>, name: &str) -> Option<String> {
        self.scope.key(context, name)
    }

    /// Previously produced instance under `key`
    #[inline]
    pub fn cached(&self, key: &str) -> Option<Instance> {
        self.instances.get(key).map(|instance| Arc::clone(instance.value()))
    }

    /// Check for a cached instance without cloning it
    #[inline]
    pub fn is_cached(&self, key: &str) -> bool {
        self.instances.contains_key(key)
    }

    /// Number of cached instances
    #[inline]
    pub fn cached_count(&self) -> usize {
        self.instances.len()
    }

    /// Cache `instance` under `key`; the first stored instance wins.
    pub(crate) fn store(&self, key: String, instance: Instance) -> Instance {
        let stored = self.instances.entry(key).or_insert(instance);
        Arc::clone(stored.value())
    }
}

impl<C> fmt::Debug for InjectableEntry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectableEntry")
            .field("initializer", &self.initializer)
            .field("dependencies", &self.dependencies)
            .field("cached", &self.instances.len())
            .finish()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Thread-safe name-to-entry map.
pub(crate) struct Registry<C> {
    entries: DashMap<String, Arc<InjectableEntry<C>>, RandomState>,
}

impl<C> Registry<C> {
    /// Create with pre-allocated capacity, scaling shards with it.
    ///
    /// Small registries use 8 shards; a container rarely holds more than a
    /// few dozen entries.
    pub fn with_capacity(capacity: usize) -> Self {
        let shard_amount = if capacity <= 16 {
            8
        } else if capacity <= 64 {
            16
        } else {
            32
        };
        Self {
            entries: DashMap::with_capacity_and_hasher_and_shard_amount(
                capacity,
                RandomState::new(),
                shard_amount,
            ),
        }
    }

    /// Insert a new entry. Fails if the name is taken; the existing entry is
    /// left untouched.
    pub fn insert(&self, name: String, entry: InjectableEntry<C>) -> Result<()> {
        match self.entries.entry(name) {
            Entry::Occupied(occupied) => Err(DiError::already_registered(occupied.key().as_str())),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(entry));
                Ok(())
            }
        }
    }

    /// Check if a name is registered
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Entry for `name`, or [`DiError::NotFound`]
    #[inline]
    pub fn lookup(&self, name: &str) -> Result<Arc<InjectableEntry<C>>> {
        self.entries
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DiError::not_found(name))
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All registered names, unordered
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("count", &self.len())
            .finish()
    }
}
