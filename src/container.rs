//! Dependency injection container
//!
//! The `Container` stores injectables by name and resolves them, walking the
//! dependency graph depth-first and caching instances according to each
//! entry's scope.

use crate::config::{ContainerConfig, ContextPropagation};
use crate::initializer::{Initializer, Instance};
use crate::name::Nameable;
use crate::registry::{InjectableEntry, InjectableOptions, Registry};
use crate::resolve::Resolution;
use crate::{DiError, Result};
use parking_lot::ReentrantMutex;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// Name-keyed dependency injection container.
///
/// `C` is the context type handed to scope and factory strategies; it
/// defaults to `()` for containers that never use one. Cloning a container is
/// cheap and the clones share the same registry.
///
/// Resolutions that have to instantiate something run one at a time per
/// container; cached instances are served without waiting. A factory may
/// resolve from the container it is called by, but must not block on
/// another thread that does.
///
/// # Examples
///
/// ```rust
/// use wirebox::{ClassFactory, Container, InjectableOptions, Initializer};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let container = Container::new();
/// container
///     .register(
///         Initializer::value(Database { url: "postgres://localhost".into() }),
///         InjectableOptions::new().name("database"),
///     )
///     .unwrap();
/// container
///     .register(
///         Initializer::class(|args| Ok(UserService { db: args.get(0)? })),
///         InjectableOptions::new().factory(ClassFactory).dependencies(["database"]),
///     )
///     .unwrap();
///
/// let users = container.get::<UserService>("UserService", None).unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
pub struct Container<C = ()> {
    registry: Arc<Registry<C>>,
    config: Arc<ContainerConfig>,
    /// Held while instantiating, so singletons are built once
    resolution_lock: Arc<ReentrantMutex<()>>,
}

impl Container<()> {
    /// Create an empty container without a context type.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: 'static> Container<C> {
    /// Create an empty container with the given configuration.
    pub fn with_config(config: ContainerConfig) -> Self {
        #[cfg(feature = "logging")]
        debug!(
            target: "wirebox",
            context = std::any::type_name::<C>(),
            propagation = ?config.context_propagation,
            capacity = config.capacity,
            "Creating new DI container"
        );

        Self {
            registry: Arc::new(Registry::with_capacity(config.capacity)),
            config: Arc::new(config),
            resolution_lock: Arc::new(ReentrantMutex::new(())),
        }
    }

    /// The configuration this container was built with
    #[inline]
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new injectable.
    ///
    /// The name is `options.name` if given, otherwise inferred from the
    /// initializer. Dependency references are resolved to names now but need
    /// not be registered until resolution time.
    ///
    /// # Errors
    ///
    /// - [`DiError::NameResolution`] if the injectable or a dependency cannot be named
    /// - [`DiError::AlreadyRegistered`] if the name is taken; the registry is unchanged
    pub fn register(&self, initializer: Initializer, options: InjectableOptions<C>) -> Result<()> {
        let InjectableOptions {
            name,
            factory,
            scope,
            dependencies,
        } = options;

        let name = match name {
            Some(explicit) => self.resolve_name(&explicit)?,
            None => self.resolve_name(&Nameable::Value(initializer.clone()))?,
        };

        if self.registry.contains(&name) {
            return Err(DiError::already_registered(name));
        }

        let dependencies = dependencies
            .iter()
            .map(|dependency| self.resolve_name(dependency))
            .collect::<Result<Vec<_>>>()?;

        #[cfg(feature = "logging")]
        debug!(
            target: "wirebox",
            injectable = name.as_str(),
            initializer = %initializer,
            dependencies = ?dependencies,
            injectable_count = self.registry.len() + 1,
            "Registering injectable"
        );

        self.registry.insert(
            name,
            InjectableEntry::new(initializer, factory, scope, dependencies),
        )
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check if an injectable is registered, whether instantiated or not.
    ///
    /// # Errors
    ///
    /// [`DiError::NameResolution`] if no name can be determined.
    pub fn has(&self, nameable: impl Into<Nameable>) -> Result<bool> {
        let name = self.resolve_name(&nameable.into())?;
        Ok(self.registry.contains(&name))
    }

    /// Check if an injectable is registered and has a cached instance for
    /// `context`. Never instantiates anything.
    ///
    /// # Errors
    ///
    /// [`DiError::NameResolution`] if no name can be determined.
    pub fn has_instance(&self, nameable: impl Into<Nameable>, context: Option<&C>) -> Result<bool> {
        let name = self.resolve_name(&nameable.into())?;
        let Ok(entry) = self.registry.lookup(&name) else {
            return Ok(false);
        };

        Ok(entry
            .scope_key(context, &name)
            .is_some_and(|key| entry.is_cached(&key)))
    }

    /// Registered entry for a name
    pub fn lookup(&self, nameable: impl Into<Nameable>) -> Result<Arc<InjectableEntry<C>>> {
        let name = self.resolve_name(&nameable.into())?;
        self.registry.lookup(&name)
    }

    /// Number of registered injectables
    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if nothing is registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names = self.registry.names();
        names.sort_unstable();
        names
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Retrieve an instance, recursively instantiating dependencies that are
    /// not cached yet.
    ///
    /// # Errors
    ///
    /// - [`DiError::NameResolution`] if no name can be determined
    /// - [`DiError::NotFound`] if the injectable or a dependency is missing
    /// - [`DiError::CircularDependency`] if the dependency graph has a cycle
    /// - any error raised by a factory
    ///
    /// On failure no instance produced during the call is cached.
    pub fn get_instance(&self, nameable: impl Into<Nameable>, context: Option<&C>) -> Result<Instance> {
        let name = self.resolve_name(&nameable.into())?;
        self.instance_by_name(&name, context)
    }

    /// Retrieve an instance and downcast it to `T`.
    ///
    /// Fails with [`DiError::TypeMismatch`] if the instance is not a `T`.
    pub fn get<T: Send + Sync + 'static>(
        &self,
        nameable: impl Into<Nameable>,
        context: Option<&C>,
    ) -> Result<Arc<T>> {
        let name = self.resolve_name(&nameable.into())?;
        self.instance_by_name(&name, context)?
            .downcast::<T>()
            .map_err(|_| DiError::type_mismatch::<T>(name))
    }

    fn instance_by_name(&self, name: &str, context: Option<&C>) -> Result<Instance> {
        if let Some(instance) = self.cached_instance(name, context) {
            return Ok(instance);
        }

        let _guard = self.resolution_lock.lock();
        loop {
            let mut resolution = Resolution::new();

            let instance = match self.resolve_named(name, context, &mut resolution) {
                Ok(instance) => instance,
                Err(err) => {
                    #[cfg(feature = "logging")]
                    debug!(
                        target: "wirebox",
                        injectable = name,
                        error = %err,
                        "Resolution failed, nothing cached"
                    );

                    return Err(err);
                }
            };

            #[cfg(feature = "logging")]
            let staged = resolution.staged_count();

            match resolution.commit(instance) {
                Some(instance) => {
                    #[cfg(feature = "logging")]
                    trace!(
                        target: "wirebox",
                        injectable = name,
                        committed = staged,
                        "Resolution complete"
                    );

                    return Ok(instance);
                }
                None => {
                    // A nested resolution cached part of this graph first
                    #[cfg(feature = "logging")]
                    debug!(
                        target: "wirebox",
                        injectable = name,
                        "Cache changed during resolution, resolving again"
                    );
                }
            }
        }
    }

    /// Instance already cached for `name` in `context`, if any
    fn cached_instance(&self, name: &str, context: Option<&C>) -> Option<Instance> {
        let entry = self.registry.lookup(name).ok()?;
        let key = entry.scope_key(context, name)?;
        entry.cached(&key)
    }

    /// Depth-first resolution of one name.
    fn resolve_named(
        &self,
        name: &str,
        context: Option<&C>,
        resolution: &mut Resolution<C>,
    ) -> Result<Instance> {
        let entry = self.registry.lookup(name)?;
        let key = entry.scope_key(context, name);

        // A cached instance never re-enters its dependency chain
        if let Some(key) = key.as_deref() {
            if let Some(instance) = entry.cached(key).or_else(|| resolution.staged(name, key)) {
                #[cfg(feature = "logging")]
                trace!(
                    target: "wirebox",
                    injectable = name,
                    key,
                    "Returning cached instance"
                );
                return Ok(instance);
            }
        }

        resolution.stack.enter(name)?;

        let dependency_context = match self.config.context_propagation {
            ContextPropagation::Propagate => context,
            ContextPropagation::Reset => None,
        };

        let mut dependencies = Vec::with_capacity(entry.dependencies().len());
        for dependency in entry.dependencies() {
            dependencies.push(self.resolve_named(dependency, dependency_context, resolution)?);
        }

        #[cfg(feature = "logging")]
        debug!(
            target: "wirebox",
            injectable = name,
            depth = resolution.stack.depth(),
            dependencies = dependencies.len(),
            cached = key.is_some(),
            "Instantiating injectable"
        );

        let instance = entry
            .factory()
            .bootstrap(entry.initializer(), dependencies, context, name)?;

        if let Some(key) = key {
            resolution.stage(Arc::clone(&entry), name, key, Arc::clone(&instance));
        }

        resolution.stack.leave(name);
        Ok(instance)
    }

    #[inline]
    fn resolve_name(&self, nameable: &Nameable) -> Result<String> {
        self.config.name_resolver.resolve(nameable)
    }
}

impl<C: 'static> Default for Container<C> {
    fn default() -> Self {
        Self::with_config(ContainerConfig::default())
    }
}

impl<C> Clone for Container<C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
            resolution_lock: Arc::clone(&self.resolution_lock),
        }
    }
}

impl<C> fmt::Debug for Container<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("injectables", &self.registry.len())
            .field("config", &self.config)
            .finish()
    }
}
