//! Container configuration

use crate::name::{DefaultNameResolver, NameResolver};
use std::fmt;
use std::sync::Arc;

/// How the caller's context reaches transitive dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContextPropagation {
    /// Dependencies resolve with the same context as the requested injectable
    #[default]
    Propagate,
    /// Only the requested injectable sees the context; its dependencies (at
    /// every depth) resolve with no context
    Reset,
}

/// Builder-style configuration for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```rust
/// use wirebox::{Container, ContainerConfig, ContextPropagation};
///
/// let config = ContainerConfig::new()
///     .with_context_propagation(ContextPropagation::Reset)
///     .with_capacity(32);
///
/// let container: Container<String> = Container::with_config(config);
/// assert!(container.is_empty());
/// ```
#[derive(Clone)]
pub struct ContainerConfig {
    pub(crate) context_propagation: ContextPropagation,
    pub(crate) name_resolver: Arc<dyn NameResolver>,
    pub(crate) capacity: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            context_propagation: ContextPropagation::Propagate,
            name_resolver: Arc::new(DefaultNameResolver),
            capacity: 0,
        }
    }
}

impl ContainerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how context reaches transitive dependencies
    pub fn with_context_propagation(mut self, propagation: ContextPropagation) -> Self {
        self.context_propagation = propagation;
        self
    }

    /// Replace the name resolver
    pub fn with_name_resolver<R: NameResolver + 'static>(mut self, resolver: R) -> Self {
        self.name_resolver = Arc::new(resolver);
        self
    }

    /// Pre-allocate room for this many injectables
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Configured context propagation
    #[inline]
    pub fn context_propagation(&self) -> ContextPropagation {
        self.context_propagation
    }
}

impl fmt::Debug for ContainerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerConfig")
            .field("context_propagation", &self.context_propagation)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
