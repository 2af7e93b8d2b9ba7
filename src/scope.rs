//! Scope strategies: when a produced instance is cached
//!
//! A scope maps `(context, name)` to a cache key. Instances are cached per
//! entry under that key; `None` disables caching for the call.

#[cfg(feature = "logging")]
use tracing::trace;

/// Derives the instance cache key for a resolution.
pub trait Scope<C>: Send + Sync {
    /// Cache key for this resolution, or `None` to skip caching
    fn key(&self, context: Option<&C>, name: &str) -> Option<String>;
}

/// One instance per entry per container, regardless of context.
///
/// The key is the injectable name itself. This is the default scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingletonScope;

impl<C> Scope<C> for SingletonScope {
    #[inline]
    fn key(&self, _context: Option<&C>, name: &str) -> Option<String> {
        Some(name.to_owned())
    }
}

/// Never cached: every resolution re-runs the factory and re-resolves
/// dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrototypeScope;

impl<C> Scope<C> for PrototypeScope {
    #[inline]
    fn key(&self, _context: Option<&C>, _name: &str) -> Option<String> {
        None
    }
}

/// A [`Scope`] backed by a closure. Created with [`from_fn`].
#[derive(Clone)]
pub struct FnScope<F> {
    f: F,
}

/// Wrap a closure as a [`Scope`].
///
/// Useful for per-request or per-tenant caching where the key comes from the
/// context.
///
/// # Examples
///
/// ```rust
/// use wirebox::scope::{self, Scope};
///
/// struct Request { tenant: &'static str }
///
/// let per_tenant = scope::from_fn(|ctx: Option<&Request>, name: &str| {
///     ctx.map(|request| format!("{name}@{}", request.tenant))
/// });
///
/// let request = Request { tenant: "acme" };
/// assert_eq!(per_tenant.key(Some(&request), "db").as_deref(), Some("db@acme"));
/// assert_eq!(per_tenant.key(None, "db"), None);
/// ```
pub fn from_fn<C, F>(f: F) -> FnScope<F>
where
    F: Fn(Option<&C>, &str) -> Option<String> + Send + Sync,
{
    FnScope { f }
}

impl<C, F> Scope<C> for FnScope<F>
where
    F: Fn(Option<&C>, &str) -> Option<String> + Send + Sync,
{
    fn key(&self, context: Option<&C>, name: &str) -> Option<String> {
        let key = (self.f)(context, name);

        #[cfg(feature = "logging")]
        trace!(
            target: "wirebox",
            injectable = name,
            has_context = context.is_some(),
            key = key.as_deref(),
            "Custom scope derived cache key"
        );

        key
    }
}
