//! Registration sugar
//!
//! Thin adapters over [`Container::register`] and [`Container::get`]: deferred
//! registrations that can be collected and installed together, and the
//! [`injectable!`](crate::injectable) / [`autowired!`](crate::autowired) macros.

use crate::{Container, Result};
use std::fmt;

/// A deferred registration (used for module-style setup)
pub struct InjectableRegistration<C = ()> {
    /// Label for diagnostics
    pub label: &'static str,
    /// Registration function
    pub register_fn: fn(&Container<C>) -> Result<()>,
}

impl<C> InjectableRegistration<C> {
    /// Create a registration from a function
    #[inline]
    pub const fn new(label: &'static str, register_fn: fn(&Container<C>) -> Result<()>) -> Self {
        Self { label, register_fn }
    }

    /// Run the registration against `container`
    #[inline]
    pub fn apply(&self, container: &Container<C>) -> Result<()> {
        (self.register_fn)(container)
    }
}

impl<C> Clone for InjectableRegistration<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for InjectableRegistration<C> {}

impl<C> fmt::Debug for InjectableRegistration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectableRegistration")
            .field("label", &self.label)
            .finish()
    }
}

impl<C: 'static> Container<C> {
    /// Apply registrations in order, stopping at the first failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use wirebox::{Container, InjectableOptions, InjectableRegistration, Initializer};
    ///
    /// static CONFIG: InjectableRegistration = InjectableRegistration::new("config", |c| {
    ///     c.register(Initializer::value(8080_u16), InjectableOptions::new().name("port"))
    /// });
    ///
    /// let container = Container::new();
    /// container.install(&[CONFIG]).unwrap();
    /// assert!(container.has("port").unwrap());
    /// ```
    pub fn install(&self, registrations: &[InjectableRegistration<C>]) -> Result<()> {
        for registration in registrations {
            #[cfg(feature = "logging")]
            tracing::debug!(
                target: "wirebox",
                registration = registration.label,
                "Installing registration"
            );

            registration.apply(self)?;
        }
        Ok(())
    }
}

/// Register a class-style injectable for a Rust type.
///
/// The name defaults to the type's short name; dependencies, scope and an
/// explicit name are optional, in that order.
///
/// # Examples
///
/// ```rust
/// use wirebox::{autowired, injectable, Container, PrototypeScope};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// struct Server { config: Arc<Config> }
///
/// let container = Container::new();
/// injectable!(container, Config => |_| Ok(Config { port: 8080 })).unwrap();
/// injectable!(
///     container,
///     Server => |args| Ok(Server { config: args.get(0)? }),
///     deps = ["Config"],
///     scope = PrototypeScope
/// )
/// .unwrap();
///
/// let server: Arc<Server> = autowired!(container, Server).unwrap();
/// assert_eq!(server.config.port, 8080);
/// ```
#[macro_export]
macro_rules! injectable {
    (
        $container:expr, $ty:ty => $construct:expr
        $(, deps = [$($dep:expr),* $(,)?])?
        $(, scope = $scope:expr)?
        $(, name = $name:expr)?
        $(,)?
    ) => {
        $container.register(
            $crate::Initializer::class::<$ty, _>($construct),
            $crate::InjectableOptions::new()
                .factory($crate::ClassFactory)
                $(.dependencies({
                    let deps: ::std::vec::Vec<$crate::Nameable> =
                        ::std::vec![$($crate::Nameable::from($dep)),*];
                    deps
                }))?
                $(.scope($scope))?
                $(.name($name))?,
        )
    };
}

/// Retrieve an injectable by its Rust type, without context.
#[macro_export]
macro_rules! autowired {
    ($container:expr, $ty:ty) => {
        $container.get::<$ty>($crate::Nameable::of::<$ty>(), None)
    };
}
