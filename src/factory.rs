//! Factory strategies: how an initializer becomes an instance
//!
//! A factory (a.k.a. bootstrapping strategy) receives the initializer, the
//! resolved dependencies in declared order, the caller's context and the
//! injectable's name. Three built-ins are provided:
//!
//! - [`IdentityFactory`] - hands out the initializer itself (the default)
//! - [`ClassFactory`] - invokes a constructor with the dependencies
//! - [`FunctionFactory`] - binds a function to its dependencies
//!
//! Anything else can be plugged in by implementing [`Factory`] or wrapping a
//! closure with [`from_fn`].

use crate::initializer::{Arguments, BoundFunction, Initializer, Instance};
use crate::{DiError, Result};
use std::sync::Arc;

#[cfg(feature = "logging")]
use tracing::trace;

/// Turns an initializer and its resolved dependencies into an instance.
pub trait Factory<C>: Send + Sync {
    /// Produce an instance for the injectable `name`
    fn bootstrap(
        &self,
        initializer: &Initializer,
        dependencies: Vec<Instance>,
        context: Option<&C>,
        name: &str,
    ) -> Result<Instance>;
}

// =============================================================================
// Built-in factories
// =============================================================================

/// Returns the initializer unchanged, ignoring dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFactory;

impl<C> Factory<C> for IdentityFactory {
    #[inline]
    fn bootstrap(
        &self,
        initializer: &Initializer,
        _dependencies: Vec<Instance>,
        _context: Option<&C>,
        _name: &str,
    ) -> Result<Instance> {
        Ok(initializer.to_instance())
    }
}

/// Constructs a new object, passing dependencies as positional arguments.
///
/// Fails with [`DiError::NonConstructible`] unless the initializer is a class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassFactory;

impl<C> Factory<C> for ClassFactory {
    fn bootstrap(
        &self,
        initializer: &Initializer,
        dependencies: Vec<Instance>,
        _context: Option<&C>,
        name: &str,
    ) -> Result<Instance> {
        let constructor = initializer
            .as_constructor()
            .ok_or_else(|| DiError::non_constructible(name, "constructor"))?;

        #[cfg(feature = "logging")]
        trace!(
            target: "wirebox",
            injectable = name,
            class = constructor.type_name(),
            arguments = dependencies.len(),
            "Constructing class instance"
        );

        constructor.construct(&Arguments::new(dependencies))
    }
}

/// Returns a [`BoundFunction`] that calls the initializer with the
/// dependencies prepended to whatever arguments it is later invoked with.
///
/// Fails with [`DiError::NonConstructible`] unless the initializer is a function.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionFactory;

impl<C> Factory<C> for FunctionFactory {
    fn bootstrap(
        &self,
        initializer: &Initializer,
        dependencies: Vec<Instance>,
        _context: Option<&C>,
        name: &str,
    ) -> Result<Instance> {
        let callable = initializer
            .as_callable()
            .ok_or_else(|| DiError::non_constructible(name, "function"))?;

        Ok(Arc::new(BoundFunction::new(Arc::clone(callable), dependencies)))
    }
}

// =============================================================================
// Closure adapter
// =============================================================================

/// A [`Factory`] backed by a closure. Created with [`from_fn`].
#[derive(Clone)]
pub struct FnFactory<F> {
    f: F,
}

/// Wrap a closure as a [`Factory`].
///
/// # Examples
///
/// ```rust
/// use wirebox::{factory, instance, Container, InjectableOptions, Initializer};
///
/// let container = Container::new();
/// container
///     .register(
///         Initializer::value(21_u32),
///         InjectableOptions::new()
///             .name("doubled")
///             .factory(factory::from_fn(|init: &Initializer, _deps, _ctx: Option<&()>, _name: &str| {
///                 let value = init.to_instance().downcast::<u32>().map_err(|_| {
///                     wirebox::DiError::creation_failed("doubled", "not a u32")
///                 })?;
///                 Ok(instance(*value * 2))
///             })),
///     )
///     .unwrap();
///
/// assert_eq!(*container.get::<u32>("doubled", None).unwrap(), 42);
/// ```
pub fn from_fn<C, F>(f: F) -> FnFactory<F>
where
    F: Fn(&Initializer, Vec<Instance>, Option<&C>, &str) -> Result<Instance> + Send + Sync,
{
    FnFactory { f }
}

impl<C, F> Factory<C> for FnFactory<F>
where
    F: Fn(&Initializer, Vec<Instance>, Option<&C>, &str) -> Result<Instance> + Send + Sync,
{
    #[inline]
    fn bootstrap(
        &self,
        initializer: &Initializer,
        dependencies: Vec<Instance>,
        context: Option<&C>,
        name: &str,
    ) -> Result<Instance> {
        (self.f)(initializer, dependencies, context, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initializer::instance;

    struct Greeter {
        greeting: Arc<String>,
    }

    fn bootstrap<F: Factory<()>>(
        factory: F,
        initializer: &Initializer,
        dependencies: Vec<Instance>,
    ) -> Result<Instance> {
        factory.bootstrap(initializer, dependencies, None, "test")
    }

    #[test]
    fn test_identity_factory() {
        let shared = Arc::new(String::from("hello"));
        let init = Initializer::from_arc(Arc::clone(&shared));

        let produced = bootstrap(IdentityFactory, &init, vec![instance(1_u8)])
            .unwrap()
            .downcast::<String>()
            .unwrap();

        assert!(Arc::ptr_eq(&produced, &shared));
    }

    #[test]
    fn test_class_factory() {
        let init = Initializer::class(|args| {
            Ok(Greeter {
                greeting: args.get::<String>(0)?,
            })
        });

        let greeter = bootstrap(ClassFactory, &init, vec![instance(String::from("hi"))])
            .unwrap()
            .downcast::<Greeter>()
            .unwrap();

        assert_eq!(greeter.greeting.as_str(), "hi");
    }

    #[test]
    fn test_class_factory_rejects_non_class() {
        let err = bootstrap(ClassFactory, &Initializer::value(1_u8), vec![]).unwrap_err();
        assert_eq!(err, DiError::non_constructible("test", "constructor"));

        let err = bootstrap(ClassFactory, &Initializer::function(|_| Ok(1_u8)), vec![])
            .unwrap_err();
        assert!(matches!(err, DiError::NonConstructible { .. }));
    }

    #[test]
    fn test_function_factory() {
        let init = Initializer::function(|args| {
            Ok(format!("{}, {}!", args.get::<&str>(0)?, args.get::<&str>(1)?))
        });

        let bound = bootstrap(FunctionFactory, &init, vec![instance("Hello")])
            .unwrap()
            .downcast::<BoundFunction>()
            .unwrap();

        let greeting = bound.call_as::<String, _>([instance("world")]).unwrap();
        assert_eq!(greeting.as_str(), "Hello, world!");
    }

    #[test]
    fn test_function_factory_rejects_non_function() {
        let init = Initializer::class(|_| Ok(0_u8));
        let err = bootstrap(FunctionFactory, &init, vec![]).unwrap_err();
        assert_eq!(err, DiError::non_constructible("test", "function"));
    }
}
