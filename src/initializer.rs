//! Initializers: the raw values an injectable is registered with
//!
//! An [`Initializer`] is opaque to the resolution engine; only a
//! [`Factory`](crate::Factory) looks inside it. Three kinds exist:
//!
//! - **Value** - a ready-made instance
//! - **Class** - a [`Constructor`] invoked with the resolved dependencies
//! - **Function** - a [`Callable`] that can be bound to its dependencies and
//!   invoked later with more arguments

use crate::name::short_type_name;
use crate::{DiError, Result};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A produced, type-erased instance.
///
/// Identity equality is [`Arc::ptr_eq`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Erase a value into an [`Instance`]
#[inline]
pub fn instance<T: Send + Sync + 'static>(value: T) -> Instance {
    Arc::new(value)
}

type ConstructFn = dyn Fn(&Arguments) -> Result<Instance> + Send + Sync;

// =============================================================================
// Arguments
// =============================================================================

/// Ordered positional arguments passed to a constructor or callable.
#[derive(Clone, Default)]
pub struct Arguments {
    values: Vec<Instance>,
}

impl Arguments {
    /// Wrap an ordered list of instances
    #[inline]
    pub fn new(values: Vec<Instance>) -> Self {
        Self { values }
    }

    /// Number of arguments
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no arguments
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw instance at `index`
    #[inline]
    pub fn instance(&self, index: usize) -> Option<&Instance> {
        self.values.get(index)
    }

    /// Downcast the argument at `index` to `T`.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>> {
        let value = self.values.get(index).ok_or(DiError::MissingArgument {
            index,
            len: self.values.len(),
        })?;

        Arc::clone(value)
            .downcast::<T>()
            .map_err(|_| DiError::type_mismatch::<T>(format!("argument #{index}")))
    }

    /// Iterate over the arguments in order
    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.values.iter()
    }

    /// Consume into the underlying instances
    #[inline]
    pub fn into_inner(self) -> Vec<Instance> {
        self.values
    }
}

impl From<Vec<Instance>> for Arguments {
    fn from(values: Vec<Instance>) -> Self {
        Self::new(values)
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("len", &self.values.len())
            .finish()
    }
}

// =============================================================================
// Constructor / Callable
// =============================================================================

/// A type-tagged constructor, used by class-style bootstrapping.
pub struct Constructor {
    type_name: &'static str,
    /// Short name, derived from `type_name` on first use
    short_name: OnceCell<String>,
    construct: Box<ConstructFn>,
}

impl Constructor {
    /// Name of the constructed type as reported by `std::any::type_name`
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Constructed type name without module paths, e.g. `Pool<Pg>`
    pub fn short_name(&self) -> &str {
        self.short_name.get_or_init(|| short_type_name(self.type_name))
    }

    /// Construct a new instance from positional arguments
    #[inline]
    pub fn construct(&self, arguments: &Arguments) -> Result<Instance> {
        (self.construct)(arguments)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// A function initializer, used by function-style bootstrapping.
pub struct Callable {
    return_type: &'static str,
    call: Box<ConstructFn>,
}

impl Callable {
    /// Name of the returned type
    #[inline]
    pub fn return_type(&self) -> &'static str {
        self.return_type
    }

    /// Invoke with positional arguments
    #[inline]
    pub fn call(&self, arguments: &Arguments) -> Result<Instance> {
        (self.call)(arguments)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("return_type", &self.return_type)
            .finish()
    }
}

/// A callable with its dependencies already bound in front of its arguments.
///
/// Produced by [`FunctionFactory`](crate::FunctionFactory). Calling it with
/// `extra` invokes the underlying function with `dependencies ++ extra`.
#[derive(Clone)]
pub struct BoundFunction {
    callable: Arc<Callable>,
    dependencies: Vec<Instance>,
}

impl BoundFunction {
    pub(crate) fn new(callable: Arc<Callable>, dependencies: Vec<Instance>) -> Self {
        Self {
            callable,
            dependencies,
        }
    }

    /// Dependencies bound at bootstrap time
    #[inline]
    pub fn dependencies(&self) -> &[Instance] {
        &self.dependencies
    }

    /// Invoke with additional arguments appended after the dependencies
    pub fn call<I>(&self, extra: I) -> Result<Instance>
    where
        I: IntoIterator<Item = Instance>,
    {
        let mut values = self.dependencies.clone();
        values.extend(extra);
        self.callable.call(&Arguments::new(values))
    }

    /// Invoke and downcast the result to `R`
    pub fn call_as<R, I>(&self, extra: I) -> Result<Arc<R>>
    where
        R: Send + Sync + 'static,
        I: IntoIterator<Item = Instance>,
    {
        self.call(extra)?
            .downcast::<R>()
            .map_err(|_| DiError::type_mismatch::<R>("function result"))
    }
}

impl fmt::Debug for BoundFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundFunction")
            .field("callable", &self.callable)
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}

// =============================================================================
// Initializer
// =============================================================================

/// What kind of initializer this is
#[derive(Clone)]
pub enum InitializerKind {
    /// A plain value, handed out as-is by identity bootstrapping
    Value {
        instance: Instance,
        type_name: &'static str,
    },
    /// Something constructible with positional arguments
    Class(Arc<Constructor>),
    /// Something callable with positional arguments
    Function(Arc<Callable>),
}

/// The raw registered value of an injectable.
///
/// Cloning is cheap; every payload is shared through `Arc`.
///
/// # Examples
///
/// ```rust
/// use wirebox::Initializer;
///
/// struct Database { url: String }
///
/// let value = Initializer::value(42_u32);
/// let class = Initializer::class(|_| Ok(Database { url: "postgres://localhost".into() }));
/// let function = Initializer::function(|args| Ok(*args.get::<u32>(0)? + 1)).named("increment");
///
/// assert_eq!(value.inferred_name(), None);
/// assert_eq!(class.inferred_name(), Some("Database"));
/// assert_eq!(function.inferred_name(), Some("increment"));
/// ```
#[derive(Clone)]
pub struct Initializer {
    kind: InitializerKind,
    label: Option<Arc<str>>,
}

impl Initializer {
    /// A plain value
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// A plain value that is already shared
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            kind: InitializerKind::Value {
                instance: value,
                type_name: std::any::type_name::<T>(),
            },
            label: None,
        }
    }

    /// A constructor for `T`.
    ///
    /// The inferred name is the short type name of `T`.
    pub fn class<T, F>(construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            kind: InitializerKind::Class(Arc::new(Constructor {
                type_name: std::any::type_name::<T>(),
                short_name: OnceCell::new(),
                construct: Box::new(move |args: &Arguments| construct(args).map(instance)),
            })),
            label: None,
        }
    }

    /// A function. Anonymous until labelled with [`named`](Self::named).
    pub fn function<R, F>(call: F) -> Self
    where
        R: Send + Sync + 'static,
        F: Fn(&Arguments) -> Result<R> + Send + Sync + 'static,
    {
        Self {
            kind: InitializerKind::Function(Arc::new(Callable {
                return_type: std::any::type_name::<R>(),
                call: Box::new(move |args: &Arguments| call(args).map(instance)),
            })),
            label: None,
        }
    }

    /// Attach an intrinsic name, taking precedence over type-derived inference
    pub fn named(mut self, label: impl AsRef<str>) -> Self {
        self.label = Some(Arc::from(label.as_ref()));
        self
    }

    /// The initializer kind
    #[inline]
    pub fn kind(&self) -> &InitializerKind {
        &self.kind
    }

    /// Name that can be inferred from this value, if any
    pub fn inferred_name(&self) -> Option<&str> {
        if let Some(label) = &self.label {
            return Some(&**label);
        }
        match &self.kind {
            InitializerKind::Class(constructor) => Some(constructor.short_name()),
            InitializerKind::Value { .. } | InitializerKind::Function(_) => None,
        }
    }

    /// Constructor payload, if this is a class initializer
    pub fn as_constructor(&self) -> Option<&Arc<Constructor>> {
        match &self.kind {
            InitializerKind::Class(constructor) => Some(constructor),
            _ => None,
        }
    }

    /// Callable payload, if this is a function initializer
    pub fn as_callable(&self) -> Option<&Arc<Callable>> {
        match &self.kind {
            InitializerKind::Function(callable) => Some(callable),
            _ => None,
        }
    }

    /// The initializer itself as an instance.
    ///
    /// Repeated calls share the same allocation, so identity is preserved.
    pub fn to_instance(&self) -> Instance {
        match &self.kind {
            InitializerKind::Value { instance, .. } => Arc::clone(instance),
            InitializerKind::Class(constructor) => Arc::clone(constructor) as Instance,
            InitializerKind::Function(callable) => Arc::clone(callable) as Instance,
        }
    }
}

impl fmt::Debug for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.label) {
            (_, Some(label)) => write!(f, "'{label}'"),
            (InitializerKind::Value { type_name, .. }, None) => {
                write!(f, "value of type `{type_name}`")
            }
            (InitializerKind::Class(constructor), None) => {
                write!(f, "class `{}`", constructor.type_name())
            }
            (InitializerKind::Function(callable), None) => {
                write!(f, "anonymous function returning `{}`", callable.return_type())
            }
        }
    }
}
