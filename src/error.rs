//! Error types for dependency injection

use thiserror::Error;

/// Errors that can occur during registration or resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// No canonical name could be derived from a nameable value
    #[error("Could not guess name of {value}, please explicitly define one.")]
    NameResolution { value: String },

    /// Attempted to register a name that is already taken
    #[error("Name already exists: '{name}'.")]
    AlreadyRegistered { name: String },

    /// Injectable (or one of its declared dependencies) was not registered
    #[error("Injectable '{name}' does not exist.")]
    NotFound { name: String },

    /// The resolve stack already contained the name being entered
    #[error("Circular dependencies found: {}.", format_path(.path))]
    CircularDependency { path: Vec<String> },

    /// A built-in factory received an initializer of the wrong kind
    #[error("Injectable '{name}' cannot be bootstrapped: initializer is not a {expected}")]
    NonConstructible {
        name: String,
        expected: &'static str,
    },

    /// A constructor or function initializer reported a failure
    #[error("Failed to create injectable '{name}': {reason}")]
    CreationFailed { name: String, reason: String },

    /// An instance could not be downcast to the requested type
    #[error("'{subject}' is not of type {expected}")]
    TypeMismatch {
        subject: String,
        expected: &'static str,
    },

    /// Positional argument index out of range
    #[error("Missing argument #{index}: only {len} argument(s) were supplied")]
    MissingArgument { index: usize, len: usize },
}

impl DiError {
    /// Create a NameResolution error describing the offending value
    #[inline]
    pub fn name_resolution(value: impl Into<String>) -> Self {
        Self::NameResolution {
            value: value.into(),
        }
    }

    /// Create an AlreadyRegistered error
    #[inline]
    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::AlreadyRegistered { name: name.into() }
    }

    /// Create a NotFound error
    #[inline]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a CircularDependency error from the traversal path
    #[inline]
    pub fn circular(path: Vec<String>) -> Self {
        Self::CircularDependency { path }
    }

    /// Create a NonConstructible error
    #[inline]
    pub fn non_constructible(name: impl Into<String>, expected: &'static str) -> Self {
        Self::NonConstructible {
            name: name.into(),
            expected,
        }
    }

    /// Create a CreationFailed error
    #[inline]
    pub fn creation_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CreationFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a TypeMismatch error for the expected type `T`
    #[inline]
    pub fn type_mismatch<T: ?Sized>(subject: impl Into<String>) -> Self {
        Self::TypeMismatch {
            subject: subject.into(),
            expected: std::any::type_name::<T>(),
        }
    }

    /// The repeating part of a circular dependency path.
    ///
    /// For `A -> B -> C -> B` this is `B -> C -> B`. Returns `None` for
    /// every other error kind.
    pub fn cycle(&self) -> Option<&[String]> {
        match self {
            Self::CircularDependency { path } => {
                let last = path.last()?;
                let start = path.iter().position(|name| name == last)?;
                Some(&path[start..])
            }
            _ => None,
        }
    }
}

fn format_path(path: &[String]) -> String {
    path.iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type alias for DI operations
pub type Result<T> = std::result::Result<T, DiError>;
