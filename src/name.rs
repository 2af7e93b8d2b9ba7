//! Name resolution for injectables
//!
//! Every injectable is keyed by a canonical string name. Callers refer to
//! injectables through a [`Nameable`]: an explicit name, an initializer to
//! infer a name from, or a Rust type. A [`NameResolver`] turns a nameable into
//! the canonical name or fails with [`DiError::NameResolution`].

use crate::{DiError, Initializer, Result};

/// A reference to an injectable that can be converted to a canonical name.
#[derive(Clone, Debug)]
pub enum Nameable {
    /// An explicit name, used verbatim
    Name(String),
    /// A value whose name is inferred (see [`Initializer::inferred_name`])
    Value(Initializer),
    /// A Rust type, named by its short type name
    Type(&'static str),
}

impl Nameable {
    /// Refer to an injectable by the Rust type it constructs.
    ///
    /// Resolves to the same name a class initializer for `T` infers.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Type(std::any::type_name::<T>())
    }
}

impl From<&str> for Nameable {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<String> for Nameable {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for Nameable {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<Initializer> for Nameable {
    fn from(value: Initializer) -> Self {
        Self::Value(value)
    }
}

impl From<&Initializer> for Nameable {
    fn from(value: &Initializer) -> Self {
        Self::Value(value.clone())
    }
}

/// Maps a [`Nameable`] to a canonical name.
///
/// Implementations must be deterministic for a given value.
pub trait NameResolver: Send + Sync {
    /// Resolve the canonical name, or fail with [`DiError::NameResolution`]
    fn resolve(&self, nameable: &Nameable) -> Result<String>;
}

/// The built-in resolver.
///
/// - explicit names resolve to themselves, including the empty name
/// - initializers resolve to their label, or to the short type name for
///   class initializers; plain values and anonymous functions fail
/// - types resolve to their short type name
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNameResolver;

impl NameResolver for DefaultNameResolver {
    fn resolve(&self, nameable: &Nameable) -> Result<String> {
        match nameable {
            Nameable::Name(name) => Ok(name.clone()),
            Nameable::Value(initializer) => initializer
                .inferred_name()
                .map(str::to_owned)
                .ok_or_else(|| DiError::name_resolution(initializer.to_string())),
            Nameable::Type(type_name) => Ok(short_type_name(type_name)),
        }
    }
}

/// Strip module paths from a type name, keeping generic structure.
///
/// `alloc::vec::Vec<app::model::User>` becomes `Vec<User>`.
pub fn short_type_name(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len());
    // Start of the path segment currently being written
    let mut segment_start = 0;
    let mut chars = type_name.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.truncate(segment_start);
            }
            c if c.is_alphanumeric() || c == '_' => out.push(c),
            c => {
                out.push(c);
                segment_start = out.len();
            }
        }
    }

    out
}
