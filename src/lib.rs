//! # Wirebox - Name-Keyed Dependency Injection for Rust
//!
//! A dependency injection container that stores deferred *injectables*
//! (values, constructors or functions plus the names of their dependencies)
//! and produces fully wired instances on demand.
//!
//! ## Features
//!
//! - 🏷️ **Name-keyed** - Injectables are registered and resolved by name;
//!   names can be explicit or inferred from types
//! - 🏭 **Pluggable factories** - Identity, class-style and function-style
//!   bootstrapping built in, or bring your own [`Factory`]
//! - ♻️ **Pluggable scopes** - Singleton and prototype built in, or derive
//!   cache keys from a request context with your own [`Scope`]
//! - 🔁 **Cycle detection** - Circular dependencies fail with the full path
//! - 🧾 **Transactional** - A failed resolution caches nothing
//! - 🔒 **Thread-safe** - `DashMap`-backed registry and instance caches
//! - 📊 **Observable** - Optional tracing integration with JSON or pretty output
//!
//! ## Quick Start
//!
//! ```rust
//! use wirebox::{ClassFactory, Container, InjectableOptions, Initializer};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let container = Container::new();
//!
//! // A plain value under an explicit name
//! container
//!     .register(
//!         Initializer::value(Database { url: "postgres://localhost".into() }),
//!         InjectableOptions::new().name("database"),
//!     )
//!     .unwrap();
//!
//! // A class whose name ("UserService") is inferred from its type
//! container
//!     .register(
//!         Initializer::class(|args| Ok(UserService { db: args.get(0)? })),
//!         InjectableOptions::new()
//!             .factory(ClassFactory)
//!             .dependencies(["database"]),
//!     )
//!     .unwrap();
//!
//! let users = container.get::<UserService>("UserService", None).unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! ```
//!
//! ## Scopes
//!
//! ```rust
//! use wirebox::{scope, ClassFactory, Container, InjectableOptions, Initializer, PrototypeScope};
//! use std::sync::Arc;
//!
//! struct RequestId(u64);
//! struct Tenant(&'static str);
//! struct Connection;
//!
//! let container: Container<Tenant> = Container::default();
//!
//! // Prototype - new instance on every retrieval
//! container
//!     .register(
//!         Initializer::class(|_| Ok(RequestId(0))),
//!         InjectableOptions::new().factory(ClassFactory).scope(PrototypeScope),
//!     )
//!     .unwrap();
//!
//! // Per-tenant - one instance per context key
//! container
//!     .register(
//!         Initializer::class(|_| Ok(Connection)),
//!         InjectableOptions::new()
//!             .factory(ClassFactory)
//!             .scope(scope::from_fn(|tenant: Option<&Tenant>, name: &str| {
//!                 tenant.map(|t| format!("{name}/{}", t.0))
//!             })),
//!     )
//!     .unwrap();
//!
//! let acme = Tenant("acme");
//! let a = container.get_instance("Connection", Some(&acme)).unwrap();
//! let b = container.get_instance("Connection", Some(&acme)).unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

mod config;
mod container;
mod error;
pub mod factory;
mod initializer;
#[cfg(feature = "logging")]
pub mod logging;
mod name;
mod provider;
mod registry;
mod resolve;
pub mod scope;

pub use config::*;
pub use container::*;
pub use error::*;
pub use factory::{ClassFactory, Factory, FunctionFactory, IdentityFactory};
pub use initializer::*;
pub use name::*;
pub use provider::*;
pub use registry::{InjectableEntry, InjectableOptions};
pub use scope::{PrototypeScope, Scope, SingletonScope};

// Re-export tracing macros for convenience when logging feature is enabled
#[cfg(feature = "logging")]
pub use tracing::{debug, error, info, trace, warn};

// Re-export for convenience
pub use std::sync::Arc;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Arguments, BoundFunction, ClassFactory, Container, ContainerConfig, ContextPropagation,
        DiError, Factory, FunctionFactory, IdentityFactory, InjectableOptions, Initializer,
        Instance, Nameable, PrototypeScope, Result, Scope, SingletonScope, instance,
    };
    pub use std::sync::Arc;
}
