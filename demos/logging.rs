//! Example demonstrating logging capabilities
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use wirebox::{ClassFactory, Container, InjectableOptions, Initializer, PrototypeScope};

#[allow(dead_code)]
struct Database {
    url: String,
}

#[allow(dead_code)]
struct RequestContext {
    request_id: u64,
}

fn main() {
    wirebox::logging::builder()
        .with_level(tracing::Level::TRACE)
        .wirebox_only()
        .pretty()
        .init()
        .ok();

    println!("=== Wirebox Logging Demo ===\n");

    // logs: "Creating new DI container"
    let container = Container::new();

    // logs: "Registering injectable"
    container
        .register(
            Initializer::value(Database {
                url: "postgres://localhost/mydb".into(),
            }),
            InjectableOptions::new().name("database"),
        )
        .unwrap();
    container
        .register(
            Initializer::class(|_| Ok(RequestContext { request_id: 7 })),
            InjectableOptions::new()
                .factory(ClassFactory)
                .scope(PrototypeScope)
                .dependencies(["database"]),
        )
        .unwrap();

    // logs: "Instantiating injectable" twice (prototype), then a cache hit for the database
    container.get_instance("RequestContext", None).unwrap();
    container.get_instance("RequestContext", None).unwrap();

    // logs: "Resolution failed, nothing cached"
    let missing = container.get_instance("cache", None);
    assert!(missing.is_err());

    println!("\n=== Demo Complete ===");
    println!("\nTip: Use --features logging-json for production (JSON output)");
    println!("     Use --features logging-pretty for development (colorful output)");
}
