//! Wiring a small application graph
//!
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;
use wirebox::prelude::*;
use wirebox::{autowired, injectable};

struct Config {
    greeting: String,
}

struct Greeter {
    config: Arc<Config>,
}

impl Greeter {
    fn greet(&self, who: &str) -> String {
        format!("{}, {who}!", self.config.greeting)
    }
}

fn main() -> Result<()> {
    let container = Container::new();

    // Plain value under an explicit name
    container.register(
        Initializer::value(Config {
            greeting: "Hello".into(),
        }),
        InjectableOptions::new().name("config"),
    )?;

    // Class registered through the macro sugar, named "Greeter"
    injectable!(
        container,
        Greeter => |args| Ok(Greeter { config: args.get(0)? }),
        deps = ["config"]
    )?;

    // Function bound to its dependency; extra arguments come at call time
    container.register(
        Initializer::function(|args| {
            let greeter = args.get::<Greeter>(0)?;
            let who = args.get::<String>(1)?;
            Ok(greeter.greet(&who))
        })
        .named("greet"),
        InjectableOptions::new()
            .factory(FunctionFactory)
            .scope(PrototypeScope)
            .dependencies(["Greeter"]),
    )?;

    let greeter: Arc<Greeter> = autowired!(container, Greeter)?;
    println!("{}", greeter.greet("world"));

    let greet = container.get::<BoundFunction>("greet", None)?;
    let message = greet.call_as::<String, _>([instance(String::from("container"))])?;
    println!("{message}");

    // Cycles are reported with their full path
    container.register(
        Initializer::value(()),
        InjectableOptions::new().name("chicken").dependencies(["egg"]),
    )?;
    container.register(
        Initializer::value(()),
        InjectableOptions::new().name("egg").dependencies(["chicken"]),
    )?;
    if let Err(err) = container.get_instance("chicken", None) {
        println!("{err}");
    }

    println!("registered: {:?}", container.names());
    Ok(())
}
