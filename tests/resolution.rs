use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use wirebox::{
    BoundFunction, ClassFactory, Container, ContainerConfig, ContextPropagation, DiError,
    FunctionFactory, InjectableOptions, Initializer, NameResolver, Nameable, PrototypeScope,
    Result, factory, instance, scope,
};

struct ServiceA;

struct ServiceB {
    a: Arc<ServiceA>,
}

#[test]
fn test_identity_returns_initializer_unchanged() {
    let container = Container::new();
    let a = Arc::new(ServiceA);
    container
        .register(Initializer::from_arc(Arc::clone(&a)), InjectableOptions::new().name("A"))
        .unwrap();

    let first = container.get::<ServiceA>("A", None).unwrap();
    let second = container.get::<ServiceA>("A", None).unwrap();

    assert!(Arc::ptr_eq(&first, &a));
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_class_constructs_with_dependency_once() {
    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    let container = Container::new();
    container
        .register(Initializer::value(ServiceA), InjectableOptions::new().name("A"))
        .unwrap();
    container
        .register(
            Initializer::class(|args| {
                CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
                Ok(ServiceB { a: args.get(0)? })
            }),
            InjectableOptions::new()
                .name("B")
                .factory(ClassFactory)
                .dependencies(["A"]),
        )
        .unwrap();

    let b1 = container.get::<ServiceB>("B", None).unwrap();
    let b2 = container.get::<ServiceB>("B", None).unwrap();
    let a = container.get::<ServiceA>("A", None).unwrap();

    assert!(Arc::ptr_eq(&b1, &b2));
    assert!(Arc::ptr_eq(&b1.a, &a));
    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_circular_message() {
    let container = Container::new();
    container
        .register(
            Initializer::value(()),
            InjectableOptions::new().name("X").dependencies(["Y"]),
        )
        .unwrap();
    container
        .register(
            Initializer::value(()),
            InjectableOptions::new().name("Y").dependencies(["X"]),
        )
        .unwrap();

    let err = container.get_instance("X", None).unwrap_err();
    assert_eq!(err.to_string(), "Circular dependencies found: 'X' -> 'Y' -> 'X'.");

    let err = container.get_instance("Y", None).unwrap_err();
    assert_eq!(
        err,
        DiError::circular(vec!["Y".into(), "X".into(), "Y".into()])
    );
}

#[test]
fn test_self_dependency() {
    let container = Container::new();
    container
        .register(
            Initializer::value(()),
            InjectableOptions::new().name("loop").dependencies(["loop"]),
        )
        .unwrap();

    let err = container.get_instance("loop", None).unwrap_err();
    assert_eq!(err.cycle().map(<[String]>::len), Some(2));
}

#[test]
fn test_cycle_below_entry_point() {
    let container = Container::new();
    for (name, dependency) in [("root", "a"), ("a", "b"), ("b", "c"), ("c", "a")] {
        container
            .register(
                Initializer::value(()),
                InjectableOptions::new().name(name).dependencies([dependency]),
            )
            .unwrap();
    }

    let err = container.get_instance("root", None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Circular dependencies found: 'root' -> 'a' -> 'b' -> 'c' -> 'a'."
    );
    assert_eq!(err.cycle().unwrap(), ["a", "b", "c", "a"]);
}

#[test]
fn test_prototype_distinct_identities() {
    let container = Container::new();
    container
        .register(
            Initializer::class(|_| Ok(ServiceA)),
            InjectableOptions::new()
                .name("P")
                .factory(ClassFactory)
                .scope(PrototypeScope),
        )
        .unwrap();

    let p1 = container.get_instance("P", None).unwrap();
    let p2 = container.get_instance("P", None).unwrap();
    assert!(!Arc::ptr_eq(&p1, &p2));
}

#[test]
fn test_missing_on_empty_container() {
    let container = Container::new();
    let err = container.get_instance("Ghost", None).unwrap_err();

    assert_eq!(err.to_string(), "Injectable 'Ghost' does not exist.");
    assert!(container.is_empty());
    assert!(!container.has("Ghost").unwrap());
}

#[test]
fn test_duplicate_keeps_first_registration() {
    let container = Container::new();
    container
        .register(Initializer::value(1_u32), InjectableOptions::new().name("dup"))
        .unwrap();

    let err = container
        .register(Initializer::value(2_u32), InjectableOptions::new().name("dup"))
        .unwrap_err();

    assert_eq!(err.to_string(), "Name already exists: 'dup'.");
    assert_eq!(container.names(), ["dup"]);
    assert_eq!(*container.get::<u32>("dup", None).unwrap(), 1);
}

#[test]
fn test_duplicate_inferred_name() {
    let container = Container::new();
    let options = || InjectableOptions::new().factory(ClassFactory);

    container
        .register(Initializer::class(|_| Ok(ServiceA)), options())
        .unwrap();
    let err = container
        .register(Initializer::class(|_| Ok(ServiceA)), options())
        .unwrap_err();

    assert_eq!(err, DiError::already_registered("ServiceA"));
}

#[test]
fn test_unnameable_dependency_rejected() {
    let container = Container::new();
    let err = container
        .register(
            Initializer::value(()),
            InjectableOptions::new()
                .name("consumer")
                .dependency(Initializer::function(|_| Ok(()))),
        )
        .unwrap_err();

    assert!(matches!(err, DiError::NameResolution { .. }));
    assert!(!container.has("consumer").unwrap());
}

#[test]
fn test_has_instance_unnameable() {
    let container = Container::new();
    let err = container
        .has_instance(Initializer::function(|_| Ok(())), None)
        .unwrap_err();

    assert!(matches!(err, DiError::NameResolution { .. }));
}

#[test]
fn test_empty_name_is_a_name() {
    let container = Container::new();
    container
        .register(Initializer::value(7_u8), InjectableOptions::new().name(""))
        .unwrap();

    assert!(container.has("").unwrap());
    assert_eq!(*container.get::<u8>("", None).unwrap(), 7);
    assert_eq!(
        container
            .register(Initializer::value(8_u8), InjectableOptions::new().name(""))
            .unwrap_err()
            .to_string(),
        "Name already exists: ''."
    );
}

#[test]
fn test_dependency_by_initializer_and_type() {
    let container = Container::new();
    let a = Initializer::class(|_| Ok(ServiceA));
    container
        .register(a.clone(), InjectableOptions::new().factory(ClassFactory))
        .unwrap();
    container
        .register(
            Initializer::class(|args| Ok(ServiceB { a: args.get(0)? })),
            InjectableOptions::new()
                .factory(ClassFactory)
                .dependency(&a),
        )
        .unwrap();

    assert!(container.has(&a).unwrap());
    let b = container.get::<ServiceB>(Nameable::of::<ServiceB>(), None).unwrap();
    let a = container.get::<ServiceA>(Nameable::of::<ServiceA>(), None).unwrap();
    assert!(Arc::ptr_eq(&b.a, &a));
}

#[test]
fn test_dependency_order_is_declared_order() {
    let container = Container::new();
    for name in ["d3", "d1", "d2"] {
        container
            .register(Initializer::value(name), InjectableOptions::new().name(name))
            .unwrap();
    }
    container
        .register(
            Initializer::class(|args| {
                (0..args.len())
                    .map(|i| args.get::<&str>(i).map(|name| *name))
                    .collect::<Result<Vec<_>>>()
            }),
            InjectableOptions::new()
                .name("ordered")
                .factory(ClassFactory)
                .dependencies(["d1", "d2", "d3", "d1"]),
        )
        .unwrap();

    let order = container.get::<Vec<&str>>("ordered", None).unwrap();
    assert_eq!(*order, ["d1", "d2", "d3", "d1"]);
}

#[test]
fn test_non_constructible_initializers() {
    let container = Container::new();
    container
        .register(
            Initializer::value(5_u8),
            InjectableOptions::new().name("class").factory(ClassFactory),
        )
        .unwrap();
    container
        .register(
            Initializer::value(5_u8),
            InjectableOptions::new().name("function").factory(FunctionFactory),
        )
        .unwrap();

    assert_eq!(
        container.get_instance("class", None).unwrap_err(),
        DiError::non_constructible("class", "constructor")
    );
    assert_eq!(
        container.get_instance("function", None).unwrap_err(),
        DiError::non_constructible("function", "function")
    );
}

#[test]
fn test_function_factory_prepends_dependencies() {
    let container = Container::new();
    container
        .register(Initializer::value(String::from("Hello")), InjectableOptions::new().name("greeting"))
        .unwrap();
    container
        .register(
            Initializer::function(|args| {
                Ok(format!("{}, {}!", args.get::<String>(0)?, args.get::<String>(1)?))
            })
            .named("greet"),
            InjectableOptions::new()
                .factory(FunctionFactory)
                .dependencies(["greeting"]),
        )
        .unwrap();

    let greet = container.get::<BoundFunction>("greet", None).unwrap();
    assert_eq!(greet.dependencies().len(), 1);

    let message = greet
        .call_as::<String, _>([instance(String::from("world"))])
        .unwrap();
    assert_eq!(message.as_str(), "Hello, world!");

    let err = greet.call([]).unwrap_err();
    assert_eq!(err, DiError::MissingArgument { index: 1, len: 1 });
}

#[test]
fn test_constructor_failure_is_propagated() {
    let container = Container::new();
    container
        .register(
            Initializer::class(|_| -> Result<ServiceA> {
                Err(DiError::creation_failed("ServiceA", "database offline"))
            }),
            InjectableOptions::new().factory(ClassFactory),
        )
        .unwrap();

    let err = container.get_instance("ServiceA", None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to create injectable 'ServiceA': database offline"
    );
    assert!(!container.has_instance("ServiceA", None).unwrap());
}

#[test]
fn test_cached_singleton_short_circuits_dependencies() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);

    let container = Container::new();
    container
        .register(
            Initializer::class(|_| {
                BUILT.fetch_add(1, Ordering::SeqCst);
                Ok(ServiceA)
            }),
            InjectableOptions::new()
                .name("leaf")
                .factory(ClassFactory)
                .scope(PrototypeScope),
        )
        .unwrap();
    container
        .register(
            Initializer::class(|args| Ok(ServiceB { a: args.get(0)? })),
            InjectableOptions::new()
                .name("parent")
                .factory(ClassFactory)
                .dependencies(["leaf"]),
        )
        .unwrap();

    container.get_instance("parent", None).unwrap();
    container.get_instance("parent", None).unwrap();

    // The prototype leaf is only resolved while the singleton parent is built
    assert_eq!(BUILT.load(Ordering::SeqCst), 1);
}

#[test]
fn test_custom_factory_receives_context_and_name() {
    let container: Container<String> = Container::default();
    container
        .register(
            Initializer::value(()),
            InjectableOptions::new()
                .name("echo")
                .scope(PrototypeScope)
                .factory(factory::from_fn(
                    |_init: &Initializer, _deps, ctx: Option<&String>, name: &str| {
                        Ok(instance(format!("{name}:{}", ctx.map_or("-", String::as_str))))
                    },
                )),
        )
        .unwrap();

    let with = container
        .get::<String>("echo", Some(&"req-1".to_string()))
        .unwrap();
    let without = container.get::<String>("echo", None).unwrap();

    assert_eq!(with.as_str(), "echo:req-1");
    assert_eq!(without.as_str(), "echo:-");
}

// =============================================================================
// Context propagation
// =============================================================================

struct Tenant(&'static str);

struct TenantName(String);

struct Handler {
    tenant: Arc<TenantName>,
}

/// `Handler` depends on `TenantName`, which is cached per tenant and built
/// from the context it was resolved with.
fn tenant_container(propagation: ContextPropagation) -> Container<Tenant> {
    let container = Container::with_config(
        ContainerConfig::new().with_context_propagation(propagation),
    );
    container
        .register(
            Initializer::value(()),
            InjectableOptions::new()
                .name("TenantName")
                .scope(scope::from_fn(|ctx: Option<&Tenant>, name: &str| {
                    Some(format!("{name}/{}", ctx.map_or("none", |tenant| tenant.0)))
                }))
                .factory(factory::from_fn(
                    |_init: &Initializer, _deps, ctx: Option<&Tenant>, _name: &str| {
                        let tenant = ctx.map_or("none", |tenant| tenant.0);
                        Ok(instance(TenantName(tenant.to_owned())))
                    },
                )),
        )
        .unwrap();
    container
        .register(
            Initializer::class(|args| Ok(Handler { tenant: args.get(0)? })),
            InjectableOptions::new()
                .factory(ClassFactory)
                .scope(PrototypeScope)
                .dependencies(["TenantName"]),
        )
        .unwrap();
    container
}

#[test]
fn test_context_propagates_to_dependencies_by_default() {
    let container = tenant_container(ContextPropagation::default());

    let acme = container.get::<Handler>("Handler", Some(&Tenant("acme"))).unwrap();
    let globex = container.get::<Handler>("Handler", Some(&Tenant("globex"))).unwrap();

    assert_eq!(acme.tenant.0, "acme");
    assert_eq!(globex.tenant.0, "globex");
    assert!(container.has_instance("TenantName", Some(&Tenant("acme"))).unwrap());
    assert!(!container.has_instance("TenantName", None).unwrap());
}

#[test]
fn test_context_reset_below_first_level() {
    let container = tenant_container(ContextPropagation::Reset);

    let acme = container.get::<Handler>("Handler", Some(&Tenant("acme"))).unwrap();
    let globex = container.get::<Handler>("Handler", Some(&Tenant("globex"))).unwrap();

    assert_eq!(acme.tenant.0, "none");
    assert!(Arc::ptr_eq(&acme.tenant, &globex.tenant));
    assert!(container.has_instance("TenantName", None).unwrap());
    assert!(!container.has_instance("TenantName", Some(&Tenant("acme"))).unwrap());

    // The requested injectable itself still sees the context
    let direct = container.get::<TenantName>("TenantName", Some(&Tenant("acme"))).unwrap();
    assert_eq!(direct.0, "acme");
}

// =============================================================================
// Custom name resolver
// =============================================================================

struct LowercaseResolver;

impl NameResolver for LowercaseResolver {
    fn resolve(&self, nameable: &Nameable) -> Result<String> {
        match nameable {
            Nameable::Name(name) => Ok(name.to_lowercase()),
            other => Err(DiError::name_resolution(format!("{other:?}"))),
        }
    }
}

#[test]
fn test_custom_name_resolver() {
    let container: Container =
        Container::with_config(ContainerConfig::new().with_name_resolver(LowercaseResolver));
    container
        .register(Initializer::value(1_u8), InjectableOptions::new().name("Config"))
        .unwrap();

    assert!(container.has("CONFIG").unwrap());
    assert_eq!(container.names(), ["config"]);
    assert!(matches!(
        container.has(Nameable::of::<ServiceA>()),
        Err(DiError::NameResolution { .. })
    ));
}
