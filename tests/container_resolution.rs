// tests/container_resolution.rs

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use stepwise::container::{
    Container, ContainerOptions, Injectable, InstanceScope, LifetimeScope, Resolver,
};
use stepwise::StepwiseError;
use stepwise_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct English;

impl Greeter for English {
    fn greet(&self) -> String {
        "hello".to_string()
    }
}

struct French;

impl Greeter for French {
    fn greet(&self) -> String {
        "bonjour".to_string()
    }
}

struct Counter(usize);

struct Config {
    name: &'static str,
}

struct Service {
    config: Arc<Config>,
}

impl Injectable for Service {
    fn construct(resolver: &Resolver<'_>) -> anyhow::Result<Self> {
        Ok(Service {
            config: resolver.resolve::<Config>()?,
        })
    }
}

fn counting(counter: &Arc<AtomicUsize>) -> impl Fn(&Resolver<'_>) -> anyhow::Result<Counter> + Send + Sync + 'static {
    let counter = Arc::clone(counter);
    move |_| Ok(Counter(counter.fetch_add(1, Ordering::SeqCst)))
}

#[test]
fn single_is_shared_with_nested_scopes() -> TestResult {
    init_tracing();

    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Single, counting(&built));
    })?;

    let scenario = root.begin_scope(LifetimeScope::Scenario)?;
    let local = scenario.begin_scope(LifetimeScope::Local)?;

    let a = root.resolve::<Counter>()?;
    let b = scenario.resolve::<Counter>()?;
    let c = local.resolve::<Counter>()?;

    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&b, &c));
    assert_eq!(built.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn transient_builds_every_time() -> TestResult {
    init_tracing();

    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Transient, counting(&built));
    })?;

    let a = root.resolve::<Counter>()?;
    let b = root.resolve::<Counter>()?;

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!((a.0, b.0), (0, 1));
    Ok(())
}

#[test]
fn local_is_cached_per_scope() -> TestResult {
    init_tracing();

    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Local, counting(&built));
    })?;

    let first = root.begin_scope(LifetimeScope::Scenario)?;
    let second = root.begin_scope(LifetimeScope::Scenario)?;

    let a1 = first.resolve::<Counter>()?;
    let a2 = first.resolve::<Counter>()?;
    let b = second.resolve::<Counter>()?;
    let nested = first.begin_scope(LifetimeScope::Local)?.resolve::<Counter>()?;

    assert!(Arc::ptr_eq(&a1, &a2));
    assert!(!Arc::ptr_eq(&a1, &b));
    assert!(!Arc::ptr_eq(&a1, &nested));
    Ok(())
}

#[test]
fn scenario_scoped_instances_are_shared_within_one_scenario_only() -> TestResult {
    init_tracing();

    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Scenario, counting(&built));
    })?;

    let scenario_a = root.begin_scope(LifetimeScope::Scenario)?;
    let scenario_b = root.begin_scope(LifetimeScope::Scenario)?;
    let local_a = scenario_a.begin_scope(LifetimeScope::Local)?;

    let a = scenario_a.resolve::<Counter>()?;
    let a_local = local_a.resolve::<Counter>()?;
    let b = scenario_b.resolve::<Counter>()?;

    assert!(Arc::ptr_eq(&a, &a_local));
    assert!(!Arc::ptr_eq(&a, &b));
    Ok(())
}

#[test]
fn restricted_registration_outside_its_level_is_a_scope_mismatch() -> TestResult {
    init_tracing();

    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Scenario, counting(&built));
    })?;

    let err = root.resolve::<Counter>().err().expect("global scope must not build it");
    assert!(
        matches!(
            &err,
            StepwiseError::ScopeMismatch { required, current, .. }
                if required == "scenario" && current == "global"
        ),
        "got {err:?}"
    );

    let local = root.begin_scope(LifetimeScope::Local)?;
    assert!(matches!(
        local.resolve::<Counter>(),
        Err(StepwiseError::ScopeMismatch { .. })
    ));
    assert_eq!(built.load(Ordering::SeqCst), 0);
    Ok(())
}

#[test]
fn named_levels_anchor_restricted_registrations() -> TestResult {
    init_tracing();

    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Single, counting(&built))
            .restricted_to(LifetimeScope::Named("batch"));
    })?;

    let batch = root.begin_scope(LifetimeScope::Named("batch"))?;
    let scenario = batch.begin_scope(LifetimeScope::Scenario)?;

    let a = batch.resolve::<Counter>()?;
    let b = scenario.resolve::<Counter>()?;
    assert!(Arc::ptr_eq(&a, &b));
    assert!(root.resolve::<Counter>().is_err());
    Ok(())
}

#[test]
fn aliases_resolve_to_the_same_instance() -> TestResult {
    init_tracing();

    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Single, |_| Ok(English))
            .as_alias::<dyn Greeter>(|e| e as Arc<dyn Greeter>);
    })?;

    let concrete = root.resolve::<English>()?;
    let greeter = root.resolve::<dyn Greeter>()?;

    assert_eq!(greeter.greet(), "hello");
    assert_eq!(
        Arc::as_ptr(&concrete) as *const u8,
        Arc::as_ptr(&greeter) as *const u8
    );
    Ok(())
}

#[test]
fn nearest_registration_shadows_the_parent() -> TestResult {
    init_tracing();

    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Single, |_| Ok(English))
            .as_alias::<dyn Greeter>(|e| e as Arc<dyn Greeter>);
    })?;

    let child = root.begin_scope_with(LifetimeScope::Scenario, |c| {
        c.register(InstanceScope::Single, |_| Ok(French))
            .as_alias::<dyn Greeter>(|f| f as Arc<dyn Greeter>);
    })?;

    assert_eq!(child.resolve::<dyn Greeter>()?.greet(), "bonjour");
    assert_eq!(root.resolve::<dyn Greeter>()?.greet(), "hello");
    // The concrete English registration is still reachable through the parent.
    assert_eq!(child.resolve::<English>()?.greet(), "hello");
    Ok(())
}

#[test]
fn duplicate_registration_fails_at_scope_construction() -> TestResult {
    init_tracing();

    let err = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Single, |_| Ok(English));
        c.register(InstanceScope::Transient, |_| Ok(English));
    })
    .err()
    .expect("second registration of the same type must be rejected");
    assert!(matches!(err, StepwiseError::DuplicateRegistration(_)), "got {err:?}");

    let root = Container::new(ContainerOptions::default(), |_| {})?;
    let err = root
        .begin_scope_with(LifetimeScope::Scenario, |c| {
            c.register(InstanceScope::Single, |_| Ok(English))
                .as_alias::<dyn Greeter>(|e| e as Arc<dyn Greeter>);
            c.register(InstanceScope::Single, |_| Ok(French))
                .as_alias::<dyn Greeter>(|f| f as Arc<dyn Greeter>);
        })
        .err()
        .expect("two registrations exposing one alias must be rejected");
    assert!(matches!(err, StepwiseError::DuplicateRegistration(_)));
    Ok(())
}

#[test]
fn unregistered_types_are_reported_or_constructed_implicitly() -> TestResult {
    init_tracing();

    let root = Container::new(ContainerOptions::default(), |c| {
        c.register_instance(Arc::new(Config { name: "primary" }));
    })?;

    assert!(matches!(
        root.resolve::<Service>(),
        Err(StepwiseError::UnregisteredDependency(_))
    ));

    let first = root.create::<Service>()?;
    let second = root.create::<Service>()?;
    assert_eq!(first.config.name, "primary");
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.config, &second.config));
    Ok(())
}

#[test]
fn registered_injectable_uses_its_slot() -> TestResult {
    init_tracing();

    let root = Container::new(ContainerOptions::default(), |c| {
        c.register_instance(Arc::new(Config { name: "primary" }));
        c.register_injectable::<Service>(InstanceScope::Single);
    })?;

    let a = root.create::<Service>()?;
    let b = root.resolve::<Service>()?;
    assert!(Arc::ptr_eq(&a, &b));
    Ok(())
}

#[test]
fn container_resolves_itself() -> TestResult {
    init_tracing();

    let root = Container::new(ContainerOptions::default(), |_| {})?;
    let scenario = root.begin_scope(LifetimeScope::Scenario)?;

    let handle = scenario.resolve::<Container>()?;
    assert_eq!(handle.level(), LifetimeScope::Scenario);
    Ok(())
}

#[test]
fn global_level_is_reserved_for_the_root() -> TestResult {
    init_tracing();

    let root = Container::new(ContainerOptions::default(), |_| {})?;
    assert!(matches!(
        root.begin_scope(LifetimeScope::Global),
        Err(StepwiseError::InvalidScope(_))
    ));
    Ok(())
}

#[test]
fn construction_errors_name_the_type() -> TestResult {
    init_tracing();

    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Single, |_| -> anyhow::Result<English> {
            anyhow::bail!("missing locale")
        });
    })?;

    let err = root.resolve::<English>().err().expect("factory fails");
    match err {
        StepwiseError::Construction { type_name, source } => {
            assert!(type_name.ends_with("English"), "type name: {type_name}");
            assert_eq!(source.to_string(), "missing locale");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn restricted_local_is_shared_below_its_anchor() -> TestResult {
    init_tracing();

    let built = Arc::new(AtomicUsize::new(0));
    let root = Container::new(ContainerOptions::default(), |c| {
        c.register(InstanceScope::Local, counting(&built))
            .restricted_to(LifetimeScope::Scenario);
    })?;

    let scenario = root.begin_scope(LifetimeScope::Scenario)?;
    let step = scenario.begin_scope(LifetimeScope::Local)?;
    let nested = step.begin_scope(LifetimeScope::Local)?;

    let anchored = scenario.resolve::<Counter>()?;
    let from_step = step.resolve::<Counter>()?;
    let from_nested = nested.resolve::<Counter>()?;

    assert!(Arc::ptr_eq(&anchored, &from_step));
    assert!(Arc::ptr_eq(&anchored, &from_nested));
    assert_eq!(built.load(Ordering::SeqCst), 1);

    let other = root.begin_scope(LifetimeScope::Scenario)?;
    assert!(!Arc::ptr_eq(&anchored, &other.resolve::<Counter>()?));
    assert!(matches!(
        root.resolve::<Counter>(),
        Err(StepwiseError::ScopeMismatch { .. })
    ));
    Ok(())
}
