//! Service catalog tests

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use weft_domain::{CompositionContainer, CreationPolicy, Error, Registration, Result};
use weft_infrastructure::di::ServiceCatalog;

trait Greeter: Send + Sync {
    fn greet(&self) -> String;
}

struct Hello(usize);

impl Greeter for Hello {
    fn greet(&self) -> String {
        format!("hello #{}", self.0)
    }
}

fn registration(implementation: &str, policy: CreationPolicy, created: Arc<AtomicUsize>) -> Registration {
    Registration {
        contract: "tests::Greeter".to_string(),
        implementation: implementation.to_string(),
        policy,
        factory: Arc::new(move || -> Result<Box<dyn Any + Send + Sync>> {
            let n = created.fetch_add(1, Ordering::SeqCst);
            let object: Arc<dyn Greeter + Send + Sync> = Arc::new(Hello(n));
            Ok(Box::new(object))
        }),
    }
}

#[test]
fn test_shared_instance_is_created_once() {
    let created = Arc::new(AtomicUsize::new(0));
    let mut catalog = ServiceCatalog::new();
    catalog
        .register(registration("Hello", CreationPolicy::Shared, Arc::clone(&created)))
        .unwrap();

    let first: Arc<dyn Greeter + Send + Sync> = catalog.resolve("tests::Greeter").unwrap();
    let second: Arc<dyn Greeter + Send + Sync> = catalog.resolve("tests::Greeter").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(first.greet(), "hello #0");
}

#[test]
fn test_any_policy_behaves_as_shared() {
    let created = Arc::new(AtomicUsize::new(0));
    let mut catalog = ServiceCatalog::new();
    catalog
        .register(registration("Hello", CreationPolicy::Any, Arc::clone(&created)))
        .unwrap();

    let _: Arc<dyn Greeter + Send + Sync> = catalog.resolve("tests::Greeter").unwrap();
    let _: Arc<dyn Greeter + Send + Sync> = catalog.resolve("tests::Greeter").unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_non_shared_instance_is_created_per_resolve() {
    let created = Arc::new(AtomicUsize::new(0));
    let mut catalog = ServiceCatalog::new();
    catalog
        .register(registration("Hello", CreationPolicy::NonShared, Arc::clone(&created)))
        .unwrap();

    let first: Arc<dyn Greeter + Send + Sync> = catalog.resolve("tests::Greeter").unwrap();
    let second: Arc<dyn Greeter + Send + Sync> = catalog.resolve("tests::Greeter").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.greet(), "hello #1");
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let created = Arc::new(AtomicUsize::new(0));
    let mut catalog = ServiceCatalog::new();
    catalog
        .register(registration("Hello", CreationPolicy::Shared, Arc::clone(&created)))
        .unwrap();
    let duplicate = catalog.register(registration("Hello", CreationPolicy::Shared, created));

    assert!(matches!(duplicate, Err(Error::Registration { .. })));
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_resolve_all_keeps_registration_order_and_resolve_takes_last() {
    let created = Arc::new(AtomicUsize::new(0));
    let mut catalog = ServiceCatalog::new();
    catalog
        .register(registration("First", CreationPolicy::NonShared, Arc::clone(&created)))
        .unwrap();
    catalog
        .register(registration("Second", CreationPolicy::NonShared, Arc::clone(&created)))
        .unwrap();

    let all: Vec<Arc<dyn Greeter + Send + Sync>> = catalog.resolve_all("tests::Greeter").unwrap();
    assert_eq!(all.len(), 2);
    let names: Vec<&str> = catalog
        .registrations("tests::Greeter")
        .iter()
        .map(|r| r.implementation.as_str())
        .collect();
    assert_eq!(names, ["First", "Second"]);
    assert_eq!(catalog.contracts(), ["tests::Greeter"]);

    let last: Arc<dyn Greeter + Send + Sync> = catalog.resolve("tests::Greeter").unwrap();
    assert_eq!(last.greet(), "hello #2");
}

#[test]
fn test_unknown_contract_is_not_found() {
    let catalog = ServiceCatalog::new();
    let result = catalog.resolve::<dyn Greeter + Send + Sync>("tests::Missing");
    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert!(catalog.resolve_all::<dyn Greeter + Send + Sync>("tests::Missing").unwrap().is_empty());
}

#[test]
fn test_wrong_object_type_is_a_registration_error() {
    let created = Arc::new(AtomicUsize::new(0));
    let mut catalog = ServiceCatalog::new();
    catalog
        .register(registration("Hello", CreationPolicy::NonShared, created))
        .unwrap();

    let result = catalog.resolve::<String>("tests::Greeter");
    assert!(matches!(result, Err(Error::Registration { .. })));
}
