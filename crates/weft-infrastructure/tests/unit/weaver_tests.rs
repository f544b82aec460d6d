//! Weaver tests over a hand-assembled contract
//!
//! `Counter` is written out the way `#[weft::contract]` expands a trait, so
//! these tests exercise the registration surface without the macro.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use weft_application::{ObjectContract, Weave, Woven, WovenProxy};
use weft_domain::{
    BuildReport, CompositionContainer, Contract, ContractDescriptor, CreationPolicy, Direction,
    EntryAspect, GenerationObserver, Implementation, ImplementationDescriptor, Marker,
    MemberDescriptor, ParameterBag, ParameterValue, Registration, Result, ReturnValue,
};
use weft_infrastructure::{ExportEntry, ServiceCatalog, Weaver, register_export};

trait Counter: Send + Sync {
    fn next(&self, step: u32) -> u32;
}

struct CounterContract;

impl Contract for CounterContract {
    const NAME: &'static str = "tests::Counter";

    fn descriptor() -> Result<ContractDescriptor> {
        ContractDescriptor::builder(Self::NAME)
            .member(
                MemberDescriptor::method(0, "next")
                    .parameter("step", "u32", Direction::In)
                    .returns("u32"),
            )
            .build()
    }
}

struct CounterProxy<I> {
    inner: Woven<I>,
}

impl<I: Counter + Implementation> Counter for CounterProxy<I> {
    fn next(&self, step: u32) -> u32 {
        let mut params = ParameterBag::with_capacity(1);
        params.insert("step", ParameterValue::from_serialize(&step));
        self.inner
            .member(0)
            .invoke(params, || self.inner.target().next(step))
    }
}

impl<I: Implementation> WovenProxy for CounterProxy<I> {
    type Target = I;

    fn woven(&self) -> &Woven<I> {
        &self.inner
    }
}

impl<I: Counter + Implementation> Weave<I> for CounterContract {
    type Proxy = CounterProxy<I>;

    fn assemble(woven: Woven<I>) -> Self::Proxy {
        CounterProxy { inner: woven }
    }
}

impl<I: Counter + Implementation> ObjectContract<I> for CounterContract {
    type Object = dyn Counter + Send + Sync;

    fn into_object(proxy: Self::Proxy) -> Arc<Self::Object> {
        Arc::new(proxy)
    }
}

#[derive(Default)]
struct Plain {
    total: AtomicUsize,
}

impl Counter for Plain {
    fn next(&self, step: u32) -> u32 {
        let step = usize::try_from(step).unwrap();
        u32::try_from(self.total.fetch_add(step, Ordering::SeqCst) + step).unwrap()
    }
}

impl Implementation for Plain {}

struct Frozen;

impl EntryAspect for Frozen {
    fn on_entry(&self, _: &MemberDescriptor, _: &ParameterBag, ret: &mut ReturnValue) -> bool {
        ret.set(0_u32);
        false
    }
}

#[derive(Default)]
struct Guarded;

impl Counter for Guarded {
    fn next(&self, step: u32) -> u32 {
        step
    }
}

impl Implementation for Guarded {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .on("next", Marker::entry(Frozen, 0))
            .build()
    }
}

#[derive(Default)]
struct Reports(Mutex<Vec<BuildReport>>);

impl GenerationObserver for Reports {
    fn on_build_complete(&self, report: &BuildReport) {
        self.0.lock().unwrap().push(report.clone());
    }
}

#[test]
fn test_wrap_forwards_and_shares_woven_type() {
    let weaver = Weaver::new();
    let first = weaver.wrap::<CounterContract, _>(Plain::default()).unwrap();
    let second = weaver.wrap::<CounterContract, _>(Plain::default()).unwrap();

    assert_eq!(first.next(2), 2);
    assert_eq!(first.next(3), 5);
    assert_eq!(second.next(1), 1);
    assert!(Arc::ptr_eq(first.woven_type(), second.woven_type()));
    assert_eq!(weaver.cache().len(), 1);
}

#[test]
fn test_wrap_many_and_wrap_shared() {
    let weaver = Weaver::new();
    let proxies = weaver
        .wrap_many::<CounterContract, Plain, _>((0..3).map(|_| Plain::default()))
        .unwrap();
    assert_eq!(proxies.len(), 3);
    assert!(Arc::ptr_eq(proxies[0].woven_type(), proxies[2].woven_type()));

    let shared = Arc::new(Plain::default());
    let proxy = weaver
        .wrap_shared::<CounterContract, _>(Arc::clone(&shared))
        .unwrap();
    proxy.next(4);
    assert_eq!(shared.total.load(Ordering::SeqCst), 4);
}

#[test]
fn test_entry_veto_comes_from_implementation_markers() {
    let weaver = Weaver::new();
    let proxy = weaver.wrap::<CounterContract, _>(Guarded).unwrap();
    assert_eq!(proxy.next(9), 0);
}

#[test]
fn test_builder_observer_sees_one_report_per_woven_type() {
    let reports = Arc::new(Reports::default());
    let weaver = Weaver::builder()
        .emit_source(false)
        .observer(reports.clone())
        .build();

    weaver.wrap::<CounterContract, _>(Plain::default()).unwrap();
    weaver.wrap::<CounterContract, _>(Plain::default()).unwrap();
    let woven_type = weaver.woven_type::<CounterContract, Plain>().unwrap();

    assert!(woven_type.source().is_none());
    let reports = reports.0.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].success);
}

#[test]
fn test_register_into_catalog() {
    let weaver = Weaver::new();
    let mut catalog = ServiceCatalog::new();
    weaver
        .register::<CounterContract, Plain, _>(&mut catalog, CreationPolicy::Shared, Plain::default)
        .unwrap();

    let counter: Arc<dyn Counter + Send + Sync> = catalog.resolve(CounterContract::NAME).unwrap();
    counter.next(5);
    let again: Arc<dyn Counter + Send + Sync> = catalog.resolve(CounterContract::NAME).unwrap();
    assert_eq!(again.next(1), 6);
}

static EXPORTS: [ExportEntry; 2] = [
    ExportEntry {
        contract: "tests::Counter",
        implementation: "Plain",
        policy: CreationPolicy::NonShared,
        register: register_export::<CounterContract, Plain>,
    },
    ExportEntry {
        contract: "tests::Counter",
        implementation: "Guarded",
        policy: CreationPolicy::Shared,
        register: register_export::<CounterContract, Guarded>,
    },
];

#[test]
fn test_register_exports_batch() {
    let weaver = Weaver::new();
    let mut catalog = ServiceCatalog::new();
    let registered = weaver.register_exports(&mut catalog, EXPORTS.iter()).unwrap();

    assert_eq!(registered, 2);
    let all: Vec<Arc<dyn Counter + Send + Sync>> = catalog.resolve_all(CounterContract::NAME).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(catalog.registrations(CounterContract::NAME)[0].policy, CreationPolicy::NonShared);
}

struct Refusing(Arc<AtomicUsize>);

impl CompositionContainer for Refusing {
    fn register(&mut self, _: Registration) -> Result<()> {
        if self.0.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(())
        } else {
            Err(weft_domain::Error::registration("container is full"))
        }
    }
}

#[test]
fn test_register_exports_stops_at_first_failure() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut container = Refusing(Arc::clone(&attempts));
    let result = Weaver::new().register_exports(&mut container, EXPORTS.iter());

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
