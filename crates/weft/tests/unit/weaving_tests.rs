//! Aspect behaviour of `#[weft::contract]` proxies
//!
//! Covers forwarding, entry veto, ordering across class and member markers,
//! exit replacement and the error stage (rethrow, substitution, swallow and
//! the two rethrow policies).

use crate::support::{calls, labels, new_log, record, recording_builder, recording_weaver};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use weft::{
    EntryAspect, ErrorAspect, ExitAspect, Fault, FaultSlot, Implementation,
    ImplementationDescriptor, Marker, MemberDescriptor, ParameterBag, ReturnValue, RethrowPolicy,
    Stage, Weaver, WovenProxy,
};

#[derive(Debug, PartialEq)]
pub enum CalcError {
    DivideByZero,
    Overflow,
    Other(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for CalcError {}

impl From<Fault> for CalcError {
    fn from(fault: Fault) -> Self {
        CalcError::Other(fault.to_string())
    }
}

#[weft::contract]
pub trait Calculator {
    fn add(&self, a: i32, b: i32) -> i32;
    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError>;
}

/// Counts body executions
#[derive(Default)]
struct Basic {
    calls: AtomicUsize,
}

impl Calculator for Basic {
    fn add(&self, a: i32, b: i32) -> i32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        a + b
    }

    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if b == 0 {
            Err(CalcError::DivideByZero)
        } else {
            Ok(a / b)
        }
    }
}

impl Implementation for Basic {}

#[test]
fn test_unmarked_proxy_forwards() {
    let proxy = Weaver::new().wrap::<CalculatorContract, _>(Basic::default()).unwrap();
    assert_eq!(proxy.add(2, 3), 5);
    assert_eq!(proxy.divide(9, 3), Ok(3));
    assert_eq!(proxy.divide(1, 0), Err(CalcError::DivideByZero));
    assert_eq!(proxy.target().calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_proxies_of_one_pair_share_the_woven_type() {
    let weaver = Weaver::new();
    let first = weaver.wrap::<CalculatorContract, _>(Basic::default()).unwrap();
    let second = weaver.wrap::<CalculatorContract, _>(Basic::default()).unwrap();

    assert!(Arc::ptr_eq(first.woven_type(), second.woven_type()));
    assert_eq!(weaver.cache().len(), 1);
    assert!(first.woven_type().type_name().starts_with("CalculatorProxy<"));
}

// -- entry veto -------------------------------------------------------------

struct Answer;

impl EntryAspect for Answer {
    fn on_entry(&self, _: &MemberDescriptor, _: &ParameterBag, ret: &mut ReturnValue) -> bool {
        ret.set(42_i32);
        false
    }
}

#[derive(Default)]
struct Vetoed {
    calls: AtomicUsize,
}

impl Calculator for Vetoed {
    fn add(&self, a: i32, b: i32) -> i32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        a + b
    }

    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        Ok(a / b)
    }
}

impl Implementation for Vetoed {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .on("add", Marker::entry(Answer, 0))
            .class_marker(record(Stage::Exit, "exit", 0))
            .build()
    }
}

#[test]
fn test_entry_veto_skips_body_and_exit() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<CalculatorContract, _>(Vetoed::default())
        .unwrap();

    assert_eq!(proxy.add(2, 3), 42);
    assert_eq!(proxy.target().calls.load(Ordering::SeqCst), 0);
    assert!(calls(&log, Stage::Exit).is_empty());

    // divide carries no entry marker and runs normally
    assert_eq!(proxy.divide(8, 2), Ok(4));
    assert_eq!(calls(&log, Stage::Exit).len(), 1);
}

// -- ordering ---------------------------------------------------------------

#[derive(Default)]
struct Ordered;

impl Calculator for Ordered {
    fn add(&self, a: i32, b: i32) -> i32 {
        a + b
    }

    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        Ok(a / b)
    }
}

impl Implementation for Ordered {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .class_marker(record(Stage::Entry, "class-3", 3))
            .on("add", record(Stage::Entry, "member-1", 1))
            .on("add", record(Stage::Entry, "member-2", 2))
            .on("add", record(Stage::Entry, "member-1-late", 1))
            .build()
    }
}

#[test]
fn test_entry_aspects_run_by_ascending_order() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<CalculatorContract, _>(Ordered)
        .unwrap();

    assert_eq!(proxy.add(1, 1), 2);
    // equal orders keep declaration order
    assert_eq!(labels(&log), ["member-1", "member-1-late", "member-2", "class-3"]);

    log.lock().unwrap().clear();
    assert_eq!(proxy.divide(4, 2), Ok(2));
    assert_eq!(labels(&log), ["class-3"]);
}

#[test]
fn test_parameter_bag_carries_arguments() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<CalculatorContract, _>(Ordered)
        .unwrap();

    proxy.add(2, 3);
    let entries = calls(&log, Stage::Entry);
    assert_eq!(entries[0].function, "add");
    assert_eq!(entries[0].params, json!({"a": 2, "b": 3}));
}

#[derive(Default)]
struct Counted {
    calls: AtomicUsize,
}

impl Calculator for Counted {
    fn add(&self, a: i32, b: i32) -> i32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        a + b
    }

    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        Ok(a / b)
    }
}

impl Implementation for Counted {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .class_marker(record(Stage::Entry, "count", 1))
            .on("add", record(Stage::Exit, "done", 0))
            .build()
    }
}

#[test]
fn test_add_is_counted_and_recorded_on_exit() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<CalculatorContract, _>(Counted::default())
        .unwrap();

    assert_eq!(proxy.add(2, 3), 5);
    assert_eq!(proxy.add(4, 4), 8);

    assert_eq!(proxy.target().calls.load(Ordering::SeqCst), 2);
    assert_eq!(calls(&log, Stage::Entry).len(), 2);
    let exits = calls(&log, Stage::Exit);
    assert_eq!(exits.len(), 2);
    assert_eq!(exits[1].function, "add");
    assert_eq!(exits[1].params, json!({"a": 4, "b": 4}));
    assert_eq!(labels(&log), ["count", "done", "count", "done"]);
}

// -- exit stage -------------------------------------------------------------

struct Double;

impl ExitAspect for Double {
    fn on_exit(&self, _: &MemberDescriptor, _: &ParameterBag, ret: &mut ReturnValue, duration: Duration) {
        assert!(duration >= Duration::ZERO);
        if let Some(value) = ret.get_mut::<i32>() {
            *value *= 2;
        }
    }
}

#[derive(Default)]
struct Doubled;

impl Calculator for Doubled {
    fn add(&self, a: i32, b: i32) -> i32 {
        a + b
    }

    fn divide(&self, a: i32, b: i32) -> Result<i32, CalcError> {
        if b == 0 { Err(CalcError::DivideByZero) } else { Ok(a / b) }
    }
}

impl Implementation for Doubled {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .class_marker(Marker::exit(Double, 0))
            .class_marker(record(Stage::Exit, "exit", 1))
            .class_marker(record(Stage::Error, "error", 0))
            .build()
    }
}

#[test]
fn test_exit_aspect_replaces_return_value() {
    let proxy = Weaver::new()
        .wrap::<CalculatorContract, _>(Doubled)
        .map_err(|e| e.to_string());
    // `record` is unknown to a plain weaver
    assert!(proxy.is_err());

    let log = new_log();
    let proxy = recording_weaver(&log).wrap::<CalculatorContract, _>(Doubled).unwrap();
    assert_eq!(proxy.add(2, 3), 10);
    assert_eq!(proxy.divide(8, 2), Ok(8));
}

#[test]
fn test_exit_runs_once_when_the_error_is_rethrown() {
    let log = new_log();
    let proxy = recording_weaver(&log).wrap::<CalculatorContract, _>(Doubled).unwrap();

    assert_eq!(proxy.divide(1, 0), Err(CalcError::DivideByZero));
    assert_eq!(calls(&log, Stage::Error).len(), 1);
    assert_eq!(calls(&log, Stage::Exit).len(), 1);
    assert_eq!(labels(&log), ["error", "exit"]);
}

// -- error stage ------------------------------------------------------------

struct Substitute;

impl ErrorAspect for Substitute {
    fn on_error(&self, _: &MemberDescriptor, _: &ParameterBag, fault: &mut FaultSlot<'_>, _: &mut ReturnValue) -> bool {
        if fault.downcast_ref::<CalcError>() == Some(&CalcError::DivideByZero) {
            fault.substitute(CalcError::Overflow);
        }
        true
    }
}

struct Foreign;

impl ErrorAspect for Foreign {
    fn on_error(&self, _: &MemberDescriptor, _: &ParameterBag, fault: &mut FaultSlot<'_>, _: &mut ReturnValue) -> bool {
        fault.substitute(std::io::Error::other("disk on fire"));
        true
    }
}

struct Swallow;

impl ErrorAspect for Swallow {
    fn on_error(&self, _: &MemberDescriptor, _: &ParameterBag, _: &mut FaultSlot<'_>, ret: &mut ReturnValue) -> bool {
        ret.set(-1_i32);
        false
    }
}

struct Rethrow;

impl ErrorAspect for Rethrow {
    fn on_error(&self, _: &MemberDescriptor, _: &ParameterBag, _: &mut FaultSlot<'_>, _: &mut ReturnValue) -> bool {
        true
    }
}

macro_rules! failing_calculator {
    ($name:ident, $($marker:expr),+) => {
        #[derive(Default)]
        struct $name;

        impl Calculator for $name {
            fn add(&self, a: i32, b: i32) -> i32 {
                a + b
            }

            fn divide(&self, _: i32, _: i32) -> Result<i32, CalcError> {
                Err(CalcError::DivideByZero)
            }
        }

        impl Implementation for $name {
            fn descriptor() -> ImplementationDescriptor {
                ImplementationDescriptor::builder::<Self>()
                    $(.on("divide", $marker))+
                    .build()
            }
        }
    };
}

failing_calculator!(Substituting, Marker::error(Substitute, 0));
failing_calculator!(ForeignSubstituting, Marker::error(Foreign, 0));
failing_calculator!(Swallowing, Marker::error(Swallow, 0));
failing_calculator!(SwallowThenRethrow, Marker::error(Swallow, 0), Marker::error(Rethrow, 1));
failing_calculator!(RethrowThenSwallow, Marker::error(Rethrow, 0), Marker::error(Swallow, 1));

#[test]
fn test_substitute_of_the_declared_type_is_returned_as_is() {
    let proxy = Weaver::new().wrap::<CalculatorContract, _>(Substituting).unwrap();
    assert_eq!(proxy.divide(1, 0), Err(CalcError::Overflow));
}

#[test]
fn test_foreign_substitute_goes_through_from_fault() {
    let proxy = Weaver::new().wrap::<CalculatorContract, _>(ForeignSubstituting).unwrap();
    assert_eq!(proxy.divide(1, 0), Err(CalcError::Other("disk on fire".into())));
}

#[test]
fn test_swallowed_error_returns_the_aspect_value() {
    let proxy = Weaver::new().wrap::<CalculatorContract, _>(Swallowing).unwrap();
    assert_eq!(proxy.divide(1, 0), Ok(-1));
}

#[test]
fn test_last_aspect_decides_by_default() {
    let weaver = Weaver::new();
    assert_eq!(weaver.policy(), RethrowPolicy::LastAspectDecides);

    let rethrown = weaver.wrap::<CalculatorContract, _>(SwallowThenRethrow).unwrap();
    assert_eq!(rethrown.divide(1, 0), Err(CalcError::DivideByZero));

    let swallowed = weaver.wrap::<CalculatorContract, _>(RethrowThenSwallow).unwrap();
    assert_eq!(swallowed.divide(1, 0), Ok(-1));
}

#[test]
fn test_any_veto_swallows_policy() {
    let log = new_log();
    let weaver = recording_builder(&log)
        .policy(RethrowPolicy::AnyVetoSwallows)
        .build();

    let proxy = weaver.wrap::<CalculatorContract, _>(SwallowThenRethrow).unwrap();
    assert_eq!(proxy.divide(1, 0), Ok(-1));
    assert_eq!(proxy.woven_type().policy(), RethrowPolicy::AnyVetoSwallows);
}
