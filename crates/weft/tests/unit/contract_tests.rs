//! Output of `#[weft::contract]`: descriptors, member kinds and proxies

use crate::support::{calls, new_log, record, recording_weaver};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use weft::{
    Contract, ContractMember, Direction, EntryAspect, Implementation, ImplementationDescriptor,
    Marker, MemberDescriptor, MemberKind, ParameterBag, ReturnValue, Stage, WovenProxy,
};

pub type Handler = Arc<dyn Fn(&str) + Send + Sync>;

#[weft::contract]
pub trait Settings {
    #[property(get)]
    fn get_theme(&self) -> String;
    #[property(set)]
    fn set_theme(&self, theme: String);
    #[indexer(get)]
    fn entry(&self, key: &str) -> Option<String>;
    #[indexer(set)]
    fn set_entry(&self, key: &str, entry: Option<String>);
    #[event(add)]
    fn add_changed(&self, handler: Handler);
    #[event(remove)]
    fn remove_changed(&self, handler: Handler);
    /// Writes whether `key` exists to `found`
    fn lookup(&self, key: &str, #[out] found: &mut bool) -> String;
    #[property(get, name = "revision")]
    fn current_revision(&self) -> u64;
}

#[derive(Default)]
struct MemorySettings {
    theme: Mutex<String>,
    entries: Mutex<HashMap<String, String>>,
    handlers: Mutex<Vec<Handler>>,
}

impl MemorySettings {
    fn notify(&self, what: &str) {
        for handler in self.handlers.lock().unwrap().iter() {
            handler(what);
        }
    }
}

impl Settings for MemorySettings {
    fn get_theme(&self) -> String {
        self.theme.lock().unwrap().clone()
    }

    fn set_theme(&self, theme: String) {
        *self.theme.lock().unwrap() = theme;
        self.notify("theme");
    }

    fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set_entry(&self, key: &str, entry: Option<String>) {
        let mut entries = self.entries.lock().unwrap();
        match entry {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
    }

    fn add_changed(&self, handler: Handler) {
        self.handlers.lock().unwrap().push(handler);
    }

    fn remove_changed(&self, handler: Handler) {
        self.handlers.lock().unwrap().retain(|h| !Arc::ptr_eq(h, &handler));
    }

    fn lookup(&self, key: &str, found: &mut bool) -> String {
        match self.entries.lock().unwrap().get(key) {
            Some(value) => {
                *found = true;
                value.clone()
            }
            None => String::new(),
        }
    }

    fn current_revision(&self) -> u64 {
        7
    }
}

impl Implementation for MemorySettings {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .on("theme", record(Stage::Entry, "theme", 0))
            .on("index", record(Stage::Entry, "index", 0))
            .on("changed", record(Stage::Entry, "changed", 0))
            .on("lookup", record(Stage::Entry, "lookup", 0))
            .build()
    }
}

#[test]
fn test_contract_name_is_module_qualified() {
    assert!(SettingsContract::NAME.ends_with("::Settings"));
    assert!(SettingsContract::NAME.contains("contract"));
}

#[test]
fn test_descriptor_groups_accessors_into_members() {
    let descriptor = SettingsContract::descriptor().unwrap();
    assert_eq!(descriptor.slot_count(), 8);

    let names: Vec<&str> = descriptor.members().iter().map(ContractMember::name).collect();
    assert_eq!(names, ["theme", "index", "changed", "lookup", "revision"]);

    let setter = descriptor.accessor(1).unwrap();
    assert_eq!(setter.kind(), MemberKind::PropertySet);
    assert_eq!(setter.function(), "set_theme");
    assert_eq!(setter.bag_name(0), "value");

    let indexer = descriptor.accessor(2).unwrap();
    assert_eq!(indexer.kind(), MemberKind::IndexerGet);
    assert_eq!(indexer.parameter_types(), ["&str"]);
    assert_eq!(indexer.return_type(), Some("Option<String>"));

    let lookup = descriptor.accessor(6).unwrap();
    assert_eq!(lookup.kind(), MemberKind::Method);
    assert_eq!(lookup.parameters()[0].direction(), Direction::In);
    assert_eq!(lookup.parameters()[1].direction(), Direction::Out);
    assert_eq!(lookup.parameters()[1].type_name(), "&mut bool");

    let revision = descriptor.accessor(7).unwrap();
    assert_eq!(revision.name(), "revision");
    assert_eq!(revision.function(), "current_revision");
}

#[test]
fn test_property_accessors_are_woven() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<SettingsContract, _>(MemorySettings::default())
        .unwrap();

    proxy.set_theme("dark".to_string());
    assert_eq!(proxy.get_theme(), "dark");

    let entries = calls(&log, Stage::Entry);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].function, "set_theme");
    assert_eq!(entries[0].params, json!({"value": "dark"}));
    assert_eq!(entries[1].function, "get_theme");
    assert_eq!(entries[1].params, json!({}));
}

#[test]
fn test_indexer_accessors_are_woven() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<SettingsContract, _>(MemorySettings::default())
        .unwrap();

    proxy.set_entry("font", Some("mono".to_string()));
    assert_eq!(proxy.entry("font").as_deref(), Some("mono"));
    assert_eq!(proxy.entry("size"), None);

    let entries = calls(&log, Stage::Entry);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].params, json!({"key": "font", "value": "mono"}));
    assert_eq!(entries[2].params, json!({"key": "size"}));
}

#[test]
fn test_events_are_forwarded_without_aspects() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<SettingsContract, _>(MemorySettings::default())
        .unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler: Handler = Arc::new(move |what: &str| sink.lock().unwrap().push(what.to_string()));

    proxy.add_changed(Arc::clone(&handler));
    proxy.set_theme("light".to_string());
    proxy.remove_changed(handler);
    proxy.set_theme("dark".to_string());

    assert_eq!(*seen.lock().unwrap(), ["theme"]);
    let functions: Vec<String> = calls(&log, Stage::Entry).into_iter().map(|c| c.function).collect();
    assert_eq!(functions, ["set_theme", "set_theme"]);
    assert!(proxy.woven_type().member(4).unwrap().is_passthrough());
}

#[test]
fn test_out_parameter_is_reset_before_the_call() {
    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<SettingsContract, _>(MemorySettings::default())
        .unwrap();
    proxy.set_entry("font", Some("mono".to_string()));

    let mut found = true;
    assert_eq!(proxy.lookup("size", &mut found), "");
    assert!(!found);

    assert_eq!(proxy.lookup("font", &mut found), "mono");
    assert!(found);

    let lookups: Vec<Value> = calls(&log, Stage::Entry)
        .into_iter()
        .filter(|c| c.function == "lookup")
        .map(|c| c.params)
        .collect();
    assert_eq!(lookups, [json!({"key": "size", "found": false}), json!({"key": "font", "found": false})]);
}

// -- generic methods --------------------------------------------------------

#[weft::contract]
pub trait Store {
    fn put<T: serde::Serialize>(&self, key: &str, value: T) -> usize;
    fn count(&self) -> usize;
}

#[derive(Default)]
struct JsonStore {
    values: Mutex<HashMap<String, Value>>,
}

impl Store for JsonStore {
    fn put<T: serde::Serialize>(&self, key: &str, value: T) -> usize {
        let mut values = self.values.lock().unwrap();
        values.insert(key.to_string(), serde_json::to_value(value).unwrap());
        values.len()
    }

    fn count(&self) -> usize {
        self.values.lock().unwrap().len()
    }
}

impl Implementation for JsonStore {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .class_marker(record(Stage::Entry, "store", 0))
            .build()
    }
}

#[test]
fn test_generic_method_records_type_arguments() {
    let descriptor = StoreContract::descriptor().unwrap();
    let put = descriptor.accessor(0).unwrap();
    assert_eq!(put.generics(), ["T".to_string()]);
    assert_eq!(put.parameter_types(), ["&str", "T"]);

    let log = new_log();
    let proxy = recording_weaver(&log)
        .wrap::<StoreContract, _>(JsonStore::default())
        .unwrap();

    assert_eq!(proxy.put("answer", 42_i32), 1);
    assert_eq!(proxy.put("name", "weft"), 2);
    assert_eq!(proxy.count(), 2);

    let entries = calls(&log, Stage::Entry);
    assert_eq!(entries[0].params, json!({"key": "answer", "value": 42, "T1": {"$type": "i32"}}));
    assert_eq!(entries[1].params["T1"], json!({"$type": "&str"}));
    assert_eq!(entries[2].params, json!({}));
}

// -- return types without a default -----------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Reading {
    celsius: i32,
}

trait Sensor {
    fn id(&self) -> u32;
}

struct Probe(u32);

impl Sensor for Probe {
    fn id(&self) -> u32 {
        self.0
    }
}

#[weft::contract]
trait Clock {
    fn now(&self) -> Instant;
    fn reading(&self) -> Reading;
    fn sensor(&self) -> Arc<dyn Sensor + Send + Sync>;
    fn label(&self) -> &'static str;
}

struct RoomClock {
    started: Instant,
}

impl Clock for RoomClock {
    fn now(&self) -> Instant {
        self.started
    }

    fn reading(&self) -> Reading {
        Reading { celsius: 21 }
    }

    fn sensor(&self) -> Arc<dyn Sensor + Send + Sync> {
        Arc::new(Probe(9))
    }

    fn label(&self) -> &'static str {
        "room"
    }
}

struct Frozen;

impl EntryAspect for Frozen {
    fn on_entry(&self, _: &MemberDescriptor, _: &ParameterBag, ret: &mut ReturnValue) -> bool {
        ret.set(Reading { celsius: -4 });
        false
    }
}

impl Implementation for RoomClock {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .class_marker(record(Stage::Exit, "clock", 0))
            .build()
    }
}

struct FrozenClock;

impl Clock for FrozenClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn reading(&self) -> Reading {
        Reading { celsius: 21 }
    }

    fn sensor(&self) -> Arc<dyn Sensor + Send + Sync> {
        Arc::new(Probe(1))
    }

    fn label(&self) -> &'static str {
        "frozen"
    }
}

impl Implementation for FrozenClock {
    fn descriptor() -> ImplementationDescriptor {
        ImplementationDescriptor::builder::<Self>()
            .on("reading", Marker::entry(Frozen, 0))
            .build()
    }
}

#[test]
fn test_members_without_default_return_the_body_value() {
    let log = new_log();
    let started = Instant::now();
    let proxy = recording_weaver(&log)
        .wrap::<ClockContract, _>(RoomClock { started })
        .unwrap();

    assert_eq!(proxy.now(), started);
    assert_eq!(proxy.reading(), Reading { celsius: 21 });
    assert_eq!(proxy.sensor().id(), 9);
    assert_eq!(proxy.label(), "room");
    assert_eq!(calls(&log, Stage::Exit).len(), 4);
}

#[test]
fn test_vetoing_aspect_supplies_value_without_default() {
    let proxy = weft::Weaver::new().wrap::<ClockContract, _>(FrozenClock).unwrap();
    assert_eq!(proxy.reading(), Reading { celsius: -4 });
    assert_eq!(proxy.label(), "frozen");
}
