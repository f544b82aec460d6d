//! Per-call parameter bag
//!
//! The proxy captures every argument before the entry stage. Arguments whose
//! type is `Serialize` are captured as JSON; anything else is recorded by type
//! name only. The choice is made at compile time by the `Capture` probe:
//!
//! ```ignore
//! use weft::__private::{Capture, CaptureOpaque as _, CaptureSerialize as _};
//! let value = (&Capture(&argument)).capture();
//! ```

use serde::Serialize;
use serde_json::Value;

/// Captured argument value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// JSON snapshot of a serializable argument
    Value(Value),
    /// Argument whose type cannot be serialized
    Opaque {
        /// Runtime type name
        type_name: &'static str,
    },
    /// Generic type argument of the call
    Type {
        /// Runtime type name
        type_name: &'static str,
    },
}

impl ParameterValue {
    /// Snapshot a serializable value, falling back to an opaque record when serialization fails
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        serde_json::to_value(value)
            .map(Self::Value)
            .unwrap_or_else(|_| Self::opaque::<T>())
    }

    /// Opaque record for `T`
    pub fn opaque<T: ?Sized>() -> Self {
        Self::Opaque {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Type record for the generic argument `T`
    pub fn type_of<T: ?Sized>() -> Self {
        Self::Type {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// JSON snapshot, if any
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Integer snapshot
    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(Value::as_i64)
    }

    /// Text snapshot
    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    /// Type name of opaque and type records
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Self::Opaque { type_name } | Self::Type { type_name } => Some(type_name),
            Self::Value(_) => None,
        }
    }

    /// JSON rendering, opaque values as `{"$opaque": name}`
    pub fn to_json(&self) -> Value {
        let (key, type_name) = match self {
            Self::Value(value) => return value.clone(),
            Self::Opaque { type_name } => ("$opaque", type_name),
            Self::Type { type_name } => ("$type", type_name),
        };
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), Value::String((*type_name).to_string()));
        Value::Object(map)
    }
}

/// Ordered `name -> value` map built fresh for every call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag {
    entries: Vec<(String, ParameterValue)>,
}

impl ParameterBag {
    /// Empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty bag sized for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert or replace an entry, keeping first-insertion order
    pub fn insert<N: Into<String>>(&mut self, name: N, value: ParameterValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Entry by name
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Entries in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Entry names in order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object rendering
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(n, v)| (n.clone(), v.to_json()))
                .collect(),
        )
    }
}

/// Capture probe; see the module docs
pub struct Capture<'a, T: ?Sized>(pub &'a T);

/// Preferred capture for serializable arguments
pub trait CaptureSerialize {
    /// Capture the argument
    fn capture(&self) -> ParameterValue;
}

impl<T: Serialize + ?Sized> CaptureSerialize for Capture<'_, T> {
    fn capture(&self) -> ParameterValue {
        ParameterValue::from_serialize(self.0)
    }
}

/// Fallback capture for every other argument
pub trait CaptureOpaque {
    /// Capture the argument
    fn capture(&self) -> ParameterValue;
}

impl<T: ?Sized> CaptureOpaque for &Capture<'_, T> {
    fn capture(&self) -> ParameterValue {
        ParameterValue::opaque::<T>()
    }
}
