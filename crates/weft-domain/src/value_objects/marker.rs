//! Interceptor markers
//!
//! A [`Marker`] binds an aspect instance to a stage and an order. A
//! [`MarkerSpec`] is the declarative form of a marker (aspect name, stage,
//! order and named arguments) that is turned into a live marker by an aspect
//! factory when the woven type is generated.

use crate::constants::{DEFAULT_MARKER_ORDER, MARKER_TYPE_ARGUMENT_KEY};
use crate::error::{Error, Result};
use crate::ports::aspects::{EntryAspect, ErrorAspect, ExitAspect};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Stage of the invocation skeleton an aspect runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Before the body
    Entry,
    /// After the body, always
    Exit,
    /// When the body fails
    Error,
}

impl Stage {
    /// Stable lowercase label
    pub fn label(self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "entry" => Ok(Self::Entry),
            "exit" => Ok(Self::Exit),
            "error" => Ok(Self::Error),
            other => Err(Error::invalid_marker(other, "unknown stage")),
        }
    }
}

/// Shared aspect instance for one stage
#[derive(Clone)]
pub enum AspectHandle {
    /// Entry aspect
    Entry(Arc<dyn EntryAspect>),
    /// Exit aspect
    Exit(Arc<dyn ExitAspect>),
    /// Error aspect
    Error(Arc<dyn ErrorAspect>),
}

impl AspectHandle {
    /// Stage the aspect runs in
    pub fn stage(&self) -> Stage {
        match self {
            Self::Entry(_) => Stage::Entry,
            Self::Exit(_) => Stage::Exit,
            Self::Error(_) => Stage::Error,
        }
    }
}

/// An aspect bound to a stage and an order (ascending runs earlier)
#[derive(Clone)]
pub struct Marker {
    aspect: AspectHandle,
    order: i32,
    name: String,
}

impl Marker {
    /// Entry marker over an aspect value
    pub fn entry<A: EntryAspect + 'static>(aspect: A, order: i32) -> Self {
        Self::entry_arc(Arc::new(aspect), order).named(std::any::type_name::<A>())
    }

    /// Exit marker over an aspect value
    pub fn exit<A: ExitAspect + 'static>(aspect: A, order: i32) -> Self {
        Self::exit_arc(Arc::new(aspect), order).named(std::any::type_name::<A>())
    }

    /// Error marker over an aspect value
    pub fn error<A: ErrorAspect + 'static>(aspect: A, order: i32) -> Self {
        Self::error_arc(Arc::new(aspect), order).named(std::any::type_name::<A>())
    }

    /// Entry marker over a shared aspect
    pub fn entry_arc(aspect: Arc<dyn EntryAspect>, order: i32) -> Self {
        Self::from_handle(AspectHandle::Entry(aspect), order)
    }

    /// Exit marker over a shared aspect
    pub fn exit_arc(aspect: Arc<dyn ExitAspect>, order: i32) -> Self {
        Self::from_handle(AspectHandle::Exit(aspect), order)
    }

    /// Error marker over a shared aspect
    pub fn error_arc(aspect: Arc<dyn ErrorAspect>, order: i32) -> Self {
        Self::from_handle(AspectHandle::Error(aspect), order)
    }

    /// Marker over an existing handle
    pub fn from_handle(aspect: AspectHandle, order: i32) -> Self {
        Self {
            aspect,
            order,
            name: String::from("anonymous"),
        }
    }

    /// Rename the marker (used in logs and rendered source)
    pub fn named<N: Into<String>>(mut self, name: N) -> Self {
        self.name = name.into();
        self
    }

    /// Ordering key
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Stage the aspect runs in
    pub fn stage(&self) -> Stage {
        self.aspect.stage()
    }

    /// Display name of the aspect
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Aspect handle
    pub fn handle(&self) -> &AspectHandle {
        &self.aspect
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("name", &self.name)
            .field("stage", &self.stage())
            .field("order", &self.order)
            .finish()
    }
}

/// Named argument of a [`MarkerSpec`]
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerArgument {
    /// Boolean flag
    Bool(bool),
    /// Signed integer
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Text
    String(String),
    /// Type name
    Type(String),
}

impl MarkerArgument {
    /// Convert raw JSON; arrays, objects (other than `{"$type": ..}`) and null yield `None`
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Object(map) if map.len() == 1 => map
                .get(MARKER_TYPE_ARGUMENT_KEY)
                .and_then(Value::as_str)
                .map(|t| Self::Type(t.to_string())),
            _ => None,
        }
    }

    /// Render back to JSON
    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::String(s) => Value::String(s.clone()),
            Self::Type(t) => {
                let mut map = serde_json::Map::new();
                map.insert(MARKER_TYPE_ARGUMENT_KEY.to_string(), Value::String(t.clone()));
                Value::Object(map)
            }
        }
    }

    /// Boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value, integers widened
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Type name value
    pub fn as_type_name(&self) -> Option<&str> {
        match self {
            Self::Type(t) => Some(t),
            _ => None,
        }
    }
}

impl From<bool> for MarkerArgument {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MarkerArgument {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for MarkerArgument {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for MarkerArgument {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for MarkerArgument {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MarkerArgument {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Declarative form of a marker, reconstructed through an aspect factory
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    aspect: String,
    stage: Stage,
    order: i32,
    arguments: BTreeMap<String, MarkerArgument>,
    dropped: Vec<String>,
}

impl MarkerSpec {
    /// Spec for the aspect registered as `aspect`
    pub fn new<A: Into<String>>(aspect: A, stage: Stage) -> Self {
        Self {
            aspect: aspect.into(),
            stage,
            order: DEFAULT_MARKER_ORDER,
            arguments: BTreeMap::new(),
            dropped: Vec::new(),
        }
    }

    /// Set the order
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Add a typed argument
    pub fn argument<N: Into<String>, V: Into<MarkerArgument>>(mut self, name: N, value: V) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Add a type-name argument
    pub fn type_argument<N: Into<String>, T: ?Sized>(mut self, name: N) -> Self {
        self.arguments.insert(
            name.into(),
            MarkerArgument::Type(std::any::type_name::<T>().to_string()),
        );
        self
    }

    /// Add a raw JSON argument; unsupported kinds are recorded as dropped
    pub fn raw_argument<N: Into<String>>(mut self, name: N, value: &Value) -> Self {
        let name = name.into();
        match MarkerArgument::from_json(value) {
            Some(argument) => {
                self.arguments.insert(name, argument);
            }
            None => self.dropped.push(name),
        }
        self
    }

    /// Parse `{"aspect": .., "stage": .., "order": .., "arguments": {..}}`
    pub fn from_json(value: &Value) -> Result<Self> {
        let aspect = value
            .get("aspect")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_marker("<unnamed>", "missing 'aspect'"))?;
        let stage = value
            .get("stage")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::invalid_marker(aspect, "missing 'stage'"))?
            .parse::<Stage>()
            .map_err(|_| Error::invalid_marker(aspect, "unknown stage"))?;
        let order = match value.get("order") {
            None => DEFAULT_MARKER_ORDER,
            Some(order) => order
                .as_i64()
                .and_then(|o| i32::try_from(o).ok())
                .ok_or_else(|| Error::invalid_marker(aspect, "'order' must be a 32-bit integer"))?,
        };

        let mut spec = Self::new(aspect, stage).with_order(order);
        if let Some(arguments) = value.get("arguments").and_then(Value::as_object) {
            for (name, raw) in arguments {
                spec = spec.raw_argument(name.as_str(), raw);
            }
        }
        Ok(spec)
    }

    /// Registered aspect name
    pub fn aspect(&self) -> &str {
        &self.aspect
    }

    /// Stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Ordering key
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Supported arguments by name
    pub fn arguments(&self) -> &BTreeMap<String, MarkerArgument> {
        &self.arguments
    }

    /// Argument by name
    pub fn get(&self, name: &str) -> Option<&MarkerArgument> {
        self.arguments.get(name)
    }

    /// Names of arguments dropped because their kind is unsupported
    pub fn dropped_arguments(&self) -> &[String] {
        &self.dropped
    }
}

/// Marker as declared on an implementation
#[derive(Debug, Clone)]
pub enum MarkerDeclaration {
    /// Live marker
    Direct(Marker),
    /// Marker reconstructed at generation time
    Spec(MarkerSpec),
}

impl MarkerDeclaration {
    /// Ordering key
    pub fn order(&self) -> i32 {
        match self {
            Self::Direct(marker) => marker.order(),
            Self::Spec(spec) => spec.order(),
        }
    }

    /// Stage
    pub fn stage(&self) -> Stage {
        match self {
            Self::Direct(marker) => marker.stage(),
            Self::Spec(spec) => spec.stage(),
        }
    }

    /// Aspect display name
    pub fn aspect_name(&self) -> &str {
        match self {
            Self::Direct(marker) => marker.name(),
            Self::Spec(spec) => spec.aspect(),
        }
    }
}

impl From<Marker> for MarkerDeclaration {
    fn from(marker: Marker) -> Self {
        Self::Direct(marker)
    }
}

impl From<MarkerSpec> for MarkerDeclaration {
    fn from(spec: MarkerSpec) -> Self {
        Self::Spec(spec)
    }
}
