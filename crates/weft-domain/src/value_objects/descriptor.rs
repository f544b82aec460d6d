//! Descriptor model
//!
//! Language-neutral description of a contract: its members, their parameters
//! and directions, generic arity and return types. The `#[contract]` macro
//! emits one [`MemberDescriptor`] per trait function ("accessor level"), and
//! [`ContractDescriptorBuilder`] groups property, indexer and event accessors
//! so that each of them appears once in [`ContractDescriptor::members`].

use crate::constants::{INDEXER_MEMBER_NAME, SETTER_VALUE_PARAMETER};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Normalize a rendered type name so token output (`& mut Vec < T >`) and
/// hand-written declarations (`&mut Vec<T>`) compare equal
///
/// Whitespace is dropped except a single space between two identifier
/// characters (`mut T`, `dyn Fn`).
pub fn normalize_type_name(type_name: &str) -> String {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    let mut normalized = String::with_capacity(type_name.len());
    let mut pending_space = false;
    for c in type_name.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && normalized.chars().last().is_some_and(is_ident) && is_ident(c) {
            normalized.push(' ');
        }
        pending_space = false;
        normalized.push(c);
    }
    normalized
}

/// Passing direction of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Passed by value or shared reference
    In,
    /// Passed as `&mut T`, read and written by the callee
    Ref,
    /// Passed as `&mut T` and reset to its default before the call
    Out,
}

/// Kind of a member at accessor level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Ordinary method
    Method,
    /// Property getter
    PropertyGet,
    /// Property setter
    PropertySet,
    /// Indexer getter
    IndexerGet,
    /// Indexer setter
    IndexerSet,
    /// Event subscription
    EventAdd,
    /// Event unsubscription
    EventRemove,
}

impl MemberKind {
    /// Whether this accessor belongs to an event (never woven)
    pub fn is_event(self) -> bool {
        matches!(self, Self::EventAdd | Self::EventRemove)
    }

    /// Whether this accessor writes a value
    pub fn is_setter(self) -> bool {
        matches!(self, Self::PropertySet | Self::IndexerSet)
    }

    /// Stable lowercase label
    pub fn label(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::PropertyGet => "property-get",
            Self::PropertySet => "property-set",
            Self::IndexerGet => "indexer-get",
            Self::IndexerSet => "indexer-set",
            Self::EventAdd => "event-add",
            Self::EventRemove => "event-remove",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single parameter of a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: String,
    type_name: String,
    direction: Direction,
}

impl ParameterDescriptor {
    /// Create a parameter descriptor, normalizing its type name
    pub fn new<N: Into<String>>(name: N, type_name: &str, direction: Direction) -> Self {
        Self {
            name: name.into(),
            type_name: normalize_type_name(type_name),
            direction,
        }
    }

    /// Parameter name as seen by aspects
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Passing direction
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// Accessor-level description of a contract member
///
/// `slot` is the position of the backing trait function; woven types index
/// their member table by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    slot: usize,
    name: String,
    function: String,
    kind: MemberKind,
    parameters: Vec<ParameterDescriptor>,
    return_type: Option<String>,
    error_type: Option<String>,
    generics: Vec<String>,
}

impl MemberDescriptor {
    /// Create a descriptor for the trait function `function` exposed as `name`
    pub fn new<N, F>(slot: usize, name: N, function: F, kind: MemberKind) -> Self
    where
        N: Into<String>,
        F: Into<String>,
    {
        Self {
            slot,
            name: name.into(),
            function: function.into(),
            kind,
            parameters: Vec::new(),
            return_type: None,
            error_type: None,
            generics: Vec::new(),
        }
    }

    /// Create a plain method descriptor whose name is its function name
    pub fn method<N: Into<String>>(slot: usize, name: N) -> Self {
        let name = name.into();
        Self::new(slot, name.clone(), name, MemberKind::Method)
    }

    /// Append a parameter
    pub fn parameter<N: Into<String>>(
        mut self,
        name: N,
        type_name: &str,
        direction: Direction,
    ) -> Self {
        self.parameters
            .push(ParameterDescriptor::new(name, type_name, direction));
        self
    }

    /// Set the declared return type; `()` means no value
    pub fn returns(mut self, type_name: &str) -> Self {
        let normalized = normalize_type_name(type_name);
        self.return_type = (normalized != "()" && !normalized.is_empty()).then_some(normalized);
        self
    }

    /// Mark the member as returning `Result<_, error_type>`
    pub fn fallible(mut self, error_type: &str) -> Self {
        self.error_type = Some(normalize_type_name(error_type));
        self
    }

    /// Append a generic type parameter
    pub fn generic<N: Into<String>>(mut self, name: N) -> Self {
        self.generics.push(name.into());
        self
    }

    /// Slot of the backing trait function
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Member name used for lookup (property, indexer or event name for accessors)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the backing trait function
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Accessor kind
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// Declared parameters, in order
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Normalized parameter types, in order
    pub fn parameter_types(&self) -> Vec<&str> {
        self.parameters.iter().map(ParameterDescriptor::type_name).collect()
    }

    /// Index parameter types of an indexer accessor (the setter value excluded)
    pub fn index_parameter_types(&self) -> Vec<&str> {
        let mut types = self.parameter_types();
        if self.kind == MemberKind::IndexerSet {
            types.pop();
        }
        types
    }

    /// Declared return type (the `Ok` type for fallible members), `None` for `()`
    pub fn return_type(&self) -> Option<&str> {
        self.return_type.as_deref()
    }

    /// Error type of a fallible member
    pub fn error_type(&self) -> Option<&str> {
        self.error_type.as_deref()
    }

    /// Whether the member returns `Result<_, _>`
    pub fn is_fallible(&self) -> bool {
        self.error_type.is_some()
    }

    /// Generic type parameter names
    pub fn generics(&self) -> &[String] {
        &self.generics
    }

    /// Number of generic type parameters
    pub fn generic_arity(&self) -> usize {
        self.generics.len()
    }

    /// Human readable signature, e.g. `add(a: i32, b: i32) -> i32`
    pub fn signature(&self) -> String {
        let mut signature = self.function.clone();
        if !self.generics.is_empty() {
            signature.push('<');
            signature.push_str(&self.generics.join(", "));
            signature.push('>');
        }
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|p| match p.direction {
                Direction::Out => format!("#[out] {}: {}", p.name, p.type_name),
                _ => format!("{}: {}", p.name, p.type_name),
            })
            .collect();
        signature.push('(');
        signature.push_str(&parameters.join(", "));
        signature.push(')');
        match (&self.return_type, &self.error_type) {
            (Some(ok), Some(err)) => signature.push_str(&format!(" -> Result<{ok}, {err}>")),
            (None, Some(err)) => signature.push_str(&format!(" -> Result<(), {err}>")),
            (Some(ok), None) => signature.push_str(&format!(" -> {ok}")),
            (None, None) => {}
        }
        signature
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// A contract member with its accessors grouped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractMember {
    /// Ordinary method
    Method(MemberDescriptor),
    /// Property with optional getter and setter
    Property {
        /// Property name
        name: String,
        /// Getter accessor
        getter: Option<MemberDescriptor>,
        /// Setter accessor
        setter: Option<MemberDescriptor>,
    },
    /// Indexer with optional getter and setter
    Indexer {
        /// Getter accessor
        getter: Option<MemberDescriptor>,
        /// Setter accessor
        setter: Option<MemberDescriptor>,
    },
    /// Event with its subscription accessors
    Event {
        /// Event name
        name: String,
        /// Subscription accessor
        add: Option<MemberDescriptor>,
        /// Unsubscription accessor
        remove: Option<MemberDescriptor>,
    },
}

impl ContractMember {
    /// Lookup name of the member
    pub fn name(&self) -> &str {
        match self {
            Self::Method(descriptor) => descriptor.name(),
            Self::Property { name, .. } | Self::Event { name, .. } => name,
            Self::Indexer { .. } => INDEXER_MEMBER_NAME,
        }
    }

    /// All accessors of the member, in slot order
    pub fn accessors(&self) -> Vec<&MemberDescriptor> {
        let mut accessors: Vec<&MemberDescriptor> = match self {
            Self::Method(descriptor) => vec![descriptor],
            Self::Property { getter, setter, .. } | Self::Indexer { getter, setter } => {
                getter.iter().chain(setter.iter()).collect()
            }
            Self::Event { add, remove, .. } => add.iter().chain(remove.iter()).collect(),
        };
        accessors.sort_by_key(|a| a.slot());
        accessors
    }

    /// Label of the member kind
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Method(_) => "method",
            Self::Property { .. } => "property",
            Self::Indexer { .. } => "indexer",
            Self::Event { .. } => "event",
        }
    }

    /// Parameter types used for signature matching
    pub fn parameter_types(&self) -> Vec<&str> {
        match self {
            Self::Method(descriptor) => descriptor.parameter_types(),
            Self::Indexer { getter, setter } => getter
                .as_ref()
                .or(setter.as_ref())
                .map(MemberDescriptor::index_parameter_types)
                .unwrap_or_default(),
            Self::Property { .. } | Self::Event { .. } => Vec::new(),
        }
    }

    /// Generic arity used for signature matching
    pub fn generic_arity(&self) -> usize {
        match self {
            Self::Method(descriptor) => descriptor.generic_arity(),
            _ => 0,
        }
    }

    /// Human readable signature
    pub fn signature(&self) -> String {
        match self {
            Self::Method(descriptor) => descriptor.signature(),
            Self::Property { name, .. } => format!("property {name}"),
            Self::Indexer { .. } => format!("{INDEXER_MEMBER_NAME}[{}]", self.parameter_types().join(", ")),
            Self::Event { name, .. } => format!("event {name}"),
        }
    }
}

/// Full description of a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDescriptor {
    name: String,
    members: Vec<ContractMember>,
    slot_count: usize,
}

impl ContractDescriptor {
    /// Start describing the contract `name`
    pub fn builder<S: Into<String>>(name: S) -> ContractDescriptorBuilder {
        ContractDescriptorBuilder {
            name: name.into(),
            accessors: Vec::new(),
        }
    }

    /// Contract identity (full path of the trait)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Grouped members, in declaration order of their first accessor
    pub fn members(&self) -> &[ContractMember] {
        &self.members
    }

    /// Number of trait functions (accessor slots)
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Find the accessor backing `slot`
    pub fn accessor(&self, slot: usize) -> Option<&MemberDescriptor> {
        self.members
            .iter()
            .flat_map(ContractMember::accessors)
            .find(|a| a.slot() == slot)
    }
}

/// Builder grouping accessor descriptors into contract members
#[derive(Debug)]
pub struct ContractDescriptorBuilder {
    name: String,
    accessors: Vec<MemberDescriptor>,
}

impl ContractDescriptorBuilder {
    /// Add an accessor-level member descriptor
    pub fn member(mut self, descriptor: MemberDescriptor) -> Self {
        self.accessors.push(descriptor);
        self
    }

    /// Group accessors and validate the contract shape
    pub fn build(self) -> Result<ContractDescriptor> {
        let ContractDescriptorBuilder { name, accessors } = self;
        let slot_count = accessors.len();
        let mut members: Vec<ContractMember> = Vec::new();
        let mut slots = HashSet::new();

        for descriptor in accessors {
            if !slots.insert(descriptor.slot()) {
                return Err(invalid(&name, format!("slot {} is declared twice", descriptor.slot())));
            }
            if descriptor.slot() >= slot_count {
                return Err(invalid(
                    &name,
                    format!("slot {} of '{}' is out of range", descriptor.slot(), descriptor.function()),
                ));
            }
            validate_accessor_shape(&name, &descriptor)?;

            match descriptor.kind() {
                MemberKind::Method => {
                    if members.iter().any(|m| matches!(m, ContractMember::Method(d) if d.name() == descriptor.name())) {
                        return Err(invalid(&name, format!("method '{}' is declared twice", descriptor.name())));
                    }
                    members.push(ContractMember::Method(descriptor));
                }
                MemberKind::PropertyGet | MemberKind::PropertySet => {
                    group_property(&name, &mut members, descriptor)?;
                }
                MemberKind::IndexerGet | MemberKind::IndexerSet => {
                    group_indexer(&name, &mut members, descriptor)?;
                }
                MemberKind::EventAdd | MemberKind::EventRemove => {
                    group_event(&name, &mut members, descriptor)?;
                }
            }
        }

        Ok(ContractDescriptor {
            name,
            members,
            slot_count,
        })
    }
}

fn invalid(contract: &str, message: String) -> Error {
    Error::InvalidContract {
        contract: contract.to_string(),
        message,
    }
}

fn validate_accessor_shape(contract: &str, descriptor: &MemberDescriptor) -> Result<()> {
    let arity = descriptor.parameters().len();
    let returns = descriptor.return_type().is_some();
    let problem = match descriptor.kind() {
        MemberKind::PropertyGet if arity != 0 || !returns => Some("a property getter takes no parameters and returns a value"),
        MemberKind::PropertySet if arity != 1 || returns => Some("a property setter takes exactly one value and returns nothing"),
        MemberKind::IndexerGet if arity == 0 || !returns => Some("an indexer getter takes at least one index and returns a value"),
        MemberKind::IndexerSet if arity < 2 || returns => Some("an indexer setter takes at least one index plus a value and returns nothing"),
        MemberKind::EventAdd | MemberKind::EventRemove if arity != 1 => Some("an event accessor takes exactly one handler"),
        _ => None,
    };
    if descriptor.kind() != MemberKind::Method && descriptor.generic_arity() > 0 {
        return Err(invalid(
            contract,
            format!("'{}' is generic; only methods may declare type parameters", descriptor.function()),
        ));
    }
    match problem {
        Some(problem) => Err(invalid(contract, format!("'{}': {problem}", descriptor.function()))),
        None => Ok(()),
    }
}

fn group_property(contract: &str, members: &mut Vec<ContractMember>, descriptor: MemberDescriptor) -> Result<()> {
    let position = members
        .iter()
        .position(|m| matches!(m, ContractMember::Property { name, .. } if name == descriptor.name()));
    let index = match position {
        Some(index) => index,
        None => {
            if members.iter().any(|m| m.name() == descriptor.name() && !matches!(m, ContractMember::Property { .. })) {
                return Err(invalid(contract, format!("'{}' is declared both as a property and as another member", descriptor.name())));
            }
            members.push(ContractMember::Property {
                name: descriptor.name().to_string(),
                getter: None,
                setter: None,
            });
            members.len() - 1
        }
    };
    let ContractMember::Property { getter, setter, .. } = &mut members[index] else {
        return Err(invalid(contract, format!("'{}' is not a property", descriptor.name())));
    };
    let slot = if descriptor.kind() == MemberKind::PropertyGet { &mut *getter } else { &mut *setter };
    if slot.is_some() {
        return Err(invalid(
            contract,
            format!("property '{}' declares two {} accessors", descriptor.name(), descriptor.kind()),
        ));
    }
    *slot = Some(descriptor);

    if let (Some(get), Some(set)) = (getter.as_ref(), setter.as_ref()) {
        let value_type = set.parameters().last().map(ParameterDescriptor::type_name);
        if get.return_type() != value_type {
            return Err(invalid(
                contract,
                format!("property '{}' getter and setter disagree on its type", get.name()),
            ));
        }
    }
    Ok(())
}

fn group_indexer(contract: &str, members: &mut Vec<ContractMember>, descriptor: MemberDescriptor) -> Result<()> {
    let index_types = descriptor.index_parameter_types();
    let position = members.iter().position(|m| {
        matches!(m, ContractMember::Indexer { .. }) && m.parameter_types() == index_types
    });
    let index = match position {
        Some(index) => index,
        None => {
            members.push(ContractMember::Indexer {
                getter: None,
                setter: None,
            });
            members.len() - 1
        }
    };
    let ContractMember::Indexer { getter, setter } = &mut members[index] else {
        return Err(invalid(contract, "indexer grouping failed".to_string()));
    };
    let slot = if descriptor.kind() == MemberKind::IndexerGet { getter } else { setter };
    if slot.is_some() {
        return Err(invalid(
            contract,
            format!("indexer [{}] declares two {} accessors", index_types.join(", "), descriptor.kind()),
        ));
    }
    *slot = Some(descriptor);
    Ok(())
}

fn group_event(contract: &str, members: &mut Vec<ContractMember>, descriptor: MemberDescriptor) -> Result<()> {
    let position = members
        .iter()
        .position(|m| matches!(m, ContractMember::Event { name, .. } if name == descriptor.name()));
    let index = match position {
        Some(index) => index,
        None => {
            members.push(ContractMember::Event {
                name: descriptor.name().to_string(),
                add: None,
                remove: None,
            });
            members.len() - 1
        }
    };
    let ContractMember::Event { add, remove, .. } = &mut members[index] else {
        return Err(invalid(contract, format!("'{}' is not an event", descriptor.name())));
    };
    let slot = if descriptor.kind() == MemberKind::EventAdd { add } else { remove };
    if slot.is_some() {
        return Err(invalid(
            contract,
            format!("event '{}' declares two {} accessors", descriptor.name(), descriptor.kind()),
        ));
    }
    *slot = Some(descriptor);
    Ok(())
}

impl MemberDescriptor {
    /// Name under which the parameter at `index` appears in the parameter bag
    ///
    /// Setters expose their last parameter as `value` whatever the trait calls it.
    pub fn bag_name(&self, index: usize) -> &str {
        if self.kind.is_setter() && index + 1 == self.parameters.len() {
            SETTER_VALUE_PARAMETER
        } else {
            self.parameters[index].name()
        }
    }
}
