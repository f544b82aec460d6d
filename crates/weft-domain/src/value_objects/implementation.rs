//! Implementation-side description
//!
//! An [`ImplementationDescriptor`] tells the generator which markers decorate
//! the implementation (class level) and each of its members (member level).
//! Members are either declared explicitly or, when none are declared,
//! mirrored from the contract being woven. Markers are attached to members
//! through [`MemberSelector`]s, which are matched at generation time.

use super::descriptor::{ContractMember, normalize_type_name};
use super::marker::MarkerDeclaration;
use crate::constants::INDEXER_MEMBER_NAME;
use std::fmt;

/// Kind of an implementation member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplementationMemberKind {
    /// Ordinary method
    Method,
    /// Property (getter and/or setter)
    Property,
    /// Indexer (getter and/or setter)
    Indexer,
    /// Event
    Event,
}

impl ImplementationMemberKind {
    /// Kind matching a grouped contract member
    pub fn of(member: &ContractMember) -> Self {
        match member {
            ContractMember::Method(_) => Self::Method,
            ContractMember::Property { .. } => Self::Property,
            ContractMember::Indexer { .. } => Self::Indexer,
            ContractMember::Event { .. } => Self::Event,
        }
    }

    /// Stable lowercase label
    pub fn label(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
            Self::Indexer => "indexer",
            Self::Event => "event",
        }
    }
}

/// A member of the implementation type with its member-level markers
#[derive(Debug, Clone)]
pub struct ImplementationMember {
    name: String,
    kind: ImplementationMemberKind,
    parameter_types: Vec<String>,
    generic_arity: usize,
    markers: Vec<MarkerDeclaration>,
}

impl ImplementationMember {
    fn new<N: Into<String>>(name: N, kind: ImplementationMemberKind, parameter_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind,
            parameter_types: parameter_types.iter().map(|t| normalize_type_name(t)).collect(),
            generic_arity: 0,
            markers: Vec::new(),
        }
    }

    /// Declare a method with its parameter types
    pub fn method<N: Into<String>>(name: N, parameter_types: &[&str]) -> Self {
        Self::new(name, ImplementationMemberKind::Method, parameter_types)
    }

    /// Declare a property
    pub fn property<N: Into<String>>(name: N) -> Self {
        Self::new(name, ImplementationMemberKind::Property, &[])
    }

    /// Declare an indexer with its index parameter types
    pub fn indexer(index_types: &[&str]) -> Self {
        Self::new(INDEXER_MEMBER_NAME, ImplementationMemberKind::Indexer, index_types)
    }

    /// Declare an event
    pub fn event<N: Into<String>>(name: N) -> Self {
        Self::new(name, ImplementationMemberKind::Event, &[])
    }

    /// Mirror a contract member (same name, kind, parameter types and generic arity)
    pub fn mirror(member: &ContractMember) -> Self {
        let types = member.parameter_types();
        Self::new(member.name(), ImplementationMemberKind::of(member), &types)
            .with_generic_arity(member.generic_arity())
    }

    /// Set the number of generic type parameters
    pub fn with_generic_arity(mut self, arity: usize) -> Self {
        self.generic_arity = arity;
        self
    }

    /// Attach a member-level marker
    pub fn marker<M: Into<MarkerDeclaration>>(mut self, marker: M) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Attach markers in place
    pub fn push_markers<I: IntoIterator<Item = MarkerDeclaration>>(&mut self, markers: I) {
        self.markers.extend(markers);
    }

    /// Member name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member kind
    pub fn kind(&self) -> ImplementationMemberKind {
        self.kind
    }

    /// Normalized parameter types (index types for indexers)
    pub fn parameter_types(&self) -> &[String] {
        &self.parameter_types
    }

    /// Number of generic type parameters
    pub fn generic_arity(&self) -> usize {
        self.generic_arity
    }

    /// Member-level markers in declaration order
    pub fn markers(&self) -> &[MarkerDeclaration] {
        &self.markers
    }

    /// Human readable signature, e.g. `method put<1>(&str, T)`
    pub fn signature(&self) -> String {
        let generics = if self.generic_arity > 0 {
            format!("<{}>", self.generic_arity)
        } else {
            String::new()
        };
        format!(
            "{} {}{}({})",
            self.kind.label(),
            self.name,
            generics,
            self.parameter_types.join(", ")
        )
    }
}

impl fmt::Display for ImplementationMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// Attaches markers to every implementation member it matches
#[derive(Debug, Clone)]
pub struct MemberSelector {
    name: String,
    parameter_types: Option<Vec<String>>,
    markers: Vec<MarkerDeclaration>,
}

impl MemberSelector {
    /// Select members by name
    pub fn by_name<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            parameter_types: None,
            markers: Vec::new(),
        }
    }

    /// Select members by name and exact parameter types
    pub fn by_signature<N: Into<String>>(name: N, parameter_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameter_types: Some(parameter_types.iter().map(|t| normalize_type_name(t)).collect()),
            markers: Vec::new(),
        }
    }

    /// Add a marker applied to every matched member
    pub fn marker<M: Into<MarkerDeclaration>>(mut self, marker: M) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// Whether `member` is selected
    pub fn matches(&self, member: &ImplementationMember) -> bool {
        member.name() == self.name
            && self
                .parameter_types
                .as_ref()
                .is_none_or(|types| types.as_slice() == member.parameter_types())
    }

    /// Markers carried by the selector
    pub fn markers(&self) -> &[MarkerDeclaration] {
        &self.markers
    }

    /// Human readable description
    pub fn describe(&self) -> String {
        match &self.parameter_types {
            Some(types) => format!("{}({})", self.name, types.join(", ")),
            None => self.name.clone(),
        }
    }
}

/// Description of an implementation type
#[derive(Debug, Clone)]
pub struct ImplementationDescriptor {
    type_name: String,
    class_markers: Vec<MarkerDeclaration>,
    members: Option<Vec<ImplementationMember>>,
    selectors: Vec<MemberSelector>,
}

impl ImplementationDescriptor {
    /// Start describing the implementation type `T`
    pub fn builder<T: ?Sized>() -> ImplementationDescriptorBuilder {
        Self::named(std::any::type_name::<T>())
    }

    /// Start describing an implementation under an explicit name
    pub fn named<N: Into<String>>(type_name: N) -> ImplementationDescriptorBuilder {
        ImplementationDescriptorBuilder {
            descriptor: Self {
                type_name: type_name.into(),
                class_markers: Vec::new(),
                members: None,
                selectors: Vec::new(),
            },
        }
    }

    /// Implementation type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Class-level markers in declaration order
    pub fn class_markers(&self) -> &[MarkerDeclaration] {
        &self.class_markers
    }

    /// Explicitly declared members, `None` when members mirror the contract
    pub fn declared_members(&self) -> Option<&[ImplementationMember]> {
        self.members.as_deref()
    }

    /// Marker selectors in declaration order
    pub fn selectors(&self) -> &[MemberSelector] {
        &self.selectors
    }

    /// Members to resolve against `contract_members`
    pub fn members_for(&self, contract_members: &[ContractMember]) -> Vec<ImplementationMember> {
        match &self.members {
            Some(members) => members.clone(),
            None => contract_members.iter().map(ImplementationMember::mirror).collect(),
        }
    }
}

/// Builder for [`ImplementationDescriptor`]
#[derive(Debug)]
pub struct ImplementationDescriptorBuilder {
    descriptor: ImplementationDescriptor,
}

impl ImplementationDescriptorBuilder {
    /// Add a class-level marker, applied to every woven member
    pub fn class_marker<M: Into<MarkerDeclaration>>(mut self, marker: M) -> Self {
        self.descriptor.class_markers.push(marker.into());
        self
    }

    /// Declare a member explicitly; once any member is declared, mirroring is off
    pub fn member(mut self, member: ImplementationMember) -> Self {
        self.descriptor.members.get_or_insert_with(Vec::new).push(member);
        self
    }

    /// Attach a marker to every member named `name`
    pub fn on<N: Into<String>, M: Into<MarkerDeclaration>>(mut self, name: N, marker: M) -> Self {
        self.descriptor
            .selectors
            .push(MemberSelector::by_name(name).marker(marker));
        self
    }

    /// Attach a marker to the member named `name` with exactly `parameter_types`
    pub fn on_signature<N: Into<String>, M: Into<MarkerDeclaration>>(
        mut self,
        name: N,
        parameter_types: &[&str],
        marker: M,
    ) -> Self {
        self.descriptor
            .selectors
            .push(MemberSelector::by_signature(name, parameter_types).marker(marker));
        self
    }

    /// Add a prepared selector
    pub fn selector(mut self, selector: MemberSelector) -> Self {
        self.descriptor.selectors.push(selector);
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> ImplementationDescriptor {
        self.descriptor
    }
}
