//! Woven types and members
//!
//! A [`WovenType`] is the generated wrapper type for one
//! `(contract, implementation)` pair: the member table the proxies dispatch
//! through, indexed by accessor slot. [`Woven`] is the state every proxy
//! instance holds: the shared woven type and the shared target.

mod member;

pub use member::WovenMember;

use std::sync::Arc;
use weft_domain::{Diagnostic, RethrowPolicy};

/// Generated wrapper type of one `(contract, implementation)` pair
#[derive(Debug)]
pub struct WovenType {
    contract: String,
    implementation: String,
    type_name: String,
    members: Vec<WovenMember>,
    source: Option<String>,
    diagnostics: Vec<Diagnostic>,
    policy: RethrowPolicy,
}

impl WovenType {
    /// Assemble a woven type; `members` must be ordered by slot
    pub fn new(
        contract: String,
        implementation: String,
        members: Vec<WovenMember>,
        source: Option<String>,
        diagnostics: Vec<Diagnostic>,
        policy: RethrowPolicy,
    ) -> Self {
        let type_name = proxy_type_name(&contract, &implementation);
        Self {
            contract,
            implementation,
            type_name,
            members,
            source,
            diagnostics,
            policy,
        }
    }

    /// Contract the woven type fulfils
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Wrapped implementation type
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Name of the woven type, e.g. `CalculatorProxy<app::Basic>`
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Member table ordered by slot
    pub fn members(&self) -> &[WovenMember] {
        &self.members
    }

    /// Member backing `slot`
    pub fn member(&self, slot: usize) -> Option<&WovenMember> {
        self.members.get(slot)
    }

    /// Members named `name` (both accessors of a property share its name)
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a WovenMember> + 'a {
        self.members
            .iter()
            .filter(move |m| m.descriptor().name() == name)
    }

    /// Rendered listing, when source emission is enabled
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Non-fatal diagnostics collected during generation
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Error stage policy the members were woven with
    pub fn policy(&self) -> RethrowPolicy {
        self.policy
    }
}

/// Name of the woven type for a contract path and implementation path
pub fn proxy_type_name(contract: &str, implementation: &str) -> String {
    let short = contract.rsplit("::").next().unwrap_or(contract);
    format!("{short}Proxy<{implementation}>")
}

/// State held by every proxy instance
pub struct Woven<I> {
    woven_type: Arc<WovenType>,
    target: Arc<I>,
}

impl<I> Woven<I> {
    /// Bind a woven type to a target
    pub fn new(woven_type: Arc<WovenType>, target: Arc<I>) -> Self {
        Self { woven_type, target }
    }

    /// Wrapped implementation
    pub fn target(&self) -> &I {
        &self.target
    }

    /// Shared handle to the wrapped implementation
    pub fn target_arc(&self) -> &Arc<I> {
        &self.target
    }

    /// Woven type shared by all instances of the pair
    pub fn woven_type(&self) -> &Arc<WovenType> {
        &self.woven_type
    }

    /// Member backing `slot`
    ///
    /// # Panics
    ///
    /// Panics if `slot` is outside the member table, which means the proxy
    /// was assembled with a woven type of another contract.
    pub fn member(&self, slot: usize) -> &WovenMember {
        match self.woven_type.member(slot) {
            Some(member) => member,
            None => panic!(
                "woven type {} has no member in slot {slot}",
                self.woven_type.type_name()
            ),
        }
    }
}

impl<I> Clone for Woven<I> {
    fn clone(&self) -> Self {
        Self {
            woven_type: Arc::clone(&self.woven_type),
            target: Arc::clone(&self.target),
        }
    }
}

impl<I> std::fmt::Debug for Woven<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Woven")
            .field("type", &self.woven_type.type_name())
            .finish_non_exhaustive()
    }
}
