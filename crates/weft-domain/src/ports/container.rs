//! Composition Container Port
//!
//! The registration surface writes woven proxies into a container through
//! this port. Each registration carries the contract it fulfils, so the
//! container can hand the proxy out as that contract's object type.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Lifetime hint attached to a registration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationPolicy {
    /// Container decides (treated as shared by the in-memory catalog)
    #[default]
    Any,
    /// One instance per container
    Shared,
    /// New instance per resolution
    NonShared,
}

/// Produces one boxed contract object (`Arc<dyn Trait + Send + Sync>` inside)
pub type InstanceFactory = Arc<dyn Fn() -> Result<Box<dyn Any + Send + Sync>> + Send + Sync>;

/// One container registration
#[derive(Clone)]
pub struct Registration {
    /// Contract name the instance is exported as
    pub contract: String,
    /// Wrapped implementation name
    pub implementation: String,
    /// Lifetime hint
    pub policy: CreationPolicy,
    /// Instance factory
    pub factory: InstanceFactory,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("contract", &self.contract)
            .field("implementation", &self.implementation)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Container receiving woven registrations
pub trait CompositionContainer {
    /// Register an instance factory under its contract
    fn register(&mut self, registration: Registration) -> Result<()>;
}
