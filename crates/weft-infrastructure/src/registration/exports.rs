//! Woven exports
//!
//! An export names a contract, the implementation that fulfils it and a
//! creation policy hint. Exports are submitted to the `WOVEN_EXPORTS`
//! distributed slice and registered in one pass with
//! [`Weaver::register_linked_exports`].
//!
//! ```ignore
//! #[linkme::distributed_slice(weft::WOVEN_EXPORTS)]
//! static BASIC_CALCULATOR: ExportEntry = ExportEntry {
//!     contract: "app::Calculator",
//!     implementation: "app::Basic",
//!     policy: CreationPolicy::Shared,
//!     register: register_export::<CalculatorContract, Basic>,
//! };
//! ```

use super::Weaver;
use std::fmt;
use weft_application::ObjectContract;
use weft_domain::error::Result;
use weft_domain::{CompositionContainer, CreationPolicy, Implementation};

/// Registers one export into a container
pub type ExportRegistrar = fn(&Weaver, &mut dyn CompositionContainer, CreationPolicy) -> Result<()>;

/// Registry entry for woven exports
pub struct ExportEntry {
    /// Contract name, for logs
    pub contract: &'static str,
    /// Implementation name, for logs
    pub implementation: &'static str,
    /// Creation policy hint passed to the container
    pub policy: CreationPolicy,
    /// Registration function
    pub register: ExportRegistrar,
}

impl fmt::Debug for ExportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportEntry")
            .field("contract", &self.contract)
            .field("implementation", &self.implementation)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[linkme::distributed_slice]
pub static WOVEN_EXPORTS: [ExportEntry] = [..];

/// List all linked exports as `(contract, implementation)`
pub fn list_exports() -> Vec<(&'static str, &'static str)> {
    WOVEN_EXPORTS
        .iter()
        .map(|e| (e.contract, e.implementation))
        .collect()
}

/// Registrar for an implementation built with `Default`
pub fn register_export<C, I>(
    weaver: &Weaver,
    container: &mut dyn CompositionContainer,
    policy: CreationPolicy,
) -> Result<()>
where
    C: ObjectContract<I>,
    I: Implementation + Default,
{
    weaver.register::<C, I, _>(container, policy, I::default)
}
