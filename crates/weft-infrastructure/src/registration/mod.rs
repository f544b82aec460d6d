//! Registration surface
//!
//! [`Weaver`] wraps implementations in woven proxies, one cached woven type
//! per `(contract, implementation)` pair, and registers proxies into a
//! composition container one at a time or in batches of [`ExportEntry`].

mod exports;
mod weaver;

pub use exports::{ExportEntry, ExportRegistrar, WOVEN_EXPORTS, list_exports, register_export};
pub use weaver::{Weaver, WeaverBuilder};
