//! # Infrastructure Layer
//!
//! Technical concerns around the weaving engine and the registration surface
//! built on them.
//!
//! ## Module Categories
//!
//! ### Weaving
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Generated type cache keyed by `(contract, implementation)` |
//! | [`registration`] | `Weaver`: wrap, batch wrap, container and export registration |
//!
//! ### Configuration & Composition
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-layered configuration (defaults, TOML, `WEFT_` env) |
//! | [`di`] | In-memory composition catalog |
//! | [`constants`] | Centralized infrastructure constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing, generation observer |

pub mod cache;
pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod logging;
pub mod registration;

// Re-export commonly used types
pub use cache::{CacheKey, GeneratedTypeCache};
pub use config::{ConfigLoader, WeftConfig};
pub use di::ServiceCatalog;
pub use error_ext::ErrorContext;
pub use logging::TracingObserver;
pub use registration::{ExportEntry, WOVEN_EXPORTS, Weaver, WeaverBuilder, register_export};
