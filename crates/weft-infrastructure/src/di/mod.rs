//! Composition
//!
//! [`ServiceCatalog`] is the in-memory [`CompositionContainer`] the
//! registration surface writes woven proxies into.
//!
//! ```ignore
//! let mut catalog = ServiceCatalog::new();
//! weaver.register::<CalculatorContract, Basic, _>(&mut catalog, CreationPolicy::Shared, Basic::default)?;
//! let calculator: Arc<dyn Calculator + Send + Sync> = catalog.resolve(CalculatorContract::NAME)?;
//! ```
//!
//! [`CompositionContainer`]: weft_domain::CompositionContainer

pub mod catalog;

pub use catalog::ServiceCatalog;
