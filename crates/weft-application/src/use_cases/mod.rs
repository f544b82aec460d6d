//! Use cases
//!
//! - **generator** - Builds the woven type of a `(contract, implementation)` pair

pub mod generator;

pub use generator::ProxyTypeGenerator;
