//! Configuration management
//!
//! Layered configuration for logging and weaving behaviour. Sources are
//! merged by [`ConfigLoader`] with Figment.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{LoggingConfig, WeavingConfig, WeftConfig};
