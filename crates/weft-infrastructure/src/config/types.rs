//! Configuration types

use crate::constants::{DEFAULT_EMIT_SOURCE, DEFAULT_LOG_GENERATED_SOURCE, DEFAULT_LOG_LEVEL};
use serde::{Deserialize, Serialize};
use weft_domain::RethrowPolicy;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeftConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Weaving configuration
    pub weaving: WeavingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
        }
    }
}

/// Weaving configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeavingConfig {
    /// How the error stage combines aspect decisions
    pub rethrow_policy: RethrowPolicy,

    /// Keep the rendered listing on woven types
    pub emit_source: bool,

    /// Log full listings at trace level
    pub log_generated_source: bool,
}

impl Default for WeavingConfig {
    fn default() -> Self {
        Self {
            rethrow_policy: RethrowPolicy::default(),
            emit_source: DEFAULT_EMIT_SOURCE,
            log_generated_source: DEFAULT_LOG_GENERATED_SOURCE,
        }
    }
}
