//! Infrastructure layer constants
//!
//! Domain naming conventions are defined in `weft_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "weft.toml";

/// Project-local configuration directory
pub const LOCAL_CONFIG_DIR: &str = "config";

/// Directory under the user configuration directory
pub const USER_CONFIG_DIR: &str = "weft";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "WEFT";

/// Separator between nested keys in environment variables (`WEFT_LOGGING__LEVEL`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_FILTER_ENV: &str = "WEFT_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// WEAVING CONSTANTS
// ============================================================================

/// Keep the rendered listing on woven types by default
pub const DEFAULT_EMIT_SOURCE: bool = true;

/// Log generated listings by default
pub const DEFAULT_LOG_GENERATED_SOURCE: bool = false;
