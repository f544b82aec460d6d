//! Structured logging with tracing
//!
//! Installs the process subscriber from [`LoggingConfig`] and provides
//! [`TracingObserver`], the generation observer that reports woven type
//! builds through `tracing`.

use crate::constants::LOG_FILTER_ENV;
use tracing::{Level, debug, info, trace, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use weft_domain::error::{Error, Result};
use weft_domain::{BuildReport, GeneratedSource, GenerationObserver, HookError};

pub use crate::config::LoggingConfig;

/// Initialize logging with the provided configuration
///
/// `WEFT_LOG` overrides the configured level with any `EnvFilter` directive.
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Layer types differ, hence the two branches
    let installed = if config.json_format {
        let stdout = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        Registry::default().with(filter).with(stdout).try_init()
    } else {
        let stdout = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);
        Registry::default().with(filter).with(stdout).try_init()
    };
    installed.map_err(|e| Error::configuration_with_source("Failed to install logging subscriber", e))?;

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Log configuration loading status
pub fn log_config_loaded(config_path: &std::path::Path, success: bool) {
    if success {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("Configuration file not found: {}", config_path.display());
    }
}

/// Generation observer logging every listing and build report
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver {
    log_source: bool,
}

impl TracingObserver {
    /// Observer that also logs full listings at trace level when `log_source` is set
    pub fn new(log_source: bool) -> Self {
        Self { log_source }
    }
}

impl GenerationObserver for TracingObserver {
    fn on_code_generated(&self, source: &GeneratedSource) -> std::result::Result<(), HookError> {
        debug!(
            woven_type = %source.type_name,
            lines = source.source.lines().count(),
            "Woven type listing rendered"
        );
        if self.log_source {
            trace!(woven_type = %source.type_name, "\n{}", source.source);
        }
        Ok(())
    }

    fn on_build_complete(&self, report: &BuildReport) {
        if report.success {
            info!(
                contract = %report.contract,
                implementation = %report.implementation,
                warnings = report.warnings().count(),
                elapsed_us = u64::try_from(report.elapsed.as_micros()).unwrap_or(u64::MAX),
                "Woven type built"
            );
        } else {
            for diagnostic in &report.diagnostics {
                warn!(contract = %report.contract, "{diagnostic}");
            }
            warn!(
                contract = %report.contract,
                implementation = %report.implementation,
                "Woven type build failed"
            );
        }
    }
}
