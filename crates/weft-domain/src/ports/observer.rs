//! Generation Observer Port
//!
//! Hooks fired by the proxy type generator. `on_code_generated` may reject a
//! listing, which fails the attempt; `on_build_complete` fires exactly once
//! per attempt.

use crate::value_objects::{BuildReport, GeneratedSource};
use thiserror::Error;

/// Error returned by a generation hook
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HookError {
    /// Description of the rejection
    pub message: String,
}

impl HookError {
    /// Create a hook error
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Observer of woven type generation
pub trait GenerationObserver: Send + Sync {
    /// Called with the rendered listing before the woven type is returned
    fn on_code_generated(&self, _source: &GeneratedSource) -> Result<(), HookError> {
        Ok(())
    }

    /// Called once per generation attempt, success or failure
    fn on_build_complete(&self, _report: &BuildReport) {}
}
