//! Error context for foreign failures
//!
//! Figment, TOML and filesystem errors reach the weaver's callers as the
//! domain [`Error`] variant of the concern that failed, with a message
//! prefix and the original kept as `source`.

use std::error::Error as StdError;
use std::fmt;
use weft_domain::error::{Error, Result};

/// Attach weaving-side context to a foreign `Result`
///
/// ```ignore
/// let config: WeftConfig = figment.extract().config_context("Failed to extract configuration")?;
/// std::fs::write(&path, listing).io_context(format!("Failed to write {}", path.display()))?;
/// ```
pub trait ErrorContext<T>: Sized {
    /// Fail as `Error::Configuration`
    fn config_context<C: fmt::Display>(self, context: C) -> Result<T>;

    /// Fail as `Error::Io`
    fn io_context<C: fmt::Display>(self, context: C) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn config_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::configuration_with_source(format!("{context}: {err}"), err))
    }

    fn io_context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.map_err(|err| Error::Io {
            message: format!("{context}: {err}"),
            source: Some(Box::new(err)),
        })
    }
}
