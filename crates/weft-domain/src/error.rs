//! Error handling types

use crate::value_objects::Diagnostic;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Weft
///
/// Failures of a woven member itself are not represented here: they travel
/// as the member's own error type and are settled by the error stage.
#[derive(Error, Debug)]
pub enum Error {
    /// No implementation member matches a contract member
    #[error(
        "No member of '{implementation}' matches contract member '{contract}::{member}'{}",
        format_candidates(.candidates)
    )]
    NoMatchingMember {
        /// Contract being woven
        contract: String,
        /// Implementation type being wrapped
        implementation: String,
        /// Signature of the unmatched contract member
        member: String,
        /// Ambiguous candidates, empty when nothing matched at all
        candidates: Vec<String>,
    },

    /// Wrapper generation failed
    #[error("Failed to generate wrapper for '{contract}' over '{implementation}': {message}")]
    Generation {
        /// Contract being woven
        contract: String,
        /// Implementation type being wrapped
        implementation: String,
        /// Description of the failure
        message: String,
        /// Diagnostics collected during the attempt
        diagnostics: Vec<Diagnostic>,
    },

    /// A contract descriptor is malformed
    #[error("Invalid contract '{contract}': {message}")]
    InvalidContract {
        /// Contract being described
        contract: String,
        /// Description of the problem
        message: String,
    },

    /// A marker could not be reconstructed into an aspect
    #[error("Invalid marker '{aspect}': {message}")]
    InvalidMarker {
        /// Aspect name carried by the marker
        aspect: String,
        /// Description of the problem
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Container registration error
    #[error("Registration error: {message}")]
    Registration {
        /// Description of the registration error
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

fn format_candidates(candidates: &[String]) -> String {
    if candidates.is_empty() {
        String::new()
    } else {
        format!(" (ambiguous candidates: {})", candidates.join(", "))
    }
}

// Weaving error creation methods
impl Error {
    /// Create a no-matching-member error
    pub fn no_matching_member<C, I, M>(contract: C, implementation: I, member: M) -> Self
    where
        C: Into<String>,
        I: Into<String>,
        M: Into<String>,
    {
        Self::NoMatchingMember {
            contract: contract.into(),
            implementation: implementation.into(),
            member: member.into(),
            candidates: Vec::new(),
        }
    }

    /// Create a generation error without diagnostics
    pub fn generation<C, I, M>(contract: C, implementation: I, message: M) -> Self
    where
        C: Into<String>,
        I: Into<String>,
        M: Into<String>,
    {
        Self::Generation {
            contract: contract.into(),
            implementation: implementation.into(),
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Create an invalid marker error
    pub fn invalid_marker<A: Into<String>, M: Into<String>>(aspect: A, message: M) -> Self {
        Self::InvalidMarker {
            aspect: aspect.into(),
            message: message.into(),
        }
    }

    /// Diagnostics carried by a generation error, empty for every other variant
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Generation { diagnostics, .. } => diagnostics,
            _ => &[],
        }
    }
}

// Configuration and infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a registration error
    pub fn registration<S: Into<String>>(message: S) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
