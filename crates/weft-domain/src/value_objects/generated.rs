//! Generation outputs: diagnostics, rendered source and build reports

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational
    Info,
    /// Suspicious but not fatal
    Warning,
    /// Fatal for the attempt
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Message produced while generating a woven type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Member concerned, if any
    pub member: Option<String>,
    /// Message text
    pub message: String,
}

impl Diagnostic {
    fn new<S: Into<String>>(severity: Severity, member: Option<String>, message: S) -> Self {
        Self {
            severity,
            member,
            message: message.into(),
        }
    }

    /// Error diagnostic
    pub fn error<S: Into<String>>(member: Option<String>, message: S) -> Self {
        Self::new(Severity::Error, member, message)
    }

    /// Warning diagnostic
    pub fn warning<S: Into<String>>(member: Option<String>, message: S) -> Self {
        Self::new(Severity::Warning, member, message)
    }

    /// Informational diagnostic
    pub fn info<S: Into<String>>(member: Option<String>, message: S) -> Self {
        Self::new(Severity::Info, member, message)
    }

    /// Whether this is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.member {
            Some(member) => write!(f, "[{}] {member}: {}", self.severity, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Rendered source listing of a woven type, handed to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSource {
    /// Contract name
    pub contract: String,
    /// Implementation name
    pub implementation: String,
    /// Name of the woven type
    pub type_name: String,
    /// Listing
    pub source: String,
}

/// Outcome of one generation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Contract name
    pub contract: String,
    /// Implementation name
    pub implementation: String,
    /// Whether a woven type was produced
    pub success: bool,
    /// Diagnostics collected during the attempt
    pub diagnostics: Vec<Diagnostic>,
    /// Time spent
    pub elapsed: Duration,
}

impl BuildReport {
    /// Whether any error diagnostic was collected
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Warning diagnostics
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}
