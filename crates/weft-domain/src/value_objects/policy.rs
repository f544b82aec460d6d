//! Error stage rethrow policy

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the error stage combines the decisions of its aspects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RethrowPolicy {
    /// Each aspect overwrites the decision; the last one called decides.
    /// An empty chain rethrows.
    #[default]
    LastAspectDecides,
    /// The failure is rethrown only if every aspect asks for it
    AnyVetoSwallows,
}

impl RethrowPolicy {
    /// Fold one aspect decision into the running decision
    pub fn combine(self, current: bool, decision: bool) -> bool {
        match self {
            Self::LastAspectDecides => decision,
            Self::AnyVetoSwallows => current && decision,
        }
    }
}

impl fmt::Display for RethrowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LastAspectDecides => "last_aspect_decides",
            Self::AnyVetoSwallows => "any_veto_swallows",
        })
    }
}

impl FromStr for RethrowPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_aspect_decides" => Ok(Self::LastAspectDecides),
            "any_veto_swallows" => Ok(Self::AnyVetoSwallows),
            other => Err(Error::configuration(format!(
                "Unknown rethrow policy '{other}'. Valid: last_aspect_decides, any_veto_swallows"
            ))),
        }
    }
}
