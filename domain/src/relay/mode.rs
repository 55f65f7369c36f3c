//! Relay mode value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the relay treats conversation history.
///
/// One mode is chosen per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    /// Keep a per-session history and replay it on every call (default).
    #[default]
    Conversational,
    /// No memory: each message is wrapped in a fixed template and sent alone.
    Stateless,
}

impl RelayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMode::Conversational => "conversational",
            RelayMode::Stateless => "stateless",
        }
    }

    pub fn keeps_history(&self) -> bool {
        matches!(self, RelayMode::Conversational)
    }
}

impl fmt::Display for RelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelayMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conversational" | "stateful" | "chat" => Ok(RelayMode::Conversational),
            "stateless" | "oneshot" => Ok(RelayMode::Stateless),
            other => Err(DomainError::InvalidRelayMode(other.to_string())),
        }
    }
}
