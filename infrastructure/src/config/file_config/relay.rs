//! Relay behavior configuration from TOML (`[relay]` section)

use mindcare_domain::{ConfigIssue, ConfigIssueCode, RelayMode};
use serde::{Deserialize, Serialize};

/// Raw relay configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRelayConfig {
    /// `conversational` or `stateless`
    pub mode: String,
    /// Pause before each model call, in milliseconds
    pub thinking_delay_ms: u64,
}

impl FileRelayConfig {
    /// Parse the mode string, falling back to conversational on unknown values.
    pub fn parse_mode(&self) -> (RelayMode, Vec<ConfigIssue>) {
        if self.mode.trim().is_empty() {
            return (RelayMode::default(), Vec::new());
        }
        match self.mode.parse::<RelayMode>() {
            Ok(mode) => (mode, Vec::new()),
            Err(_) => (
                RelayMode::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "relay.mode".to_string(),
                        value: self.mode.clone(),
                        valid_values: vec![
                            "conversational".to_string(),
                            "stateless".to_string(),
                        ],
                    },
                    format!("relay.mode: unknown value '{}'", self.mode),
                )],
            ),
        }
    }
}
