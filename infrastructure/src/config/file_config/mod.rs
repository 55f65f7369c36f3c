//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and adapter
//! types by the `parse_*` / `to_*` helpers, which also collect issues.

mod gemini;
mod logging;
mod relay;
mod server;
mod sessions;

pub use gemini::{FileGeminiConfig, SAFETY_THRESHOLDS};
pub use logging::FileLoggingConfig;
pub use relay::FileRelayConfig;
pub use server::FileServerConfig;
pub use sessions::FileSessionsConfig;

use crate::gemini::{GeminiConfig, GenerationConfig};
use mindcare_application::BehaviorConfig;
use mindcare_domain::{ConfigIssue, ConfigIssueCode, RelayMode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP listener
    pub server: FileServerConfig,
    /// Remote model settings
    pub gemini: FileGeminiConfig,
    /// Relay mode and pacing
    pub relay: FileRelayConfig,
    /// Session bounds and cookie issuance
    pub sessions: FileSessionsConfig,
    /// Conversation log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Any [`Severity::Error`](mindcare_domain::Severity::Error) means the
    /// relay must not start.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.validate_with(self.gemini.resolve_api_key().as_deref())
    }

    fn validate_with(&self, api_key: Option<&str>) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.gemini.validate(api_key));

        let (mode, mode_issues) = self.relay.parse_mode();
        issues.extend(mode_issues);

        let (policy, policy_issues) = self.sessions.to_policy();
        issues.extend(policy_issues);

        if mode == RelayMode::Conversational && policy.is_unbounded() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnboundedSessions,
                "sessions: neither max_sessions nor idle_ttl_seconds is set; \
                 conversation history grows for the lifetime of the process",
            ));
        }

        issues
    }

    /// Behavior settings for the relay use case.
    pub fn behavior(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(Some(self.gemini.timeout_seconds))
            .with_thinking_delay_ms(self.relay.thinking_delay_ms)
    }

    /// Adapter settings for the Gemini gateway.
    ///
    /// Invalid values fall back to defaults; call [`validate`](Self::validate)
    /// first to reject them.
    pub fn gemini_config(&self, api_key: String) -> GeminiConfig {
        let model = self.gemini.parse_model().0.unwrap_or_default();
        let mut config = GeminiConfig::new(api_key, model).with_base_url(&self.gemini.base_url);
        config.generation = GenerationConfig {
            temperature: self.gemini.temperature,
            top_p: self.gemini.top_p,
            top_k: self.gemini.top_k,
            max_output_tokens: self.gemini.max_output_tokens,
        };
        config.safety_threshold = self.gemini.parse_safety_threshold().0;
        config
    }
}
