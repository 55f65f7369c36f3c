//! Gemini API configuration from TOML (`[gemini]` section)

use mindcare_domain::{ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};

/// Safety thresholds accepted by the API
pub const SAFETY_THRESHOLDS: [&str; 5] = [
    "BLOCK_NONE",
    "BLOCK_ONLY_HIGH",
    "BLOCK_MEDIUM_AND_ABOVE",
    "BLOCK_LOW_AND_ABOVE",
    "OFF",
];

/// Raw Gemini configuration from TOML
///
/// # Example
///
/// ```toml
/// [gemini]
/// api_key_env = "GEMINI_API_KEY"
/// model = "gemini-1.5-pro"
/// timeout_seconds = 30
/// temperature = 0.7
/// safety_threshold = "BLOCK_ONLY_HIGH"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// API key given directly, from a file or `MINDCARE_GEMINI__API_KEY`.
    /// Prefer `api_key_env`.
    pub api_key: Option<String>,
    /// Set by the loader when `api_key` was read from a configuration file
    #[serde(skip)]
    pub api_key_in_file: bool,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub base_url: String,
    pub model: String,
    /// Per-call timeout; 0 disables it
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub safety_threshold: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_in_file: false,
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: crate::gemini::DEFAULT_BASE_URL.to_string(),
            model: Model::default().to_string(),
            timeout_seconds: 30,
            temperature: 0.7,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 2048,
            safety_threshold: "BLOCK_ONLY_HIGH".to_string(),
        }
    }
}

impl FileGeminiConfig {
    /// Resolve the API key: inline value first, then the environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| lookup(&self.api_key_env))
            .filter(|key| !key.trim().is_empty())
    }

    /// Parse the model name, collecting an issue when it is empty.
    pub fn parse_model(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        if self.model.trim().is_empty() {
            return (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName,
                    "gemini.model: model name cannot be empty",
                )],
            );
        }
        let Ok(model) = self.model.trim().parse::<Model>();
        (Some(model), Vec::new())
    }

    /// Parse the safety threshold; "NONE" leaves the API defaults.
    pub fn parse_safety_threshold(&self) -> (Option<String>, Vec<ConfigIssue>) {
        let value = self.safety_threshold.trim().to_uppercase();
        if value == "NONE" || value.is_empty() {
            return (None, Vec::new());
        }
        if SAFETY_THRESHOLDS.contains(&value.as_str()) {
            return (Some(value), Vec::new());
        }
        (
            None,
            vec![ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: "gemini.safety_threshold".to_string(),
                    value: self.safety_threshold.clone(),
                    valid_values: SAFETY_THRESHOLDS.iter().map(|s| s.to_string()).collect(),
                },
                format!(
                    "gemini.safety_threshold: unknown value '{}'",
                    self.safety_threshold
                ),
            )],
        )
    }

    pub(super) fn validate(&self, api_key: Option<&str>) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        match api_key {
            None => issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingApiKey {
                    env_var: self.api_key_env.clone(),
                },
                format!(
                    "gemini: no API key; set {} or gemini.api_key",
                    self.api_key_env
                ),
            )),
            Some(_) if self.api_key.is_some() && self.api_key_in_file => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InlineApiKey,
                    format!(
                        "gemini.api_key is written in a configuration file; prefer the {} environment variable",
                        self.api_key_env
                    ),
                ))
            }
            Some(_) => {}
        }

        issues.extend(self.parse_model().1);
        issues.extend(self.parse_safety_threshold().1);

        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "gemini.temperature".to_string(),
                },
                format!(
                    "gemini.temperature: {} is outside 0.0..=2.0",
                    self.temperature
                ),
            ));
        }

        issues
    }
}
