//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as the bound on waiting for the remote model.

use std::time::Duration;

/// Application behavior configuration.
///
/// Controls runtime behavior of the relay like the timeout for LLM API calls.
#[derive(Debug, Clone, Default)]
pub struct BehaviorConfig {
    /// Maximum time to wait for an API response before timing out.
    pub timeout: Option<Duration>,
    /// Pause before each outbound call, giving the widget a "thinking" beat.
    pub thinking_delay: Option<Duration>,
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with a timeout specified in seconds.
    pub fn with_timeout_seconds(seconds: u64) -> Self {
        Self {
            timeout: Some(Duration::from_secs(seconds)),
            ..Self::default()
        }
    }

    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None` or zero, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.filter(|s| *s > 0).map(Duration::from_secs),
            ..Self::default()
        }
    }

    /// Sets the thinking delay in milliseconds; zero disables it.
    pub fn with_thinking_delay_ms(mut self, millis: u64) -> Self {
        self.thinking_delay = (millis > 0).then(|| Duration::from_millis(millis));
        self
    }
}
