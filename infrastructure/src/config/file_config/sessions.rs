//! Session store configuration from TOML (`[sessions]` section)

use mindcare_domain::{ConfigIssue, ConfigIssueCode, SessionPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw session configuration from TOML
///
/// # Example
///
/// ```toml
/// [sessions]
/// max_sessions = 1000
/// idle_ttl_seconds = 3600
/// issue_cookies = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionsConfig {
    /// Capacity bound; the least recently active session is evicted
    pub max_sessions: Option<usize>,
    /// Idle sessions older than this are dropped
    pub idle_ttl_seconds: Option<u64>,
    /// How often the background sweeper runs when a TTL is set
    pub sweep_interval_seconds: u64,
    /// Mint a `session_id` cookie for clients that have none
    pub issue_cookies: bool,
}

impl Default for FileSessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: None,
            idle_ttl_seconds: None,
            sweep_interval_seconds: 60,
            issue_cookies: false,
        }
    }
}

impl FileSessionsConfig {
    pub fn to_policy(&self) -> (SessionPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let mut policy = SessionPolicy::unbounded();

        match self.max_sessions {
            Some(0) => issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "sessions.max_sessions".to_string(),
                },
                "sessions.max_sessions: must be at least 1",
            )),
            Some(max) => policy = policy.with_max_sessions(max),
            None => {}
        }

        if let Some(ttl) = self.idle_ttl_seconds.filter(|&s| s > 0) {
            policy = policy.with_idle_ttl(Duration::from_secs(ttl));
        }

        (policy, issues)
    }

    /// Sweep interval, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}
