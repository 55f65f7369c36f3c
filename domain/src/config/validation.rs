//! Configuration validation results.
//!
//! Validation never fails outright; it returns every detected issue with a
//! severity so callers can print warnings and refuse to start on errors.
//!
//! # Examples
//!
//! ```
//! use mindcare_domain::config::{ConfigIssue, ConfigIssueCode, Severity};
//!
//! let issues = vec![ConfigIssue::warning(
//!     ConfigIssueCode::UnboundedSessions,
//!     "sessions: no capacity bound",
//! )];
//! assert!(!ConfigIssue::has_errors(&issues));
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the relay cannot start with this configuration.
    Error,
    /// Non-fatal: the relay works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No API key in the config file or the named environment variable.
    MissingApiKey { env_var: String },
    /// API key written directly into a configuration file.
    InlineApiKey,
    /// Model identifier is empty.
    EmptyModelName,
    /// A string field holds a value outside its enumeration.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field is outside its accepted range.
    OutOfRange { field: String },
    /// Conversational mode with neither a capacity bound nor an idle TTL.
    UnboundedSessions,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Returns true if any issue is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}
