//! Failure kinds reported by the relay

use serde::Serialize;
use std::fmt;

/// Why a relay substituted fallback text for a model reply.
///
/// Callers of the HTTP surface never see these; they exist so operators and
/// tests can tell failures apart behind the fixed user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection refused, DNS failure, TLS or other transport error.
    Transport,
    /// No response within the configured bound.
    Timeout,
    /// The remote API answered with a non-success status.
    Status,
    /// The remote API refused the content on safety grounds.
    Blocked,
    /// The response body did not have the expected shape.
    Malformed,
    /// The response was well-formed but carried no text.
    Empty,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Timeout => "timeout",
            FailureKind::Status => "status",
            FailureKind::Blocked => "blocked",
            FailureKind::Malformed => "malformed",
            FailureKind::Empty => "empty",
        }
    }

    /// Whether this kind is an error worth an operator-facing diagnostic.
    ///
    /// An empty generation is an expected outcome, not an error.
    pub fn is_error(&self) -> bool {
        !matches!(self, FailureKind::Empty)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
