//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown relay mode '{0}' (expected 'conversational' or 'stateless')")]
    InvalidRelayMode(String),

    #[error("missing credential: set {0}")]
    MissingCredential(String),
}
