//! LLM Gateway port
//!
//! Defines the interface for communicating with the remote generative model.

use async_trait::async_trait;
use mindcare_domain::{FailureKind, Model, OutboundRequest};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
///
/// Each variant maps onto one [`FailureKind`] so the relay can report why it
/// fell back without exposing the error itself to the browser.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Blocked by safety filter: {0}")]
    Blocked(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty response")]
    EmptyResponse,
}

impl GatewayError {
    /// The failure kind reported for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::ConnectionError(_) => FailureKind::Transport,
            GatewayError::Timeout => FailureKind::Timeout,
            GatewayError::RequestFailed { .. } => FailureKind::Status,
            GatewayError::Blocked(_) => FailureKind::Blocked,
            GatewayError::MalformedResponse(_) => FailureKind::Malformed,
            GatewayError::EmptyResponse => FailureKind::Empty,
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to the remote model.
/// Implementations (adapters) live in the infrastructure layer. One call is
/// one network round trip; adapters do not retry.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// The model requests are sent to
    fn model(&self) -> &Model;

    /// Submit a request and return the first candidate's text.
    ///
    /// Returns [`GatewayError::EmptyResponse`] when the model answered
    /// without any text.
    async fn generate(&self, request: &OutboundRequest) -> Result<String, GatewayError>;
}
