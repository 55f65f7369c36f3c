//! Error types for the Gemini adapter

use mindcare_application::GatewayError;
use thiserror::Error;

/// Result type alias for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;

/// Errors that can occur when calling the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Content blocked: {0}")]
    Blocked(String),

    #[error("Failed to parse response: {error}\nRaw response: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Response contained no text")]
    Empty,
}

impl From<GeminiError> for GatewayError {
    fn from(error: GeminiError) -> Self {
        match error {
            GeminiError::Http(e) if e.is_timeout() => GatewayError::Timeout,
            GeminiError::Http(e) if e.is_decode() => GatewayError::MalformedResponse(e.to_string()),
            GeminiError::Http(e) => GatewayError::ConnectionError(e.to_string()),
            GeminiError::Api { status, message } => GatewayError::RequestFailed { status, message },
            GeminiError::Blocked(reason) => GatewayError::Blocked(reason),
            GeminiError::ParseError { error, .. } => GatewayError::MalformedResponse(error),
            GeminiError::Empty => GatewayError::EmptyResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindcare_domain::FailureKind;

    #[test]
    fn api_error_maps_to_status_failure() {
        let error: GatewayError = GeminiError::Api {
            status: 400,
            message: "API key not valid".into(),
        }
        .into();
        assert_eq!(error.kind(), FailureKind::Status);
        assert!(error.to_string().contains("API key not valid"));
    }

    #[test]
    fn parse_error_drops_raw_body() {
        let error: GatewayError = GeminiError::ParseError {
            error: "expected value".into(),
            raw: "<html>".into(),
        }
        .into();
        assert_eq!(error.kind(), FailureKind::Malformed);
        assert!(!error.to_string().contains("<html>"));
    }

    #[test]
    fn blocked_and_empty() {
        let blocked: GatewayError = GeminiError::Blocked("SAFETY".into()).into();
        assert_eq!(blocked.kind(), FailureKind::Blocked);
        let empty: GatewayError = GeminiError::Empty.into();
        assert_eq!(empty.kind(), FailureKind::Empty);
    }
}
