//! Fallback texts substituted for model replies

use super::failure::FailureKind;
use super::mode::RelayMode;

/// Shown when the model answered but produced no usable text.
pub const EMPTY_RESPONSE: &str = "Sorry, I couldn't generate a response. Please try again.";

/// Shown when a conversational relay fails.
pub const CONVERSATION_ERROR: &str =
    "Sorry, I encountered an error. Let's try again. What's on your mind?";

/// Shown when a stateless relay fails.
pub const SERVICE_ERROR: &str = "Sorry, there was an error communicating with the AI service.";

/// Fixed user-facing texts, selected by relay mode and failure kind
pub struct FallbackText;

impl FallbackText {
    pub fn for_failure(mode: RelayMode, kind: FailureKind) -> &'static str {
        match kind {
            FailureKind::Empty => EMPTY_RESPONSE,
            _ => Self::error(mode),
        }
    }

    pub fn error(mode: RelayMode) -> &'static str {
        match mode {
            RelayMode::Conversational => CONVERSATION_ERROR,
            RelayMode::Stateless => SERVICE_ERROR,
        }
    }
}
