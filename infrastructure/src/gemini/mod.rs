//! Gemini API adapter
//!
//! Implements the [`LlmGateway`](mindcare_application::LlmGateway) port over
//! the Generative Language REST API.

pub mod error;
pub mod gateway;
pub mod protocol;

pub use error::{GeminiError, Result};
pub use gateway::{DEFAULT_BASE_URL, GeminiConfig, GeminiGateway};
pub use protocol::{GenerationConfig, HARM_CATEGORIES};
