//! Infrastructure layer for mindcare
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod gemini;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileGeminiConfig, FileLoggingConfig, FileRelayConfig,
    FileServerConfig, FileSessionsConfig,
};
pub use gemini::{GeminiConfig, GeminiError, GeminiGateway};
pub use logging::JsonlConversationLogger;
pub use session::InMemorySessionStore;
