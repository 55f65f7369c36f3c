//! Application layer for mindcare
//!
//! This crate contains the relay use case, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    conversation_logger::{
        ConversationEvent, ConversationLogger, MemoryConversationLogger, NoConversationLogger,
    },
    llm_gateway::{GatewayError, LlmGateway},
    session_store::{SessionHandle, SessionStore},
};
pub use use_cases::relay_message::{RelayInput, RelayMessageUseCase, RelayOutcome};
