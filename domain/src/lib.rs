//! Domain layer for mindcare
//!
//! This crate contains the core entities and value objects of the chat relay.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! A session is the conversation of one browser client, identified by an
//! opaque token. It holds an append-only sequence of role-tagged turns,
//! seeded with a fixed introductory exchange.
//!
//! ## Relay
//!
//! - **Conversational**: the whole session history is replayed to the model
//! - **Stateless**: each message is wrapped in a fixed template, no memory
//!
//! Whatever goes wrong, the user receives a fixed fallback text; the
//! [`FailureKind`] behind it is kept for operators.

pub mod config;
pub mod core;
pub mod prompt;
pub mod relay;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, model::Model};
pub use prompt::PromptTemplate;
pub use relay::{
    failure::FailureKind,
    fallback::FallbackText,
    mode::RelayMode,
    request::OutboundRequest,
};
pub use session::{
    entities::{DEFAULT_SESSION_ID, Role, Session, SessionId, Turn},
    policy::SessionPolicy,
};
