//! Relay domain.
//!
//! - [`mode::RelayMode`]: conversational (with history) or stateless relaying
//! - [`request::OutboundRequest`]: what gets sent to the remote model
//! - [`failure::FailureKind`]: why a relay fell back instead of answering
//! - [`fallback::FallbackText`]: the fixed strings shown in place of a reply

pub mod failure;
pub mod fallback;
pub mod mode;
pub mod request;
