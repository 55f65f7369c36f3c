//! Presentation layer for mindcare
//!
//! This crate contains the CLI definition and the HTTP surface: the
//! embedded chat widget, the message relay endpoint and a health check.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::{Cli, ModeArg};
pub use http::{AppState, ServeError, router, serve};
