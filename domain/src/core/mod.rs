//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the remote generative model to relay to
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
