//! Configuration domain concepts.
//!
//! - [`validation::ConfigIssue`]: a structured problem found while validating configuration

pub mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
