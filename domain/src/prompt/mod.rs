//! Prompt domain
//!
//! Fixed texts sent to the remote model: the seeded introductory exchange,
//! the conversational tone instruction and the stateless reply template.

mod template;

pub use template::PromptTemplate;
