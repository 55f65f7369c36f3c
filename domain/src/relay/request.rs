//! Outbound request value object

use crate::prompt::PromptTemplate;
use crate::session::entities::{Session, Turn};

/// A request to the remote model, built per call and discarded after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    /// The full turn history, continued under a tone instruction.
    Conversation {
        system_instruction: Option<String>,
        turns: Vec<Turn>,
    },
    /// A single free-text prompt with no history.
    Prompt(String),
}

impl OutboundRequest {
    /// Replay a session's history plus the pending user turn, under the
    /// conversational tone instruction.
    ///
    /// The session itself is not modified; the relay records the exchange
    /// once the reply is known.
    pub fn conversation(session: &Session, user_text: &str) -> Self {
        let mut turns: Vec<Turn> = session.replay_turns().cloned().collect();
        turns.push(Turn::user(user_text));
        OutboundRequest::Conversation {
            system_instruction: Some(PromptTemplate::conversation_system().to_string()),
            turns,
        }
    }

    /// Wrap a single message in the stateless template.
    pub fn stateless(user_text: &str) -> Self {
        OutboundRequest::Prompt(PromptTemplate::stateless_prompt(user_text))
    }

    /// Number of turns this request carries.
    pub fn turn_count(&self) -> usize {
        match self {
            OutboundRequest::Conversation { turns, .. } => turns.len(),
            OutboundRequest::Prompt(_) => 1,
        }
    }
}
