//! Session domain entities

use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier used when the client supplies no session token.
pub const DEFAULT_SESSION_ID: &str = "default";

/// Opaque session token supplied by the browser (Value Object)
///
/// Any string is accepted, including the empty string. An absent token maps
/// to [`DEFAULT_SESSION_ID`], so every cookie-less client shares one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Resolve an optional client token, falling back to the default sentinel.
    pub fn from_optional(id: Option<&str>) -> Self {
        match id {
            Some(id) => Self::new(id),
            None => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self(DEFAULT_SESSION_ID.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single turn in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A conversation between one browser client and the relay (Entity)
///
/// Turns are only ever appended, one user/assistant exchange at a time.
/// Exchanges that ended in a fallback stay in [`turns()`](Self::turns) but
/// are left out of [`replay_turns()`](Self::replay_turns), so a rejected
/// prompt is not sent again on later calls. Exchanges started by a blank
/// message are left out the same way.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    turns: Vec<Turn>,
    /// Parallel to `turns`
    replayed: Vec<bool>,
}

impl Session {
    /// Create an empty session.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            turns: Vec::new(),
            replayed: Vec::new(),
        }
    }

    /// Create a session seeded with the introductory exchange.
    ///
    /// The exchange stands in for a system prompt: one user turn followed by
    /// the assistant's self-introduction.
    pub fn with_introduction(id: SessionId) -> Self {
        let mut session = Self::new(id);
        let (user, assistant) = PromptTemplate::introduction();
        session.add_exchange(user, assistant);
        session
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Turns to send back to the model as context.
    pub fn replay_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns
            .iter()
            .zip(&self.replayed)
            .filter_map(|(turn, replayed)| replayed.then_some(turn))
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a user turn and the assistant's reply as one adjacent pair.
    pub fn add_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.push_exchange(user.into(), assistant.into(), true);
    }

    /// Record an exchange whose reply was a fallback; it is not replayed.
    pub fn add_failed_exchange(&mut self, user: impl Into<String>, fallback: impl Into<String>) {
        self.push_exchange(user.into(), fallback.into(), false);
    }

    fn push_exchange(&mut self, user: String, assistant: String, replayed: bool) {
        // A blank message gives the model nothing to answer
        let replayed = replayed && !user.trim().is_empty();
        self.turns.push(Turn::user(user));
        self.turns.push(Turn::assistant(assistant));
        self.replayed.extend([replayed, replayed]);
    }
}
