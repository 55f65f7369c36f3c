//! Session capacity policy (Value Object)

use std::time::Duration;

/// Bounds applied by a session store.
///
/// Both bounds are optional. With neither set the store grows without limit
/// for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionPolicy {
    /// Maximum number of live sessions. Creating one more evicts the least
    /// recently active session.
    pub max_sessions: Option<usize>,
    /// Sessions idle for longer than this are dropped.
    pub idle_ttl: Option<Duration>,
}

impl SessionPolicy {
    /// No capacity bound and no expiry.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = Some(max);
        self
    }

    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_sessions.is_none() && self.idle_ttl.is_none()
    }

    /// Whether a session idle for `idle` has outlived the TTL.
    pub fn is_expired(&self, idle: Duration) -> bool {
        self.idle_ttl.is_some_and(|ttl| idle > ttl)
    }

    /// Whether a store holding `len` sessions is at capacity.
    pub fn is_full(&self, len: usize) -> bool {
        self.max_sessions.is_some_and(|max| len >= max)
    }
}
