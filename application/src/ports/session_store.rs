//! Session store port
//!
//! The store exclusively owns every [`Session`]. Callers receive a shared
//! handle and must lock it to read or append turns.

use async_trait::async_trait;
use mindcare_domain::{Session, SessionId};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to one session's turn history.
///
/// The lock guards short reads and pair appends only; it is never held while
/// waiting on the remote model.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Store mapping session identifiers to conversation state
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the session for `id`, creating and seeding it on first use.
    ///
    /// Repeated calls with the same identifier return handles to the same
    /// turn sequence. This cannot fail.
    async fn get_or_create(&self, id: &SessionId) -> SessionHandle;

    /// Number of live sessions.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop sessions that have outlived the store's idle TTL.
    ///
    /// Returns the number of sessions removed. Stores without expiry
    /// remove nothing.
    async fn prune_expired(&self) -> usize {
        0
    }
}
