//! In-memory session store
//!
//! Sessions live for the lifetime of the process unless the configured
//! [`SessionPolicy`] bounds them. Lookup and creation hold the map's write
//! lock only for the map operation; turn appends go through each session's
//! own lock.

use async_trait::async_trait;
use mindcare_application::{SessionHandle, SessionStore};
use mindcare_domain::{Session, SessionId, SessionPolicy};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

struct Entry {
    handle: SessionHandle,
    last_active: Instant,
}

/// [`SessionStore`] backed by a `HashMap` behind an async `RwLock`.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    policy: SessionPolicy,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SessionPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Look up or create a session as of `now`.
    async fn get_or_create_at(&self, id: &SessionId, now: Instant) -> SessionHandle {
        let mut sessions = self.sessions.write().await;

        if let Some(entry) = sessions.get_mut(id) {
            if !self.policy.is_expired(now.saturating_duration_since(entry.last_active)) {
                entry.last_active = now;
                return entry.handle.clone();
            }
            debug!("Session {} expired, starting over", id);
            sessions.remove(id);
        }

        if self.policy.is_full(sessions.len()) {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_active)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                debug!("Session store full, evicting {}", oldest);
                sessions.remove(&oldest);
            }
        }

        let handle = Arc::new(Mutex::new(Session::with_introduction(id.clone())));
        sessions.insert(
            id.clone(),
            Entry {
                handle: handle.clone(),
                last_active: now,
            },
        );
        debug!("Created session {} ({} live)", id, sessions.len());
        handle
    }

    /// Remove every session idle for longer than the TTL as of `now`.
    pub async fn prune_idle_at(&self, now: Instant) -> usize {
        if self.policy.idle_ttl.is_none() {
            return 0;
        }
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            !self
                .policy
                .is_expired(now.saturating_duration_since(entry.last_active))
        });
        before - sessions.len()
    }

    /// Periodically prune idle sessions until `cancel` fires.
    pub fn spawn_sweeper(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = self.prune_expired().await;
                        if removed > 0 {
                            info!("Pruned {} idle sessions", removed);
                        }
                    }
                }
            }
            debug!("Session sweeper stopped");
        })
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, id: &SessionId) -> SessionHandle {
        self.get_or_create_at(id, Instant::now()).await
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn prune_expired(&self) -> usize {
        self.prune_idle_at(Instant::now()).await
    }
}
