use moka::future::Cache;
use std::{sync::Arc, time::Duration};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::SessionState;
use crate::config::SessionConfig;

type Slot = Arc<Mutex<SessionState>>;

/// In-memory sessions keyed by the id carried in the session cookie.
///
/// A session idle for longer than the configured timeout is dropped, and at
/// most `max_sessions` are kept.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Slot>,
}

impl SessionStore {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self::with_limits(cfg.max_sessions, cfg.idle_timeout())
    }

    pub fn with_limits(max_sessions: u64, idle_timeout: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle_timeout)
                .build(),
        }
    }

    /// Copy of the session's state; a fresh default for unknown or expired ids.
    pub async fn snapshot(&self, id: Uuid) -> SessionState {
        match self.sessions.get(&id).await {
            Some(slot) => slot.lock().await.clone(),
            None => SessionState::default(),
        }
    }

    /// Run `f` against the session under its lock, creating it on first use.
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let slot = self
            .sessions
            .get_with(id, async { Arc::new(Mutex::new(SessionState::default())) })
            .await;
        let mut state = slot.lock().await;
        f(&mut state)
    }

    /// Live sessions, after pending expirations and evictions are applied.
    pub async fn active_count(&self) -> u64 {
        self.sessions.run_pending_tasks().await;
        self.sessions.entry_count()
    }
}
