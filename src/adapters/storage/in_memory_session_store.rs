//! In-Memory Session Store
//!
//! Keeps live sessions in a process-local table. Each entry is an
//! `Arc<Mutex<Session>>`, so a turn holds the session lock for its whole
//! duration while other sessions proceed independently.

use async_trait::async_trait;
use chrono::Duration;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::{DocumentReference, Session};
use crate::ports::{SessionHandle, SessionStore};

/// In-memory session table.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, SessionHandle>>>,
    max_log_turns: usize,
}

impl InMemorySessionStore {
    /// Creates an empty store whose sessions keep `max_log_turns` log entries.
    pub fn new(max_log_turns: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_log_turns,
        }
    }

    /// Clear all sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    async fn lookup(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(50)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, id: Option<&str>) -> SessionHandle {
        if let Some(parsed) = id.and_then(|raw| raw.trim().parse::<SessionId>().ok()) {
            if let Some(handle) = self.lookup(&parsed).await {
                return handle;
            }
        }

        let new_id = SessionId::new();
        let handle = Arc::new(Mutex::new(Session::new(new_id, self.max_log_turns)));
        self.sessions
            .write()
            .await
            .insert(new_id, Arc::clone(&handle));

        debug!(session_id = %new_id, requested = id.unwrap_or("none"), "Session created");
        handle
    }

    async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.lookup(id).await
    }

    async fn sweep_as_of(&self, now: Timestamp, max_idle: Duration) -> Vec<DocumentReference> {
        let mut table = self.sessions.write().await;
        let mut documents = Vec::new();
        let before = table.len();

        table.retain(|id, handle| {
            // Any other holder is an in-flight turn or reader.
            if Arc::strong_count(handle) > 1 {
                return true;
            }
            let Ok(session) = handle.try_lock() else {
                return true;
            };
            if session.idle_for(&now) > max_idle {
                debug!(session_id = %id, "Session expired");
                documents.extend(session.documents().iter().cloned());
                false
            } else {
                true
            }
        });

        let removed = before - table.len();
        if removed > 0 {
            info!(
                removed,
                remaining = table.len(),
                documents = documents.len(),
                "Session sweep"
            );
        }
        documents
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
