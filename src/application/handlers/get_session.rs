//! GetSessionHandler - Query handler for the read-only session view.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::SessionView;
use crate::ports::SessionStore;

/// Query for a single session.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for session lookups.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Returns `None` for unknown or expired sessions.
    pub async fn handle(&self, query: GetSessionQuery) -> Option<SessionView> {
        let handle = self.store.get(&query.session_id).await?;
        let session = handle.lock().await;
        Some(SessionView::from(&*session))
    }
}
