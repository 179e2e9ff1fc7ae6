//! Session Store Port - the keyed table of live sessions.
//!
//! The table is the only shared mutable structure in the engine. Each
//! entry is a [`SessionHandle`]: holding its lock is what serializes turns
//! for one session, including any advisory wait inside the turn.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::{DocumentReference, Session};

/// Shared, lockable session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Port for session storage.
///
/// # Contract
///
/// Implementations must:
/// - Never fail `get_or_create` for a missing or malformed id; create a
///   fresh session under a new id instead
/// - Remove a session on sweep only when its idle time is strictly greater
///   than `max_idle`
/// - Never remove a session whose handle is held by an in-flight turn
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session for `id`, or a new one under a new id.
    async fn get_or_create(&self, id: Option<&str>) -> SessionHandle;

    /// Returns the session for `id`, if present.
    async fn get(&self, id: &SessionId) -> Option<SessionHandle>;

    /// Removes sessions idle longer than `max_idle` at `now`.
    ///
    /// Returns the document references the removed sessions held.
    async fn sweep_as_of(&self, now: Timestamp, max_idle: Duration) -> Vec<DocumentReference>;

    /// [`sweep_as_of`](Self::sweep_as_of) at the current time.
    async fn sweep(&self, max_idle: Duration) -> Vec<DocumentReference> {
        self.sweep_as_of(Timestamp::now(), max_idle).await
    }

    /// Number of live sessions.
    async fn count(&self) -> usize;
}
