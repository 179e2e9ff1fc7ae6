//! SessionSweeper - Background service that expires idle sessions.
//!
//! Each pass asks the store to drop sessions idle longer than `max_idle`
//! and hands the documents they held to the file lifecycle collaborator.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 60s | Time between passes |
//! | `max_idle` | 30min | Idle time after which a session expires |
//!
//! ## Graceful Shutdown
//!
//! The loop listens on a watch channel and runs one final pass before
//! returning.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::foundation::Timestamp;
use crate::ports::{FileLifecycle, SessionStore};

/// Configuration for the SessionSweeper service.
#[derive(Debug, Clone)]
pub struct SessionSweeperConfig {
    pub interval: Duration,
    pub max_idle: chrono::Duration,
}

impl Default for SessionSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_idle: chrono::Duration::seconds(1800),
        }
    }
}

impl SessionSweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_idle(mut self, max_idle: chrono::Duration) -> Self {
        self.max_idle = max_idle;
        self
    }
}

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// References handed to the file lifecycle collaborator.
    pub documents: usize,
    /// Artifacts actually deleted.
    pub reclaimed: usize,
}

pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    lifecycle: Arc<dyn FileLifecycle>,
    config: SessionSweeperConfig,
}

impl SessionSweeper {
    pub fn new(
        store: Arc<dyn SessionStore>,
        lifecycle: Arc<dyn FileLifecycle>,
        config: SessionSweeperConfig,
    ) -> Self {
        Self {
            store,
            lifecycle,
            config,
        }
    }

    /// Run the sweep loop until shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender counts as shutdown.
                    if changed.is_err() || *shutdown.borrow() {
                        self.run_once().await;
                        info!("Session sweeper stopped");
                        return;
                    }
                }
                _ = interval.tick() => {
                    self.run_once().await;
                }
            }
        }
    }

    /// Spawns [`run`](Self::run) onto the runtime.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// One pass at the current time.
    pub async fn run_once(&self) -> SweepReport {
        self.run_once_as_of(Timestamp::now()).await
    }

    /// One pass as of `now`.
    pub async fn run_once_as_of(&self, now: Timestamp) -> SweepReport {
        let documents = self.store.sweep_as_of(now, self.config.max_idle).await;
        if documents.is_empty() {
            return SweepReport::default();
        }

        let reclaimed = match self.lifecycle.reclaim(&documents).await {
            Ok(count) => {
                debug!(count, "Artifacts reclaimed");
                count
            }
            Err(e) => {
                warn!(error = %e, documents = documents.len(), "Artifact reclaim incomplete");
                0
            }
        };

        SweepReport {
            documents: documents.len(),
            reclaimed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::forms::{BoundSchema, FieldDefinition, FormMetadata, FormSchema};
    use crate::domain::foundation::DocumentId;
    use crate::domain::session::DocumentReference;
    use crate::ports::LifecycleError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLifecycle {
        reclaimed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileLifecycle for RecordingLifecycle {
        async fn reclaim(&self, references: &[DocumentReference]) -> Result<usize, LifecycleError> {
            let mut reclaimed = self.reclaimed.lock().unwrap();
            reclaimed.extend(references.iter().map(|r| r.filename.clone()));
            Ok(references.len())
        }
    }

    async fn completed_session_with_document(store: &InMemorySessionStore) -> Timestamp {
        let handle = store.get_or_create(None).await;
        let mut session = handle.lock().await;
        let schema = FormSchema::new(
            "birth_certificate",
            "Birth Certificate",
            FormMetadata::new("Municipal Corporation"),
            vec![],
            vec![FieldDefinition::text("child_name", "Name?")],
        )
        .unwrap();
        session
            .bind_schema(BoundSchema::Registered(Arc::new(schema)))
            .unwrap();
        session.record_answer("Meera").unwrap();
        let rendered_at = *session.last_activity();
        session
            .add_document(DocumentReference::new(
                DocumentId::new(),
                "birth.md",
                rendered_at,
                "birth_certificate",
            ))
            .unwrap();
        *session.last_activity()
    }

    fn sweeper(
        store: Arc<InMemorySessionStore>,
        lifecycle: Arc<RecordingLifecycle>,
    ) -> SessionSweeper {
        SessionSweeper::new(
            store,
            lifecycle,
            SessionSweeperConfig::default().with_max_idle(chrono::Duration::seconds(600)),
        )
    }

    #[tokio::test]
    async fn expired_session_documents_are_handed_to_lifecycle() {
        let store = Arc::new(InMemorySessionStore::default());
        let lifecycle = Arc::new(RecordingLifecycle::default());
        let last = completed_session_with_document(&store).await;

        let report = sweeper(store.clone(), lifecycle.clone())
            .run_once_as_of(last.plus_secs(601))
            .await;

        assert_eq!(report, SweepReport { documents: 1, reclaimed: 1 });
        assert_eq!(*lifecycle.reclaimed.lock().unwrap(), vec!["birth.md".to_string()]);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn active_sessions_survive_and_lifecycle_is_not_called() {
        let store = Arc::new(InMemorySessionStore::default());
        let lifecycle = Arc::new(RecordingLifecycle::default());
        let last = completed_session_with_document(&store).await;

        let report = sweeper(store.clone(), lifecycle.clone())
            .run_once_as_of(last.plus_secs(600))
            .await;

        assert_eq!(report, SweepReport::default());
        assert!(lifecycle.reclaimed.lock().unwrap().is_empty());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let store = Arc::new(InMemorySessionStore::default());
        let lifecycle = Arc::new(RecordingLifecycle::default());
        let config = SessionSweeperConfig::default().with_interval(Duration::from_millis(10));
        let sweeper = SessionSweeper::new(store, lifecycle, config);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = sweeper.spawn(shutdown_rx);

        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown_tx.send(true).unwrap();

        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn run_stops_when_shutdown_sender_is_dropped() {
        let store = Arc::new(InMemorySessionStore::default());
        let lifecycle = Arc::new(RecordingLifecycle::default());
        let config = SessionSweeperConfig::default().with_interval(Duration::from_secs(3600));
        let sweeper = SessionSweeper::new(store, lifecycle, config);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = sweeper.spawn(shutdown_rx);
        drop(shutdown_tx);

        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[test]
    fn config_defaults_are_reasonable() {
        let config = SessionSweeperConfig::default();
        assert_eq!(config.interval, Duration::from_secs(60));
        assert_eq!(config.max_idle, chrono::Duration::seconds(1800));
    }
}
