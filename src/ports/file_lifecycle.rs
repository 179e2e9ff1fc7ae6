//! File Lifecycle Port - reclaims artifacts of expired sessions.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::session::DocumentReference;

/// Port for deleting rendered artifacts.
#[async_trait]
pub trait FileLifecycle: Send + Sync {
    /// Deletes the artifacts behind `references`.
    ///
    /// Missing artifacts are not an error. Returns how many were removed.
    async fn reclaim(&self, references: &[DocumentReference]) -> Result<usize, LifecycleError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Failed to delete {filename}: {message}")]
    DeleteFailed { filename: String, message: String },

    #[error("Refusing to delete outside the output directory: {filename}")]
    OutsideRoot { filename: String },
}
