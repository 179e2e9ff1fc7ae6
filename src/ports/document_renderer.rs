//! Document Renderer Port - turns a completed answer set into an artifact.
//!
//! The core only gates the call on the session being complete and records
//! the returned reference; page layout is entirely the adapter's business.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::forms::FormMetadata;
use crate::domain::foundation::{DocumentId, SessionId, Timestamp};
use crate::domain::session::Answer;

/// Port for rendering completed forms.
///
/// # Contract
///
/// Implementations must:
/// - Never leave a partially written artifact behind on failure
/// - Return a storage reference the file lifecycle collaborator can delete
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders one document and returns its storage reference.
    async fn render(&self, request: RenderRequest) -> Result<RenderedDocument, RenderError>;
}

/// Everything needed to render a completed form.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub document_id: DocumentId,
    pub session_id: SessionId,
    pub schema_id: String,
    pub display_name: String,
    pub metadata: FormMetadata,
    /// Field prompt and answer, in field order.
    pub entries: Vec<RenderEntry>,
    pub completed_at: Timestamp,
}

/// One line of a rendered form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEntry {
    pub label: String,
    pub answer: Answer,
}

/// What the renderer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Storage reference, handed back to the file lifecycle collaborator on expiry.
    pub filename: String,
    pub size_bytes: u64,
}

/// Errors from document rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// IO error while writing the artifact.
    #[error("IO error: {message}")]
    Io { message: String },

    /// The request could not be rendered.
    #[error("Invalid render request: {0}")]
    InvalidRequest(String),
}

impl RenderError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
