//! GenerateDocumentHandler - Command handler for rendering a completed form.
//!
//! Only `COMPLETE` sessions may be rendered. The returned reference is
//! recorded on the session so the sweeper can reclaim it on expiry.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::foundation::{DocumentId, ErrorCode, SessionId, Timestamp};
use crate::domain::session::{DocumentReference, Session, SessionError, SessionState};
use crate::ports::{DocumentRenderer, RenderEntry, RenderError, RenderRequest, SessionStore};

/// Command to render the document for a session.
#[derive(Debug, Clone)]
pub struct GenerateDocumentCommand {
    pub session_id: SessionId,
}

/// Result of successful document generation.
#[derive(Debug, Clone)]
pub struct GenerateDocumentResult {
    pub document: DocumentReference,
    pub size_bytes: u64,
}

/// Error type for document generation.
#[derive(Debug, Error)]
pub enum GenerateDocumentError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Session {session_id} is {state}, not COMPLETE")]
    NotComplete {
        session_id: SessionId,
        state: SessionState,
    },

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl GenerateDocumentError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GenerateDocumentError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            GenerateDocumentError::NotComplete { .. } => ErrorCode::SessionNotComplete,
            GenerateDocumentError::Render(_) => ErrorCode::RenderFailed,
            GenerateDocumentError::Session(e) => e.code(),
        }
    }
}

/// Handler for rendering completed sessions.
pub struct GenerateDocumentHandler {
    store: Arc<dyn SessionStore>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl GenerateDocumentHandler {
    pub fn new(store: Arc<dyn SessionStore>, renderer: Arc<dyn DocumentRenderer>) -> Self {
        Self { store, renderer }
    }

    pub async fn handle(
        &self,
        cmd: GenerateDocumentCommand,
    ) -> Result<GenerateDocumentResult, GenerateDocumentError> {
        let handle = self
            .store
            .get(&cmd.session_id)
            .await
            .ok_or(GenerateDocumentError::SessionNotFound(cmd.session_id))?;
        let mut session = handle.lock().await;

        if !session.state().is_complete() {
            return Err(GenerateDocumentError::NotComplete {
                session_id: cmd.session_id,
                state: session.state(),
            });
        }

        let now = Timestamp::now();
        let request = render_request(&session, now)?;
        let document_id = request.document_id;
        let schema_id = request.schema_id.clone();

        let rendered = self.renderer.render(request).await?;

        let document = DocumentReference::new(document_id, rendered.filename, now, schema_id);
        session.add_document(document.clone())?;
        session.touch_at(now);

        info!(
            session_id = %cmd.session_id,
            document_id = %document.id,
            filename = %document.filename,
            "Document generated"
        );

        Ok(GenerateDocumentResult {
            document,
            size_bytes: rendered.size_bytes,
        })
    }
}

fn render_request(session: &Session, now: Timestamp) -> Result<RenderRequest, SessionError> {
    let bound = session
        .schema()
        .ok_or_else(|| SessionError::invariant("COMPLETE session has no schema"))?;
    let schema = bound.schema();

    let entries = schema
        .fields()
        .iter()
        .zip(session.answers())
        .map(|(field, answer)| RenderEntry {
            label: humanize(&field.name),
            answer: answer.clone(),
        })
        .collect();

    Ok(RenderRequest {
        document_id: DocumentId::new(),
        session_id: *session.id(),
        schema_id: schema.id().to_string(),
        display_name: schema.display_name().to_string(),
        metadata: schema.metadata().clone(),
        entries,
        completed_at: now,
    })
}

/// `date_of_birth` -> `Date of birth`
fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
