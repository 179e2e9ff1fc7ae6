//! HTTP handlers for the concierge endpoints.
//!
//! Thin wrappers: parse, call the application layer, map the result.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use crate::application::{
    ConversationOrchestrator, GenerateDocumentCommand, GenerateDocumentError,
    GenerateDocumentHandler, GetSessionHandler, GetSessionQuery,
};
use crate::domain::forms::SchemaRegistry;
use crate::domain::foundation::SessionId;
use crate::ports::{DocumentRenderer, SessionStore};

use super::dto::{DocumentResponse, ErrorResponse, FormListResponse, SendMessageRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
#[derive(Clone)]
pub struct ConciergeAppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
    pub registry: Arc<SchemaRegistry>,
    pub store: Arc<dyn SessionStore>,
    pub renderer: Arc<dyn DocumentRenderer>,
}

impl ConciergeAppState {
    pub fn generate_document_handler(&self) -> GenerateDocumentHandler {
        GenerateDocumentHandler::new(self.store.clone(), self.renderer.clone())
    }

    pub fn get_session_handler(&self) -> GetSessionHandler {
        GetSessionHandler::new(self.store.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/messages - Apply one user message
pub async fn send_message(
    State(state): State<ConciergeAppState>,
    Json(request): Json<SendMessageRequest>,
) -> impl IntoResponse {
    let response = state
        .orchestrator
        .handle_message(request.session_id.as_deref(), &request.text)
        .await;
    Json(response)
}

/// GET /api/forms - List the catalogue
pub async fn list_forms(State(state): State<ConciergeAppState>) -> impl IntoResponse {
    let forms = state.registry.list();
    Json(FormListResponse {
        total: forms.len(),
        forms,
    })
}

/// GET /api/forms/:id - Full schema of one form
pub async fn get_form(
    State(state): State<ConciergeAppState>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, ConciergeApiError> {
    let schema = state
        .registry
        .lookup(&form_id)
        .ok_or_else(|| ConciergeApiError::NotFound("Form", form_id))?;
    Ok(Json(schema.as_ref().clone()))
}

/// GET /api/sessions/:id - Read-only session view
pub async fn get_session(
    State(state): State<ConciergeAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ConciergeApiError> {
    let id = parse_session_id(&session_id)?;
    let view = state
        .get_session_handler()
        .handle(GetSessionQuery { session_id: id })
        .await
        .ok_or(ConciergeApiError::NotFound("Session", session_id))?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/documents - Render a completed session
pub async fn generate_document(
    State(state): State<ConciergeAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ConciergeApiError> {
    let id = parse_session_id(&session_id)?;
    let result = state
        .generate_document_handler()
        .handle(GenerateDocumentCommand { session_id: id })
        .await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(result))))
}

fn parse_session_id(raw: &str) -> Result<SessionId, ConciergeApiError> {
    raw.parse()
        .map_err(|_| ConciergeApiError::BadRequest("Invalid session ID format".to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum ConciergeApiError {
    BadRequest(String),
    NotFound(&'static str, String),
    Conflict(String),
    Internal(String),
}

impl From<GenerateDocumentError> for ConciergeApiError {
    fn from(err: GenerateDocumentError) -> Self {
        match err {
            GenerateDocumentError::SessionNotFound(id) => {
                ConciergeApiError::NotFound("Session", id.to_string())
            }
            e @ GenerateDocumentError::NotComplete { .. } => {
                ConciergeApiError::Conflict(e.to_string())
            }
            e => {
                error!(error = %e, code = ?e.code(), "Document generation failed");
                ConciergeApiError::Internal("Document generation failed".to_string())
            }
        }
    }
}

impl IntoResponse for ConciergeApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ConciergeApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            ConciergeApiError::NotFound(resource, id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(resource, &id))
            }
            ConciergeApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::conflict(msg)),
            ConciergeApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };

        (status, Json(error)).into_response()
    }
}
