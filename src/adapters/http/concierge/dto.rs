//! Request and response bodies for the concierge endpoints.

use serde::{Deserialize, Serialize};

use crate::application::GenerateDocumentResult;
use crate::domain::forms::FormSummary;
use crate::domain::foundation::{DocumentId, Timestamp};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    /// Omit to start a new session.
    #[serde(default)]
    pub session_id: Option<String>,
    pub text: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `GET /api/forms`.
#[derive(Debug, Clone, Serialize)]
pub struct FormListResponse {
    pub forms: Vec<FormSummary>,
    pub total: usize,
}

/// Body of `POST /api/sessions/:id/documents`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResponse {
    pub document_id: DocumentId,
    pub filename: String,
    pub schema_id: String,
    pub created_at: Timestamp,
    pub size_bytes: u64,
}

impl From<GenerateDocumentResult> for DocumentResponse {
    fn from(result: GenerateDocumentResult) -> Self {
        Self {
            document_id: result.document.id,
            filename: result.document.filename,
            schema_id: result.document.schema_id,
            created_at: result.document.created_at,
            size_bytes: result.size_bytes,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn not_found(resource: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource, id),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            code: "CONFLICT".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
