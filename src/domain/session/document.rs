//! References to documents rendered from a completed session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DocumentId, Timestamp};

/// Pointer to a rendered artifact.
///
/// The session only records where the artifact lives; the file lifecycle
/// collaborator owns the artifact itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub id: DocumentId,
    /// Storage reference returned by the renderer.
    pub filename: String,
    pub created_at: Timestamp,
    /// Schema the document was rendered from.
    pub schema_id: String,
}

impl DocumentReference {
    pub fn new(
        id: DocumentId,
        filename: impl Into<String>,
        created_at: Timestamp,
        schema_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            filename: filename.into(),
            created_at,
            schema_id: schema_id.into(),
        }
    }
}
