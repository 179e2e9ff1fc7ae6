//! Read-only projections of a session for transports.

use serde::Serialize;

use crate::domain::forms::BoundSchema;
use crate::domain::foundation::{SessionId, Timestamp};

use super::{Answer, ConversationTurn, DocumentReference, Session, SessionState};

/// Answered / total field counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

/// Identity of the schema a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaRef {
    pub id: String,
    pub display_name: String,
    pub authority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    /// `false` for ad-hoc inferred schemas.
    pub registered: bool,
}

impl From<&BoundSchema> for SchemaRef {
    fn from(bound: &BoundSchema) -> Self {
        let meta = bound.schema().metadata();
        Self {
            id: bound.id().to_string(),
            display_name: bound.display_name().to_string(),
            authority: meta.authority.clone(),
            fee: meta.fee.clone(),
            registered: bound.is_registered(),
        }
    }
}

/// Full snapshot of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
    pub progress: Progress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_field: Option<String>,
    pub answers: Vec<Answer>,
    pub log: Vec<ConversationTurn>,
    /// Turns ever recorded, including those dropped from `log`.
    pub log_total: u64,
    pub documents: Vec<DocumentReference>,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let (answered, total) = session.progress();
        Self {
            session_id: *session.id(),
            state: session.state(),
            schema: session.schema().map(SchemaRef::from),
            progress: Progress { answered, total },
            current_field: session.current_field().map(|f| f.name.clone()),
            answers: session.answers().to_vec(),
            log: session.log().turns().cloned().collect(),
            log_total: session.log().total_recorded(),
            documents: session.documents().to_vec(),
            created_at: *session.created_at(),
            last_activity: *session.last_activity(),
        }
    }
}
