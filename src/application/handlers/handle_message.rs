//! ConversationOrchestrator - routes one inbound message to its session.
//!
//! One call is one state transition. The session lock is held for the
//! whole turn, advisory wait included, so turns for the same session are
//! applied in arrival order while other sessions proceed in parallel.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error};

use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::{
    Progress, Session, SessionMachine, SessionState, TurnKind, TurnOutcome,
};
use crate::ports::SessionStore;

/// Reply given when a turn fails internally.
pub const APOLOGY: &str =
    "Sorry, something went wrong on our side. Please send your last message again.";

/// Response payload for one inbound message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    /// Identifier to send with the next message.
    pub session_id: SessionId,
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_schema: Option<String>,
    /// What the user should read next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_prompt: Option<String>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    pub progress: Progress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<TurnKind>,
}

impl MessageResponse {
    fn snapshot(session: &Session, next_prompt: String) -> Self {
        let (answered, total) = session.progress();
        Self {
            session_id: *session.id(),
            state: session.state(),
            current_schema: session.schema().map(|s| s.id().to_string()),
            next_prompt: Some(next_prompt),
            completed: session.state().is_complete(),
            errors: None,
            progress: Progress { answered, total },
            turn: None,
        }
    }

    fn from_turn(session: &Session, outcome: TurnOutcome) -> Self {
        let errors = outcome.errors();
        Self {
            errors: (!errors.is_empty()).then_some(errors),
            turn: Some(outcome.kind),
            ..Self::snapshot(session, outcome.reply)
        }
    }
}

/// Entry point for the inbound message API.
pub struct ConversationOrchestrator {
    store: Arc<dyn SessionStore>,
    machine: SessionMachine,
}

impl ConversationOrchestrator {
    pub fn new(store: Arc<dyn SessionStore>, machine: SessionMachine) -> Self {
        Self { store, machine }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Applies `text` to the session named by `session_id`.
    ///
    /// An absent or unknown id starts a new session; the payload carries
    /// the id to use from then on. Never fails: internal faults are logged
    /// and answered with an apology, leaving the session as it was.
    pub async fn handle_message(&self, session_id: Option<&str>, text: &str) -> MessageResponse {
        self.handle_message_at(session_id, text, Timestamp::now()).await
    }

    /// [`handle_message`](Self::handle_message) with an explicit clock.
    pub async fn handle_message_at(
        &self,
        session_id: Option<&str>,
        text: &str,
        now: Timestamp,
    ) -> MessageResponse {
        let handle = self.store.get_or_create(session_id).await;
        let mut session = handle.lock().await;

        match self.machine.step(&mut session, text, now).await {
            Ok(outcome) => {
                debug!(
                    session_id = %session.id(),
                    state = %outcome.state,
                    "Turn handled"
                );
                MessageResponse::from_turn(&session, outcome)
            }
            Err(e) => {
                error!(
                    session_id = %session.id(),
                    error = %e,
                    code = ?e.code(),
                    "Turn failed, session left unchanged"
                );
                MessageResponse::snapshot(&session, APOLOGY.to_string())
            }
        }
    }
}
