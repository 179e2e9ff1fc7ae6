//! Session aggregate entity.
//!
//! A session is one user's attempt at one form: the bound schema, the
//! field cursor, the answers gathered so far, and the conversation that
//! produced them.
//!
//! # Ownership
//!
//! Sessions are owned by the session store. Mutations check every
//! precondition before touching any field, so a failed call leaves the
//! session exactly as it was.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::forms::{BoundSchema, FieldDefinition};
use crate::domain::foundation::{SessionId, StateMachine, Timestamp};

use super::{
    ConversationLog, ConversationTurn, DocumentReference, SessionError, SessionState,
};

/// One collected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub field: String,
    pub value: String,
}

/// Session aggregate.
///
/// # Invariants
///
/// - `Init`: no schema bound, cursor 0, no answers
/// - `Collecting`: schema bound, `cursor < field_count`
/// - `Complete`: schema bound, `cursor == field_count`
/// - `answers.len() == cursor`, in field order
/// - the cursor never decreases
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    created_at: Timestamp,
    last_activity: Timestamp,
    state: SessionState,
    schema: Option<BoundSchema>,
    cursor: usize,
    answers: Vec<Answer>,
    log: ConversationLog,
    documents: Vec<DocumentReference>,
}

impl Session {
    /// Creates a fresh session in `Init`.
    pub fn new(id: SessionId, max_log_turns: usize) -> Self {
        Self::new_at(id, Timestamp::now(), max_log_turns)
    }

    /// Creates a fresh session with an explicit creation time.
    pub fn new_at(id: SessionId, now: Timestamp, max_log_turns: usize) -> Self {
        Self {
            id,
            created_at: now,
            last_activity: now,
            state: SessionState::Init,
            schema: None,
            cursor: 0,
            answers: Vec::new(),
            log: ConversationLog::with_capacity(max_log_turns),
            documents: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn last_activity(&self) -> &Timestamp {
        &self.last_activity
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn schema(&self) -> Option<&BoundSchema> {
        self.schema.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Answers in collection order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Looks up an answer by field name.
    pub fn answer(&self, field: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.field == field)
            .map(|a| a.value.as_str())
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn documents(&self) -> &[DocumentReference] {
        &self.documents
    }

    /// Field awaiting an answer, if collecting.
    pub fn current_field(&self) -> Option<&FieldDefinition> {
        if !self.state.is_collecting() {
            return None;
        }
        self.schema.as_ref()?.field(self.cursor)
    }

    /// `(answered, total)`; `(0, 0)` before a schema is bound.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.schema.as_ref().map_or(0, BoundSchema::field_count);
        (self.cursor, total)
    }

    /// How long the session has been idle at `now`.
    pub fn idle_for(&self, now: &Timestamp) -> Duration {
        now.duration_since(&self.last_activity)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Binds a schema and starts collection at the first field.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is in `Init`
    pub fn bind_schema(&mut self, schema: BoundSchema) -> Result<(), SessionError> {
        if self.state != SessionState::Init {
            return Err(SessionError::invalid_state("bind_schema", self.state));
        }
        let next = self.state.transition_to(SessionState::Collecting)?;
        if schema.field_count() == 0 {
            return Err(SessionError::invariant("bound schema has no fields"));
        }

        self.schema = Some(schema);
        self.cursor = 0;
        self.answers.clear();
        self.state = next;
        Ok(())
    }

    /// Stores the answer for the field at the cursor and advances it.
    ///
    /// Returns the resulting state (`Collecting` or `Complete`).
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is in `Collecting`
    /// - `NoCurrentField` if the cursor points past the schema
    pub fn record_answer(&mut self, value: impl Into<String>) -> Result<SessionState, SessionError> {
        if !self.state.is_collecting() {
            return Err(SessionError::invalid_state("record_answer", self.state));
        }
        let schema = self
            .schema
            .as_ref()
            .ok_or(SessionError::NoCurrentField { cursor: self.cursor })?;
        let field = schema
            .field(self.cursor)
            .ok_or(SessionError::NoCurrentField { cursor: self.cursor })?;
        let field_name = field.name.clone();

        let next_cursor = self.cursor + 1;
        let target = if next_cursor < schema.field_count() {
            SessionState::Collecting
        } else {
            SessionState::Complete
        };
        let next_state = self.state.transition_to(target)?;

        self.answers.push(Answer {
            field: field_name,
            value: value.into(),
        });
        self.cursor = next_cursor;
        self.state = next_state;
        Ok(next_state)
    }

    /// Appends the user message and the system reply for one transition.
    pub fn record_exchange(
        &mut self,
        user_text: impl Into<String>,
        reply: impl Into<String>,
        now: Timestamp,
    ) {
        self.log.append(ConversationTurn::user(user_text, now));
        self.log.append(ConversationTurn::system(reply, now));
        self.touch_at(now);
    }

    /// Records a rendered document.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless the session is `Complete`
    pub fn add_document(&mut self, document: DocumentReference) -> Result<(), SessionError> {
        if !self.state.is_complete() {
            return Err(SessionError::invalid_state("add_document", self.state));
        }
        self.documents.push(document);
        Ok(())
    }

    /// Updates last activity. Never moves it backwards.
    pub fn touch_at(&mut self, now: Timestamp) {
        if now.is_after(&self.last_activity) {
            self.last_activity = now;
        }
    }

    /// Checks every standing invariant.
    ///
    /// # Errors
    ///
    /// - `InvariantViolated` describing the first broken rule
    pub fn check_invariants(&self) -> Result<(), SessionError> {
        let field_count = self.schema.as_ref().map_or(0, BoundSchema::field_count);

        match (self.state, &self.schema) {
            (SessionState::Init, None) if self.cursor == 0 => {}
            (SessionState::Init, _) => {
                return Err(SessionError::invariant(
                    "INIT session has a schema or a non-zero cursor",
                ))
            }
            (SessionState::Collecting, Some(_)) if self.cursor < field_count => {}
            (SessionState::Complete, Some(_)) if self.cursor == field_count => {}
            (state, _) => {
                return Err(SessionError::invariant(format!(
                    "{} session has cursor {} of {}",
                    state, self.cursor, field_count
                )))
            }
        }

        if self.answers.len() != self.cursor {
            return Err(SessionError::invariant(format!(
                "{} answers recorded for cursor {}",
                self.answers.len(),
                self.cursor
            )));
        }
        Ok(())
    }
}
