//! SessionMachine - drives one session through exactly one transition.
//!
//! | State        | Input                 | Effect                              |
//! |--------------|-----------------------|-------------------------------------|
//! | `Init`       | resolver matches      | bind schema, ask first field        |
//! | `Init`       | resolver has no match | clarification, stay in `Init`       |
//! | `Collecting` | answer accepted       | store value, advance cursor         |
//! | `Collecting` | answer rejected       | reason + same question again        |
//! | `Complete`   | anything              | informational reply, no change      |
//!
//! Each step works on a copy of the session and commits it only after the
//! invariants have been re-checked, so a fault leaves the session untouched.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::forms::{validate, BoundSchema, ValidationOutcome};
use crate::domain::foundation::Timestamp;
use crate::domain::resolution::{FormResolver, Resolution, ResolutionSource};

use super::{Session, SessionError, SessionState};

/// What happened during a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnKind {
    /// No form recognised; still in `Init`.
    Clarified,
    /// A schema was bound.
    SchemaBound {
        schema_id: String,
        source: ResolutionSource,
        confidence: f32,
    },
    /// Answer stored; more fields remain.
    AnswerAccepted { field: String },
    /// Answer refused; cursor unchanged.
    AnswerRejected { field: String, reason: String },
    /// Last answer stored; session is now `Complete`.
    Completed,
    /// Message received after completion.
    AlreadyComplete,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub kind: TurnKind,
    /// Full system response, as logged.
    pub reply: String,
    /// State after the step.
    pub state: SessionState,
}

impl TurnOutcome {
    /// Validation reasons to surface to the user.
    pub fn errors(&self) -> Vec<String> {
        match &self.kind {
            TurnKind::AnswerRejected { reason, .. } => vec![reason.clone()],
            _ => Vec::new(),
        }
    }
}

/// Stateless driver; all per-session data lives in [`Session`].
pub struct SessionMachine {
    resolver: Arc<FormResolver>,
}

impl SessionMachine {
    pub fn new(resolver: Arc<FormResolver>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Arc<FormResolver> {
        &self.resolver
    }

    /// Applies one user message to `session`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only for internal faults; the session is then
    /// left exactly as it was.
    pub async fn step(
        &self,
        session: &mut Session,
        text: &str,
        now: Timestamp,
    ) -> Result<TurnOutcome, SessionError> {
        let mut draft = session.clone();

        let (kind, reply) = match draft.state() {
            SessionState::Init => self.discover(&mut draft, text).await?,
            SessionState::Collecting => collect(&mut draft, text)?,
            SessionState::Complete => (TurnKind::AlreadyComplete, already_complete(&draft)),
        };

        draft.record_exchange(text, reply.clone(), now);
        draft.check_invariants()?;
        if draft.cursor() < session.cursor() {
            return Err(SessionError::invariant(format!(
                "cursor regressed from {} to {}",
                session.cursor(),
                draft.cursor()
            )));
        }

        if draft.state() != session.state() {
            info!(
                session_id = %draft.id(),
                from = %session.state(),
                to = %draft.state(),
                "Session state changed"
            );
        }

        let state = draft.state();
        *session = draft;
        Ok(TurnOutcome { kind, reply, state })
    }

    async fn discover(
        &self,
        draft: &mut Session,
        text: &str,
    ) -> Result<(TurnKind, String), SessionError> {
        let context = draft.log().recent(self.resolver.settings().context_turns);

        match self.resolver.resolve(text, &context).await {
            Resolution::Matched {
                schema,
                confidence,
                source,
            } => {
                let intro = introduction(&schema);
                let kind = TurnKind::SchemaBound {
                    schema_id: schema.id().to_string(),
                    source,
                    confidence,
                };
                draft.bind_schema(schema)?;
                let question = current_question(draft)?;
                Ok((kind, format!("{}\n\n{}", intro, question)))
            }
            Resolution::Unmatched { suggestion } => {
                debug!(session_id = %draft.id(), "No form resolved");
                Ok((TurnKind::Clarified, suggestion))
            }
        }
    }
}

fn collect(draft: &mut Session, text: &str) -> Result<(TurnKind, String), SessionError> {
    let field = draft
        .current_field()
        .cloned()
        .ok_or(SessionError::NoCurrentField {
            cursor: draft.cursor(),
        })?;

    match validate(&field, text) {
        ValidationOutcome::Accepted { value } => match draft.record_answer(value)? {
            SessionState::Complete => Ok((TurnKind::Completed, completion_notice(draft))),
            _ => Ok((
                TurnKind::AnswerAccepted { field: field.name },
                format!("Got it.\n\n{}", current_question(draft)?),
            )),
        },
        ValidationOutcome::Rejected { reason } => {
            let reply = format!(
                "Sorry, that answer was not accepted: {}.\n\n{}",
                reason,
                current_question(draft)?
            );
            Ok((
                TurnKind::AnswerRejected {
                    field: field.name,
                    reason,
                },
                reply,
            ))
        }
    }
}

/// Question for the field at the cursor, prefixed with its position.
pub fn current_question(session: &Session) -> Result<String, SessionError> {
    let field = session
        .current_field()
        .ok_or(SessionError::NoCurrentField {
            cursor: session.cursor(),
        })?;
    let (answered, total) = session.progress();
    Ok(format!("({}/{}) {}", answered + 1, total, field.question()))
}

fn introduction(schema: &BoundSchema) -> String {
    let meta = schema.schema().metadata();
    let mut intro = format!(
        "Let's fill in your {}. Issuing authority: {}.",
        schema.display_name(),
        meta.authority
    );
    if let Some(fee) = &meta.fee {
        intro.push_str(&format!(" Fee: {}.", fee));
    }
    if let Some(time) = &meta.processing_time {
        intro.push_str(&format!(" Processing time: {}.", time));
    }
    intro.push_str(&format!(" I'll ask {} questions.", schema.field_count()));
    intro
}

fn schema_name(session: &Session) -> &str {
    session.schema().map_or("form", BoundSchema::display_name)
}

fn completion_notice(session: &Session) -> String {
    format!(
        "Thank you! All {} answers for your {} are recorded. Your form is ready for document generation.",
        session.progress().1,
        schema_name(session)
    )
}

fn already_complete(session: &Session) -> String {
    format!(
        "Your {} is already complete, so no more answers are needed. You can generate the \
         document now, or start a new session to fill in another form.",
        schema_name(session)
    )
}
