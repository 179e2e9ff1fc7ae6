//! Session-specific error types.
//!
//! These are internal faults: a user's bad answer is a
//! `ValidationOutcome::Rejected`, never a `SessionError`.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};

use super::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Operation not allowed in the current state.
    #[error("operation '{operation}' not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// State machine rejected an edge.
    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] ValidationError),

    /// Collecting without a bound schema, or a schema that has no field at the cursor.
    #[error("no field at cursor {cursor}")]
    NoCurrentField { cursor: usize },

    /// A standing invariant does not hold.
    #[error("session invariant violated: {0}")]
    InvariantViolated(String),
}

impl SessionError {
    pub fn invalid_state(operation: &'static str, state: SessionState) -> Self {
        SessionError::InvalidState { operation, state }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        SessionError::InvariantViolated(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::InvalidState { .. } | SessionError::InvalidTransition(_) => {
                ErrorCode::InvalidStateTransition
            }
            SessionError::NoCurrentField { .. } | SessionError::InvariantViolated(_) => {
                ErrorCode::InvariantViolated
            }
        }
    }
}
