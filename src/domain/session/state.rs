//! SessionState - lifecycle of one form-acquisition session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of a session.
///
/// `Init` is the only initial state. `Complete` is terminal for collection:
/// further messages are answered but never move the cursor again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No schema bound yet.
    #[default]
    Init,
    /// Schema bound, cursor below the field count.
    Collecting,
    /// Every field answered.
    Complete,
}

impl SessionState {
    /// True while answers are still being collected.
    pub fn is_collecting(&self) -> bool {
        matches!(self, SessionState::Collecting)
    }

    /// True once every field has been answered.
    pub fn is_complete(&self) -> bool {
        matches!(self, SessionState::Complete)
    }
}

impl StateMachine for SessionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionState::*;
        matches!(
            (self, target),
            (Init, Init)
                | (Init, Collecting)
                | (Collecting, Collecting)
                | (Collecting, Complete)
                | (Complete, Complete)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionState::*;
        match self {
            Init => vec![Init, Collecting],
            Collecting => vec![Collecting, Complete],
            Complete => vec![Complete],
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Init => "INIT",
            SessionState::Collecting => "COLLECTING",
            SessionState::Complete => "COMPLETE",
        };
        write!(f, "{}", s)
    }
}
