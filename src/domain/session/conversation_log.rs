//! Conversation turns and the bounded log a session keeps of them.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::domain::foundation::Timestamp;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    System,
}

/// One immutable entry in a conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            timestamp,
        }
    }

    pub fn system(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker: Speaker::System,
            text: text.into(),
            timestamp,
        }
    }
}

/// Append-only log that keeps only the most recent `capacity` turns.
///
/// Older turns are dropped from the front; `total_recorded` still counts
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationLog {
    turns: VecDeque<ConversationTurn>,
    capacity: usize,
    total_recorded: u64,
}

impl ConversationLog {
    /// Smallest useful capacity: one user turn plus its reply.
    pub const MIN_CAPACITY: usize = 2;

    /// Creates an empty log. Capacities below `MIN_CAPACITY` are raised to it.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(Self::MIN_CAPACITY);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
            total_recorded: 0,
        }
    }

    /// Appends a turn, evicting the oldest one when full.
    pub fn append(&mut self, turn: ConversationTurn) {
        if self.turns.len() == self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
        self.total_recorded += 1;
    }

    /// Retained turns, oldest first.
    pub fn turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter()
    }

    /// The last `n` retained turns, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ConversationTurn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip).cloned().collect()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.back()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Every turn ever appended, including evicted ones.
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }
}
