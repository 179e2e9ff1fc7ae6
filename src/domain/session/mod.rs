//! Session module - one user's walk through one form.
//!
//! # Components
//!
//! - `SessionState` - INIT / COLLECTING / COMPLETE lifecycle
//! - `Session` - aggregate holding schema, cursor, answers and log
//! - `ConversationLog` - bounded, append-only turn history
//! - `SessionMachine` - applies exactly one transition per message
//! - `SessionView` - read-only projection for transports

mod aggregate;
mod conversation_log;
mod document;
mod errors;
mod machine;
mod state;
mod view;

pub use aggregate::{Answer, Session};
pub use conversation_log::{ConversationLog, ConversationTurn, Speaker};
pub use document::DocumentReference;
pub use errors::SessionError;
pub use machine::{current_question, SessionMachine, TurnKind, TurnOutcome};
pub use state::SessionState;
pub use view::{Progress, SchemaRef, SessionView};
