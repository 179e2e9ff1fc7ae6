//! Command and query handlers.

mod generate_document;
mod get_session;
mod handle_message;
mod session_sweeper;

pub use generate_document::{
    GenerateDocumentCommand, GenerateDocumentError, GenerateDocumentHandler,
    GenerateDocumentResult,
};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use handle_message::{ConversationOrchestrator, MessageResponse, APOLOGY};
pub use session_sweeper::{SessionSweeper, SessionSweeperConfig, SweepReport};
