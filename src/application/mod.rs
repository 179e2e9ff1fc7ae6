//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Inbound messages go through the `ConversationOrchestrator`; document
//! generation and session lookup are separate handlers, and the
//! `SessionSweeper` runs beside them.

pub mod handlers;

pub use handlers::{
    ConversationOrchestrator, GenerateDocumentCommand, GenerateDocumentError,
    GenerateDocumentHandler, GenerateDocumentResult, GetSessionHandler, GetSessionQuery,
    MessageResponse, SessionSweeper, SessionSweeperConfig, SweepReport, APOLOGY,
};
