//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AdvisoryService` - natural-language form suggestion (consulted, never trusted)
//! - `DocumentRenderer` - turns a completed answer set into an artifact
//! - `FileLifecycle` - deletes artifacts of expired sessions
//! - `SessionStore` - keyed table of live sessions with idle expiry

mod advisory_service;
mod document_renderer;
mod file_lifecycle;
mod session_store;

pub use advisory_service::{
    AdvisoryError, AdvisoryRequest, AdvisoryService, AdvisoryVerdict, InferredForm,
};
pub use document_renderer::{
    DocumentRenderer, RenderEntry, RenderError, RenderRequest, RenderedDocument,
};
pub use file_lifecycle::{FileLifecycle, LifecycleError};
pub use session_store::{SessionHandle, SessionStore};
