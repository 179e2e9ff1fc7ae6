//! HTTP adapter for the conversation engine.
//!
//! # Endpoints
//!
//! - `POST /api/messages` - Apply one user message to a session
//! - `GET /api/forms` - List the form catalogue
//! - `GET /api/forms/{id}` - Full schema of one form
//! - `GET /api/sessions/{id}` - Read-only session view
//! - `POST /api/sessions/{id}/documents` - Render a completed session

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ConciergeAppState;
pub use routes::concierge_router;
