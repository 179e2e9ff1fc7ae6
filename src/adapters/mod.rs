//! Adapters - Implementations of ports for external systems.
//!
//! - `advisory` - OpenAI-compatible advisory service and a scripted double
//! - `document` - markdown renderer and local file lifecycle
//! - `storage` - in-memory session store
//! - `http` - axum REST API

pub mod advisory;
pub mod document;
pub mod http;
pub mod storage;
