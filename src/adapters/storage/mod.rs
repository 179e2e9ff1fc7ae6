//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - process-local session table with idle expiry
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::InMemorySessionStore;
//!
//! let store = InMemorySessionStore::new(config.sessions.max_log_turns);
//! let handle = store.get_or_create(request.session_id.as_deref()).await;
//! ```

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
