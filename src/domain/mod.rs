//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `forms` - Form schemas, the schema registry and the field validator
//! - `resolution` - Mapping free text to a schema (advisory + deterministic fallback)
//! - `session` - Session aggregate, bounded conversation log and the transition driver

pub mod forms;
pub mod foundation;
pub mod resolution;
pub mod session;
