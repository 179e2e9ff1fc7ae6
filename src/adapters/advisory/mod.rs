//! Advisory service adapters.
//!
//! - `OpenAiAdvisoryService` - OpenAI-compatible chat completions
//! - `ScriptedAdvisoryService` - scripted double for tests and offline runs

mod openai_advisory;
mod scripted_advisory;

pub use openai_advisory::{parse_verdict, OpenAiAdvisoryConfig, OpenAiAdvisoryService};
pub use scripted_advisory::ScriptedAdvisoryService;
