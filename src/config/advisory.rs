//! Advisory service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::resolution::ResolverSettings;

/// Advisory (natural-language form suggestion) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisoryConfig {
    /// API key for the OpenAI-compatible endpoint; the advisory step is
    /// skipped when absent
    pub api_key: Option<Secret<String>>,

    /// Base URL of the chat completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on one advisory call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Recent conversation turns forwarded as context
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// Whether forms inferred by the advisory service may be bound
    #[serde(default)]
    pub allow_inferred_forms: bool,
}

impl AdvisoryConfig {
    /// Check if an API key is configured
    pub fn is_enabled(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Resolver tunables derived from this section.
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            advisory_timeout: self.timeout(),
            context_turns: self.context_turns,
            allow_inferred_forms: self.allow_inferred_forms,
        }
    }

    /// Validate advisory configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_ms == 0 {
            return Err(ValidationError::InvalidAdvisoryTimeout);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidAdvisoryUrl(self.base_url.clone()));
        }
        Ok(())
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
            context_turns: default_context_turns(),
            allow_inferred_forms: false,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_ms() -> u64 {
    4000
}

fn default_context_turns() -> usize {
    6
}
