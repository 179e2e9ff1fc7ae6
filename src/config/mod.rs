//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FORM_CONCIERGE` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use form_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod advisory;
mod documents;
mod error;
mod server;
mod sessions;

pub use advisory::AdvisoryConfig;
pub use documents::{DocumentsConfig, FormsConfig};
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;
pub use sessions::SessionsConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, logging, HTTP limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Advisory service configuration (OpenAI-compatible endpoint)
    #[serde(default)]
    pub advisory: AdvisoryConfig,

    /// Session expiry and log size
    #[serde(default)]
    pub sessions: SessionsConfig,

    /// Rendered document output
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Form catalogue source
    #[serde(default)]
    pub forms: FormsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FORM_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FORM_CONCIERGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FORM_CONCIERGE__ADVISORY__API_KEY=...` -> `advisory.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FORM_CONCIERGE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first out-of-range value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.advisory.validate()?;
        self.sessions.validate()?;
        self.documents.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("FORM_CONCIERGE__SERVER__PORT");
        env::remove_var("FORM_CONCIERGE__ADVISORY__API_KEY");
        env::remove_var("FORM_CONCIERGE__ADVISORY__TIMEOUT_MS");
        env::remove_var("FORM_CONCIERGE__SESSIONS__MAX_IDLE_SECS");
        env::remove_var("FORM_CONCIERGE__FORMS__CATALOGUE_PATH");
    }

    #[test]
    fn test_empty_environment_yields_valid_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(!config.advisory.is_enabled());
        assert!(config.forms.catalogue_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_values_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("FORM_CONCIERGE__SERVER__PORT", "3000");
        env::set_var("FORM_CONCIERGE__ADVISORY__API_KEY", "sk-test");
        env::set_var("FORM_CONCIERGE__ADVISORY__TIMEOUT_MS", "1500");
        env::set_var("FORM_CONCIERGE__SESSIONS__MAX_IDLE_SECS", "120");
        env::set_var("FORM_CONCIERGE__FORMS__CATALOGUE_PATH", "/etc/forms.yaml");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.advisory.is_enabled());
        assert_eq!(config.advisory.timeout_ms, 1500);
        assert_eq!(config.sessions.max_idle_secs, 120);
        assert_eq!(
            config.forms.catalogue_path.as_deref(),
            Some(std::path::Path::new("/etc/forms.yaml"))
        );
    }

    #[test]
    fn test_validate_reports_first_bad_section() {
        let mut config = AppConfig::default();
        config.sessions.max_log_turns = 0;

        assert_eq!(
            config.validate(),
            Err(ValidationError::LogTooSmall { min: 2 })
        );
    }
}
