//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Advisory timeout must be greater than zero")]
    InvalidAdvisoryTimeout,

    #[error("Invalid advisory base URL: {0}")]
    InvalidAdvisoryUrl(String),

    #[error("Session max idle must be greater than zero")]
    InvalidMaxIdle,

    #[error("Sweep interval must be greater than zero")]
    InvalidSweepInterval,

    #[error("Conversation log must keep at least {min} turns")]
    LogTooSmall { min: usize },

    #[error("Document output directory must not be empty")]
    EmptyOutputDir,
}
