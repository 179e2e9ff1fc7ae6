//! Session lifetime configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Smallest log that still holds one full exchange.
const MIN_LOG_TURNS: usize = 2;

/// Session lifetime configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionsConfig {
    /// Idle time after which a session is swept
    #[serde(default = "default_max_idle")]
    pub max_idle_secs: u64,

    /// Time between sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Conversation log entries kept per session
    #[serde(default = "default_max_log_turns")]
    pub max_log_turns: usize,
}

impl SessionsConfig {
    pub fn max_idle(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.max_idle_secs).unwrap_or(i64::MAX))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_idle_secs == 0 {
            return Err(ValidationError::InvalidMaxIdle);
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.max_log_turns < MIN_LOG_TURNS {
            return Err(ValidationError::LogTooSmall { min: MIN_LOG_TURNS });
        }
        Ok(())
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_idle_secs: default_max_idle(),
            sweep_interval_secs: default_sweep_interval(),
            max_log_turns: default_max_log_turns(),
        }
    }
}

fn default_max_idle() -> u64 {
    1800
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_log_turns() -> usize {
    50
}
