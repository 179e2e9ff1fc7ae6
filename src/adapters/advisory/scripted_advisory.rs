//! Scripted advisory service for tests and offline runs.
//!
//! # Features
//!
//! - Pre-configured verdicts, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for fallback testing
//! - Call tracking for verification
//!
//! When the script runs out, every further call answers "no match".
//!
//! ```ignore
//! let advisory = ScriptedAdvisoryService::new()
//!     .with_verdict(AdvisoryVerdict::matched("passport_application", 0.9))
//!     .with_error(AdvisoryError::RateLimited);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AdvisoryError, AdvisoryRequest, AdvisoryService, AdvisoryVerdict};

/// Advisory service that replays a script.
///
/// Clones share the script and call history.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAdvisoryService {
    script: Arc<Mutex<VecDeque<Result<AdvisoryVerdict, AdvisoryError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<AdvisoryRequest>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedAdvisoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful verdict.
    pub fn with_verdict(self, verdict: AdvisoryVerdict) -> Self {
        locked(&self.script).push_back(Ok(verdict));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: AdvisoryError) -> Self {
        locked(&self.script).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Every request received so far.
    pub fn calls(&self) -> Vec<AdvisoryRequest> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl AdvisoryService for ScriptedAdvisoryService {
    async fn advise(&self, request: AdvisoryRequest) -> Result<AdvisoryVerdict, AdvisoryError> {
        locked(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = locked(&self.script).pop_front();
        next.unwrap_or_else(|| Ok(AdvisoryVerdict::no_match()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
