//! Advisory Service Port - external natural-language interpretation.
//!
//! The resolver consults this port to map a free-text request onto a form
//! from the catalogue. The service is advisory only: whatever it returns is
//! checked against the registry, and any failure sends the resolver down its
//! deterministic fallback path.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct AlwaysPan;
//!
//! #[async_trait]
//! impl AdvisoryService for AlwaysPan {
//!     async fn advise(&self, _request: AdvisoryRequest) -> Result<AdvisoryVerdict, AdvisoryError> {
//!         Ok(AdvisoryVerdict::matched("pan_card_application", 0.9))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "always-pan"
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::forms::{FieldDefinition, FormSummary};
use crate::domain::session::ConversationTurn;

/// Port for the advisory service.
#[async_trait]
pub trait AdvisoryService: Send + Sync {
    /// Suggests a form for the utterance.
    ///
    /// `Ok` with `form_id: None` means "no confident match". Callers bound
    /// the wait themselves; implementations need not enforce a timeout.
    async fn advise(&self, request: AdvisoryRequest) -> Result<AdvisoryVerdict, AdvisoryError>;

    /// Short identifier used in logs.
    fn name(&self) -> &str;
}

/// What the advisory service is asked.
#[derive(Debug, Clone)]
pub struct AdvisoryRequest {
    /// The user's latest message.
    pub utterance: String,
    /// Recent turns, oldest first.
    pub context: Vec<ConversationTurn>,
    /// Forms the answer must be chosen from.
    pub catalogue: Vec<FormSummary>,
}

impl AdvisoryRequest {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            context: Vec::new(),
            catalogue: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: Vec<ConversationTurn>) -> Self {
        self.context = context;
        self
    }

    pub fn with_catalogue(mut self, catalogue: Vec<FormSummary>) -> Self {
        self.catalogue = catalogue;
        self
    }
}

/// What the advisory service answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryVerdict {
    /// Suggested catalogue id, or `None` for no confident match.
    #[serde(default)]
    pub form_id: Option<String>,

    /// Confidence in `[0, 1]`.
    #[serde(default)]
    pub confidence: f32,

    /// A form the service inferred that is not in the catalogue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred: Option<InferredForm>,
}

impl AdvisoryVerdict {
    pub fn matched(form_id: impl Into<String>, confidence: f32) -> Self {
        Self {
            form_id: Some(form_id.into()),
            confidence,
            inferred: None,
        }
    }

    pub fn no_match() -> Self {
        Self {
            form_id: None,
            confidence: 0.0,
            inferred: None,
        }
    }

    pub fn with_inferred(mut self, inferred: InferredForm) -> Self {
        self.inferred = Some(inferred);
        self
    }

    /// True if the confidence is a finite number in `[0, 1]`.
    pub fn has_valid_confidence(&self) -> bool {
        self.confidence.is_finite() && (0.0..=1.0).contains(&self.confidence)
    }
}

/// Ad-hoc form description proposed by the advisory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferredForm {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

/// Errors from the advisory service.
///
/// The resolver treats every variant the same way: as "no match".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisoryError {
    /// Service is unavailable or not configured.
    #[error("advisory service unavailable: {message}")]
    Unavailable { message: String },

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Rate limited by the provider.
    #[error("rate limited")]
    RateLimited,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Response could not be understood.
    #[error("malformed advisory response: {0}")]
    Malformed(String),

    /// Wait exceeded the configured bound.
    #[error("advisory call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl AdvisoryError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        AdvisoryError::Unavailable {
            message: message.into(),
        }
    }
}
