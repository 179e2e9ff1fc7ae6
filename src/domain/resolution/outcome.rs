//! Resolution outcome - what the resolver hands back to the state machine.

use serde::Serialize;
use std::fmt;

use crate::domain::forms::BoundSchema;

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Advisory service named a registered form.
    Advisory,
    /// A catalogue keyword occurred in the utterance.
    Keyword,
    /// Advisory service described a form outside the catalogue.
    Inferred,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionSource::Advisory => "advisory",
            ResolutionSource::Keyword => "keyword",
            ResolutionSource::Inferred => "inferred",
        };
        write!(f, "{}", s)
    }
}

/// Result of resolving an utterance. Always one of the two; never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Matched {
        schema: BoundSchema,
        confidence: f32,
        source: ResolutionSource,
    },
    Unmatched {
        suggestion: String,
    },
}

impl Resolution {
    pub fn matched(schema: BoundSchema, confidence: f32, source: ResolutionSource) -> Self {
        Resolution::Matched {
            schema,
            confidence,
            source,
        }
    }

    pub fn unmatched(suggestion: impl Into<String>) -> Self {
        Resolution::Unmatched {
            suggestion: suggestion.into(),
        }
    }

    /// Id of the matched schema, if any.
    pub fn schema_id(&self) -> Option<&str> {
        match self {
            Resolution::Matched { schema, .. } => Some(schema.id()),
            Resolution::Unmatched { .. } => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Resolution::Matched { .. })
    }
}
