//! FormResolver - maps an utterance to a schema or a clarification prompt.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::forms::SchemaRegistry;
use crate::domain::session::ConversationTurn;
use crate::ports::{AdvisoryError, AdvisoryRequest, AdvisoryService, AdvisoryVerdict};

use super::strategies::{clarification, default_strategies, ResolutionContext, ResolutionStrategy};
use super::Resolution;

/// Tunables for the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Upper bound on the advisory wait.
    pub advisory_timeout: Duration,
    /// How many recent turns to forward as context.
    pub context_turns: usize,
    /// Whether ad-hoc inferred forms may be bound.
    pub allow_inferred_forms: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            advisory_timeout: Duration::from_millis(4000),
            context_turns: 6,
            allow_inferred_forms: false,
        }
    }
}

/// Resolves free text to a form.
///
/// Consults the advisory service once (bounded by a timeout), then runs the
/// strategy chain over the result. Any advisory failure is logged and
/// treated as "no verdict", so resolution itself cannot fail.
pub struct FormResolver {
    registry: Arc<SchemaRegistry>,
    advisory: Option<Arc<dyn AdvisoryService>>,
    strategies: Vec<Box<dyn ResolutionStrategy>>,
    settings: ResolverSettings,
}

impl FormResolver {
    pub fn new(
        registry: Arc<SchemaRegistry>,
        advisory: Option<Arc<dyn AdvisoryService>>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            registry,
            advisory,
            strategies: default_strategies(settings.allow_inferred_forms),
            settings,
        }
    }

    /// Replaces the strategy chain.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolves `utterance` given the session's conversation so far.
    pub async fn resolve(&self, utterance: &str, context: &[ConversationTurn]) -> Resolution {
        let verdict = self.consult_advisory(utterance, context).await;
        let ctx = ResolutionContext::new(utterance, &self.registry, verdict.as_ref());

        for strategy in &self.strategies {
            if let Some(resolution) = strategy.attempt(&ctx) {
                debug!(
                    strategy = strategy.name(),
                    matched = resolution.schema_id().unwrap_or("none"),
                    "Resolution decided"
                );
                return resolution;
            }
        }

        Resolution::unmatched(clarification(&self.registry))
    }

    async fn consult_advisory(
        &self,
        utterance: &str,
        context: &[ConversationTurn],
    ) -> Option<AdvisoryVerdict> {
        let advisory = self.advisory.as_ref()?;

        let skip = context.len().saturating_sub(self.settings.context_turns);
        let request = AdvisoryRequest::new(utterance)
            .with_context(context[skip..].to_vec())
            .with_catalogue(self.registry.list());

        let timeout = self.settings.advisory_timeout;
        let result = match tokio::time::timeout(timeout, advisory.advise(request)).await {
            Ok(result) => result,
            Err(_) => Err(AdvisoryError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(verdict) => {
                debug!(
                    service = advisory.name(),
                    form_id = verdict.form_id.as_deref().unwrap_or("none"),
                    confidence = verdict.confidence,
                    "Advisory verdict received"
                );
                Some(verdict)
            }
            Err(e) => {
                warn!(
                    service = advisory.name(),
                    error = %e,
                    "Advisory call failed, using fallback"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::advisory::ScriptedAdvisoryService;
    use crate::domain::foundation::Timestamp;
    use crate::domain::resolution::ResolutionSource;

    fn registry() -> Arc<SchemaRegistry> {
        Arc::new(SchemaRegistry::builtin().unwrap())
    }

    fn resolver(advisory: Option<ScriptedAdvisoryService>) -> FormResolver {
        FormResolver::new(
            registry(),
            advisory.map(|a| Arc::new(a) as Arc<dyn AdvisoryService>),
            ResolverSettings {
                advisory_timeout: Duration::from_millis(50),
                ..ResolverSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn advisory_failure_falls_back_to_pan_keyword() {
        let advisory =
            ScriptedAdvisoryService::new().with_error(AdvisoryError::unavailable("down"));
        let resolver = resolver(Some(advisory));

        let resolution = resolver.resolve("I need a PAN card", &[]).await;
        assert_eq!(resolution.schema_id(), Some("pan_card_application"));
    }

    #[tokio::test]
    async fn keyword_fallback_is_deterministic() {
        let resolver = resolver(None);
        for _ in 0..5 {
            let resolution = resolver.resolve("I need a PAN card", &[]).await;
            assert_eq!(resolution.schema_id(), Some("pan_card_application"));
        }
    }

    #[tokio::test]
    async fn advisory_match_takes_precedence_over_keywords() {
        let advisory = ScriptedAdvisoryService::new()
            .with_verdict(AdvisoryVerdict::matched("voter_id_registration", 0.8));
        let resolver = resolver(Some(advisory));

        match resolver.resolve("I need a PAN card", &[]).await {
            Resolution::Matched {
                schema,
                confidence,
                source,
            } => {
                assert_eq!(schema.id(), "voter_id_registration");
                assert_eq!(confidence, 0.8);
                assert_eq!(source, ResolutionSource::Advisory);
            }
            other => panic!("expected match, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_advisory_id_falls_back() {
        let advisory = ScriptedAdvisoryService::new()
            .with_verdict(AdvisoryVerdict::matched("moon_visa", 0.99));
        let resolver = resolver(Some(advisory));

        let resolution = resolver.resolve("passport please", &[]).await;
        assert_eq!(resolution.schema_id(), Some("passport_application"));
    }

    #[tokio::test]
    async fn slow_advisory_times_out_and_falls_back() {
        let advisory = ScriptedAdvisoryService::new()
            .with_verdict(AdvisoryVerdict::matched("voter_id_registration", 0.9))
            .with_delay(Duration::from_millis(500));
        let resolver = resolver(Some(advisory));

        let resolution = resolver.resolve("I need a PAN card", &[]).await;
        assert_eq!(resolution.schema_id(), Some("pan_card_application"));
    }

    #[tokio::test]
    async fn generic_term_yields_suggestion() {
        let resolver = resolver(None);
        let resolution = resolver.resolve("I need some certificate", &[]).await;
        assert!(matches!(
            resolution,
            Resolution::Unmatched { ref suggestion } if suggestion.contains("certificate")
        ));
    }

    #[tokio::test]
    async fn inflected_requests_resolve_without_advisory() {
        let advisory =
            ScriptedAdvisoryService::new().with_error(AdvisoryError::unavailable("down"));
        let resolver = resolver(Some(advisory));

        let resolution = resolver.resolve("I need to renew my passports", &[]).await;
        assert_eq!(resolution.schema_id(), Some("passport_application"));

        for utterance in ["I have some forms to fill", "need help with licenses"] {
            let resolution = resolver.resolve(utterance, &[]).await;
            assert!(
                matches!(
                    resolution,
                    Resolution::Unmatched { ref suggestion } if suggestion.contains("name the specific form")
                ),
                "expected a name-the-form suggestion for {:?}",
                utterance
            );
        }
    }

    #[tokio::test]
    async fn unrelated_text_yields_clarification() {
        let resolver = resolver(None);
        let resolution = resolver.resolve("good morning", &[]).await;
        assert!(matches!(
            resolution,
            Resolution::Unmatched { ref suggestion } if suggestion.contains("I need a PAN card")
        ));
    }

    #[tokio::test]
    async fn context_is_truncated_to_recent_turns() {
        let advisory = ScriptedAdvisoryService::new();
        let recorder = advisory.clone();
        let resolver = FormResolver::new(
            registry(),
            Some(Arc::new(advisory)),
            ResolverSettings {
                context_turns: 2,
                ..ResolverSettings::default()
            },
        );
        let context: Vec<_> = (0..5)
            .map(|n| ConversationTurn::user(format!("turn {}", n), Timestamp::from_unix_secs(n)))
            .collect();

        resolver.resolve("hello", &context).await;

        let calls = recorder.calls();
        assert_eq!(calls.len(), 1);
        let texts: Vec<_> = calls[0].context.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["turn 3", "turn 4"]);
        assert_eq!(calls[0].catalogue.len(), 5);
    }
}
