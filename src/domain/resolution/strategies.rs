//! Resolution strategies, tried in order until one produces an outcome.
//!
//! The default chain is:
//!
//! 1. [`AdvisoryRegisteredStrategy`] - advisory verdict names a registered form
//! 2. [`KeywordStrategy`] - a catalogue keyword occurs in the utterance
//! 3. [`InferredFormStrategy`] - advisory verdict describes an ad-hoc form (opt-in)
//! 4. [`GenericTermStrategy`] - a generic form word occurs; ask for a specific form
//! 5. [`ClarifyStrategy`] - always answers with a clarification prompt

use std::sync::Arc;

use tracing::debug;

use crate::domain::forms::{BoundSchema, FormMetadata, FormSchema, SchemaRegistry};
use crate::ports::AdvisoryVerdict;

use super::matching::{contains_phrase, normalize};
use super::{Resolution, ResolutionSource};

/// Confidence reported for a deterministic keyword hit.
pub const KEYWORD_CONFIDENCE: f32 = 0.6;

/// Words that suggest the user wants *some* form without naming one.
pub const GENERIC_FORM_TERMS: [&str; 7] = [
    "license",
    "registration",
    "certificate",
    "card",
    "permit",
    "application",
    "form",
];

const ADHOC_AUTHORITY: &str = "Unspecified authority";

/// Everything a strategy may look at for one utterance.
pub struct ResolutionContext<'a> {
    pub utterance: &'a str,
    /// Output of [`normalize`] for `utterance`.
    pub normalized: String,
    pub registry: &'a SchemaRegistry,
    /// Advisory verdict, if the service answered in time.
    pub verdict: Option<&'a AdvisoryVerdict>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(
        utterance: &'a str,
        registry: &'a SchemaRegistry,
        verdict: Option<&'a AdvisoryVerdict>,
    ) -> Self {
        Self {
            utterance,
            normalized: normalize(utterance),
            registry,
            verdict,
        }
    }
}

/// One step in the resolution chain.
///
/// `None` passes the utterance on to the next strategy.
pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, ctx: &ResolutionContext<'_>) -> Option<Resolution>;
}

/// Accepts the advisory verdict when it names a registered form.
pub struct AdvisoryRegisteredStrategy;

impl ResolutionStrategy for AdvisoryRegisteredStrategy {
    fn name(&self) -> &'static str {
        "advisory_registered"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>) -> Option<Resolution> {
        let verdict = ctx.verdict?;
        let form_id = verdict.form_id.as_deref()?;

        if !verdict.has_valid_confidence() {
            debug!(
                form_id,
                confidence = verdict.confidence,
                "Ignoring advisory verdict with invalid confidence"
            );
            return None;
        }

        match ctx.registry.lookup(form_id) {
            Some(schema) => Some(Resolution::matched(
                BoundSchema::Registered(schema),
                verdict.confidence,
                ResolutionSource::Advisory,
            )),
            None => {
                debug!(form_id, "Advisory suggested a form outside the registry");
                None
            }
        }
    }
}

/// Scans the utterance for catalogue keywords; first registered schema wins.
pub struct KeywordStrategy;

impl ResolutionStrategy for KeywordStrategy {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>) -> Option<Resolution> {
        ctx.registry.iter().find_map(|schema| {
            let keyword = schema
                .keywords()
                .iter()
                .find(|k| contains_phrase(&ctx.normalized, k))?;
            debug!(form_id = schema.id(), keyword = %keyword, "Keyword match");
            Some(Resolution::matched(
                BoundSchema::Registered(Arc::clone(schema)),
                KEYWORD_CONFIDENCE,
                ResolutionSource::Keyword,
            ))
        })
    }
}

/// Binds an ad-hoc schema built from the advisory verdict's inferred form.
///
/// Disabled strategies never match.
pub struct InferredFormStrategy {
    enabled: bool,
}

impl InferredFormStrategy {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl ResolutionStrategy for InferredFormStrategy {
    fn name(&self) -> &'static str {
        "inferred_form"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>) -> Option<Resolution> {
        if !self.enabled {
            return None;
        }
        let verdict = ctx.verdict?;
        let inferred = verdict.inferred.as_ref()?;
        if !verdict.has_valid_confidence() {
            return None;
        }

        let slug = normalize(&inferred.display_name).trim().replace(' ', "_");
        if slug.is_empty() {
            return None;
        }
        let authority = inferred
            .authority
            .clone()
            .unwrap_or_else(|| ADHOC_AUTHORITY.to_string());

        let schema = match FormSchema::new(
            format!("adhoc_{}", slug),
            inferred.display_name.trim(),
            FormMetadata::new(authority),
            Vec::new(),
            inferred.fields.clone(),
        ) {
            Ok(schema) => schema,
            Err(e) => {
                debug!(error = %e, "Discarding malformed inferred form");
                return None;
            }
        };

        Some(Resolution::matched(
            BoundSchema::AdHoc(Arc::new(schema)),
            verdict.confidence,
            ResolutionSource::Inferred,
        ))
    }
}

/// Recognises a generic request ("I need a certificate") and asks which one.
pub struct GenericTermStrategy;

impl ResolutionStrategy for GenericTermStrategy {
    fn name(&self) -> &'static str {
        "generic_term"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>) -> Option<Resolution> {
        let term = GENERIC_FORM_TERMS
            .iter()
            .find(|t| contains_phrase(&ctx.normalized, t))?;
        debug!(term, "Generic form term without a specific form");

        Some(Resolution::unmatched(format!(
            "It sounds like you need a government {}, but I couldn't tell which one. \
             Please name the specific form. I can help with: {}.",
            term,
            catalogue_names(ctx.registry)
        )))
    }
}

/// Last resort; always produces a clarification prompt.
pub struct ClarifyStrategy;

impl ResolutionStrategy for ClarifyStrategy {
    fn name(&self) -> &'static str {
        "clarify"
    }

    fn attempt(&self, ctx: &ResolutionContext<'_>) -> Option<Resolution> {
        Some(Resolution::unmatched(clarification(ctx.registry)))
    }
}

/// Generic prompt asking the user which form they need.
pub fn clarification(registry: &SchemaRegistry) -> String {
    format!(
        "I can help you fill in a government form. Tell me which one you need, \
         for example \"I need a PAN card\". Available forms: {}.",
        catalogue_names(registry)
    )
}

fn catalogue_names(registry: &SchemaRegistry) -> String {
    registry
        .iter()
        .map(|s| s.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The standard chain, in order.
pub fn default_strategies(allow_inferred_forms: bool) -> Vec<Box<dyn ResolutionStrategy>> {
    vec![
        Box::new(AdvisoryRegisteredStrategy),
        Box::new(KeywordStrategy),
        Box::new(InferredFormStrategy::new(allow_inferred_forms)),
        Box::new(GenericTermStrategy),
        Box::new(ClarifyStrategy),
    ]
}
