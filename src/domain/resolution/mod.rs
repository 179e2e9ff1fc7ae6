//! Resolution module - turning a free-text request into a bound schema.
//!
//! The advisory service is consulted first; deterministic strategies over the
//! registry guarantee an answer when it fails, times out or says nothing useful.

mod matching;
mod outcome;
mod resolver;
mod strategies;

pub use matching::{contains_phrase, normalize};
pub use outcome::{Resolution, ResolutionSource};
pub use resolver::{FormResolver, ResolverSettings};
pub use strategies::{
    clarification, default_strategies, AdvisoryRegisteredStrategy, ClarifyStrategy,
    GenericTermStrategy, InferredFormStrategy, KeywordStrategy, ResolutionContext,
    ResolutionStrategy, GENERIC_FORM_TERMS, KEYWORD_CONFIDENCE,
};
