//! Slide Pipeline
//!
//! - `rules`: fallback classification data
//! - `fallback`: rule-based parser, used when the AI path is unavailable
//! - `normalizer`: canonicalizes every slide set before it leaves the crate
//! - `orchestrator`: state machine tying AI path, fallback and normalization

mod fallback;
mod normalizer;
mod orchestrator;
mod rules;

pub use fallback::FallbackParser;
pub use normalizer::{normalize, normalize_values};
pub use orchestrator::{
    FallbackReason, ParseConfig, ParseMetadata, ParseMethod, ParseOrchestrator, ParseOutcome,
    ParseState, Quality,
};
pub use rules::{DefaultSlide, FallbackRules, LineRule, has_colon};
