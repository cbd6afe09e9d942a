//! AI Response Validation
//!
//! Turns raw model output into candidate slide values. Structural problems
//! fail fast as `TransportError::MalformedResponse`; the orchestrator then
//! switches to the rule-based parser.

mod extractor;

pub use extractor::{decode_candidates, extract_json_array};
