//! Response Extraction
//!
//! Pulls the embedded JSON array out of raw model output.
//!
//! Handles the usual wrappers:
//! - Markdown code fences (```json ... ```)
//! - Explanatory prose before or after the array
//!
//! No repair is attempted. When the text has no `[`...`]` pair the trimmed input
//! is handed to the decoder unchanged so the failure surfaces as
//! `MalformedResponse` instead of a guess.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::constants::preview::RESPONSE_PREVIEW_CHARS;
use crate::types::{TransportError, preview};

static RE_CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*").unwrap());

/// Strip fence markers and slice from the first `[` to the last `]`.
pub fn extract_json_array(raw: &str) -> String {
    let unfenced = RE_CODE_FENCE.replace_all(raw.trim(), "");
    let cleaned = unfenced.trim();

    match (cleaned.find('['), cleaned.rfind(']')) {
        (Some(start), Some(end)) if end > start => cleaned[start..=end].to_string(),
        _ => cleaned.to_string(),
    }
}

/// Extract and decode the candidate array.
///
/// An empty array decodes successfully; deciding what an empty result means is
/// left to the caller.
pub fn decode_candidates(raw: &str) -> Result<Vec<Value>, TransportError> {
    let extracted = extract_json_array(raw);

    let value: Value = serde_json::from_str(&extracted).map_err(|e| {
        debug!(
            "JSON decode failed: {} (preview: {})",
            e,
            preview(&extracted, RESPONSE_PREVIEW_CHARS)
        );
        TransportError::MalformedResponse(format!("invalid JSON: {}", e))
    })?;

    match value {
        Value::Array(items) => Ok(items),
        other => Err(TransportError::MalformedResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
