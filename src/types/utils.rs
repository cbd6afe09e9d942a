//! Small shared helpers for JSON field access and text measurement.

// =============================================================================
// JSON Extraction Helpers
// =============================================================================

/// Extract string field from JSON value by key.
#[inline]
pub fn json_string(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(String::from)
}

/// Extract string array from JSON value by key.
#[inline]
pub fn json_string_array(value: &serde_json::Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|s| s.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

// =============================================================================
// String Utilities
// =============================================================================

/// Length in characters, so CJK text is measured per glyph rather than per byte.
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `max_chars` characters of `s`, for log previews.
pub fn preview(s: &str, max_chars: usize) -> String {
    if char_len(s) <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push_str("...");
    out
}
