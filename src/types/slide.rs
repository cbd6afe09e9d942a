//! Slide records
//!
//! `Slide` is the canonical output unit. `SlideCandidate` is the loosely-typed
//! shape both the AI path and the fallback parser produce before normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::utils::{json_string, json_string_array};

/// One presentation slide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// 1-based position within the result set
    pub id: String,
    pub title: String,
    pub core_idea: String,
    /// 1..=5 entries, unique under case-insensitive trimmed comparison
    pub arguments: Vec<String>,
}

/// Unvalidated slide data awaiting normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideCandidate {
    pub title: Option<String>,
    pub core_idea: Option<String>,
    pub arguments: Vec<String>,
}

impl SlideCandidate {
    pub fn new(
        title: impl Into<String>,
        core_idea: impl Into<String>,
        arguments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            core_idea: Some(core_idea.into()),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// Coerce an arbitrary JSON value into a candidate.
    ///
    /// Non-object values yield an empty candidate; non-string fields and
    /// non-string argument entries are dropped.
    pub fn from_value(value: &Value) -> Self {
        let core_idea = json_string(value, "coreIdea").or_else(|| json_string(value, "core_idea"));
        Self {
            title: json_string(value, "title"),
            core_idea,
            arguments: json_string_array(value, "arguments"),
        }
    }
}

impl From<Slide> for SlideCandidate {
    fn from(slide: Slide) -> Self {
        Self {
            title: Some(slide.title),
            core_idea: Some(slide.core_idea),
            arguments: slide.arguments,
        }
    }
}
