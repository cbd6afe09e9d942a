//! Fallback classification rules
//!
//! The rule-based parser is driven by data: keyword lists, length thresholds
//! and placeholders live in `FallbackRules` (overridable under `[fallback]` in
//! the config file), and the classifier walks `LineRule::ORDER` top to bottom,
//! first match wins.
//!
//! Keyword sets carry the Chinese report vocabulary the parser was tuned on
//! plus English equivalents. Matching is case-insensitive substring search, so
//! the English title set leaves out everyday bullet words ("report", "title",
//! "topic"): a line like `Sales report: up 10%` must stay an argument instead
//! of opening a new slide. Add them under `[fallback]` if your input uses them
//! only as headings.

use serde::{Deserialize, Serialize};

use crate::constants::{fallback, slide};

/// Tunable data for the rule-based parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackRules {
    /// Lines up to this length with no colon are titles
    pub title_max_chars: usize,

    /// Any line containing one of these is a title
    pub title_keywords: Vec<String>,

    /// Any (non-title) line containing one of these is a core idea
    pub core_idea_keywords: Vec<String>,

    /// Leading labels removed from core-idea lines when followed by a colon.
    /// Ordered; only the first matching prefix is stripped.
    pub core_idea_strip_prefixes: Vec<String>,

    /// Arguments collected per slide; extra colon lines are dropped
    pub max_arguments: usize,

    /// A title-less draft adopts a plain line longer than this...
    pub loose_title_min_chars: usize,

    /// ...and no longer than this
    pub loose_title_max_chars: usize,

    /// Title for a draft that only has a core idea
    pub untitled_title: String,

    /// Core idea for a draft that only has a title
    pub default_core_idea: String,

    /// Argument for a draft with no colon lines
    pub default_argument: String,

    /// Emitted when the whole pass produces nothing
    pub default_slide: DefaultSlide,
}

/// Contents of the single slide emitted for unparseable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSlide {
    pub title: String,
    pub core_idea: String,
    pub arguments: Vec<String>,
}

impl Default for DefaultSlide {
    fn default() -> Self {
        Self {
            title: "Text parsing result".to_string(),
            core_idea: "Content extracted with rule-based parsing".to_string(),
            arguments: strings(&[
                "Item one: information extracted from the text",
                "Item two: grouped by simple rules",
                "Item three: presented as a structure",
            ]),
        }
    }
}

impl Default for FallbackRules {
    fn default() -> Self {
        Self {
            title_max_chars: fallback::TITLE_MAX_CHARS,
            title_keywords: strings(&[
                "标题",
                "主题",
                "PPT",
                "演示",
                "报告",
                "presentation",
            ]),
            core_idea_keywords: strings(&[
                "核心观点",
                "观点",
                "认为",
                "核心",
                "关键",
                "重要",
                "本质",
                "精髓",
                "总结",
                "结论",
                "core point",
                "core idea",
                "viewpoint",
                "key point",
                "essence",
                "conclusion",
                "summary",
                "takeaway",
            ]),
            core_idea_strip_prefixes: strings(&[
                "核心观点",
                "观点",
                "认为",
                "核心",
                "关键",
                "重要",
                "core point",
                "core idea",
                "viewpoint",
                "key point",
                "essence",
                "conclusion",
                "summary",
                "takeaway",
            ]),
            max_arguments: slide::MAX_ARGUMENTS,
            loose_title_min_chars: fallback::LOOSE_TITLE_MIN_CHARS,
            loose_title_max_chars: fallback::LOOSE_TITLE_MAX_CHARS,
            untitled_title: "Untitled slide".to_string(),
            default_core_idea: slide::PLACEHOLDER_CORE_IDEA.to_string(),
            default_argument: slide::PLACEHOLDER_ARGUMENT.to_string(),
            default_slide: DefaultSlide::default(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Line classes in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRule {
    /// Short colon-free line, or one naming a title keyword. Opens a new slide.
    Title,
    /// Line naming a core-idea keyword
    CoreIdea,
    /// Colon-delimited line
    Argument,
    /// Medium-length plain line adopted as title by a title-less draft
    LooseTitle,
}

impl LineRule {
    pub const ORDER: [LineRule; 4] = [
        LineRule::Title,
        LineRule::CoreIdea,
        LineRule::Argument,
        LineRule::LooseTitle,
    ];
}

/// Half-width or full-width colon
pub fn has_colon(line: &str) -> bool {
    line.contains(':') || line.contains('：')
}
