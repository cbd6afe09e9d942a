//! Rule-based fallback parser
//!
//! Deterministic, never fails. Walks the text line by line, classifies each
//! line with the first matching `LineRule`, and accumulates a draft slide that
//! is closed whenever a new title line appears.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::rules::{FallbackRules, LineRule, has_colon};
use crate::types::{Result, SlideError, SlideCandidate, char_len};

/// Compiled form of `FallbackRules`
#[derive(Debug, Clone)]
pub struct FallbackParser {
    rules: FallbackRules,
    title_keywords: Vec<String>,
    core_idea_keywords: Vec<String>,
    strip_patterns: Vec<Regex>,
}

/// Slide under construction
#[derive(Debug, Default)]
struct Draft {
    title: Option<String>,
    core_idea: Option<String>,
    arguments: Vec<String>,
}

impl Draft {
    fn is_emittable(&self) -> bool {
        self.title.is_some() || self.core_idea.is_some()
    }
}

impl FallbackParser {
    pub fn new(rules: FallbackRules) -> Result<Self> {
        let strip_patterns = rules
            .core_idea_strip_prefixes
            .iter()
            .filter(|prefix| !prefix.trim().is_empty())
            .map(|prefix| {
                let pattern = format!(r"^{}\s*[:：]\s*", regex::escape(prefix.trim()));
                RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        SlideError::Config(format!("Invalid strip prefix '{}': {}", prefix, e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title_keywords: fold_keywords(&rules.title_keywords),
            core_idea_keywords: fold_keywords(&rules.core_idea_keywords),
            strip_patterns,
            rules,
        })
    }

    pub fn rules(&self) -> &FallbackRules {
        &self.rules
    }

    /// Split free text into slide candidates. Always returns at least one.
    pub fn parse(&self, text: &str) -> Vec<SlideCandidate> {
        let mut slides = Vec::new();
        let mut draft = Draft::default();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some(rule) = self.classify(line, &draft) else {
                continue;
            };

            match rule {
                LineRule::Title => {
                    if draft.title.is_some() {
                        slides.push(self.close(std::mem::take(&mut draft)));
                    }
                    draft.title = Some(line.to_string());
                }
                LineRule::CoreIdea => {
                    let idea = self.strip_core_idea_label(line);
                    if !idea.is_empty() {
                        draft.core_idea = Some(idea.to_string());
                    }
                }
                LineRule::Argument => {
                    if draft.arguments.len() < self.rules.max_arguments {
                        draft.arguments.push(line.to_string());
                    }
                }
                LineRule::LooseTitle => {
                    draft.title = Some(line.to_string());
                }
            }
        }

        if draft.is_emittable() {
            slides.push(self.close(draft));
        }

        if slides.is_empty() {
            debug!("Fallback parser found no structure, emitting default slide");
            slides.push(self.default_slide());
        }

        debug!("Fallback parser produced {} slides", slides.len());
        slides
    }

    /// First rule in `LineRule::ORDER` that claims the line
    pub fn classify_line(&self, line: &str, has_title: bool) -> Option<LineRule> {
        let folded = line.to_lowercase();
        let len = char_len(line);

        LineRule::ORDER.into_iter().find(|rule| match rule {
            LineRule::Title => {
                (len <= self.rules.title_max_chars && !has_colon(line))
                    || contains_any(&folded, &self.title_keywords)
            }
            LineRule::CoreIdea => contains_any(&folded, &self.core_idea_keywords),
            LineRule::Argument => has_colon(line),
            LineRule::LooseTitle => {
                !has_title
                    && len > self.rules.loose_title_min_chars
                    && len <= self.rules.loose_title_max_chars
            }
        })
    }

    fn classify(&self, line: &str, draft: &Draft) -> Option<LineRule> {
        self.classify_line(line, draft.title.is_some())
    }

    /// Remove the first matching leading label and its separator
    pub fn strip_core_idea_label<'a>(&self, line: &'a str) -> &'a str {
        self.strip_patterns
            .iter()
            .find_map(|re| re.find(line))
            .map(|m| &line[m.end()..])
            .unwrap_or(line)
            .trim()
    }

    fn close(&self, draft: Draft) -> SlideCandidate {
        let arguments = if draft.arguments.is_empty() {
            vec![self.rules.default_argument.clone()]
        } else {
            draft.arguments
        };

        SlideCandidate {
            title: Some(
                draft
                    .title
                    .unwrap_or_else(|| self.rules.untitled_title.clone()),
            ),
            core_idea: Some(
                draft
                    .core_idea
                    .unwrap_or_else(|| self.rules.default_core_idea.clone()),
            ),
            arguments,
        }
    }

    fn default_slide(&self) -> SlideCandidate {
        let default = &self.rules.default_slide;
        SlideCandidate::new(
            default.title.clone(),
            default.core_idea.clone(),
            default.arguments.iter().cloned(),
        )
    }
}

fn fold_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn contains_any(folded: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| folded.contains(k.as_str()))
}
