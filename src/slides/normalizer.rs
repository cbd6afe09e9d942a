//! Slide normalization
//!
//! Single choke point every slide passes through before leaving the crate.
//! Output guarantees:
//!
//! - ids are the 1-based position (`"1"`, `"2"`, ...)
//! - titles and core ideas are non-empty
//! - 1..=5 arguments, unique under trimmed case-insensitive comparison,
//!   first occurrence wins
//!
//! Normalizing already-normalized slides is a no-op.

use std::collections::HashSet;

use serde_json::Value;

use crate::constants::slide;
use crate::types::{Slide, SlideCandidate};

/// Normalize candidates into final slides.
///
/// An empty input behaves like a single empty candidate, so the result is
/// never empty.
pub fn normalize(candidates: &[SlideCandidate]) -> Vec<Slide> {
    if candidates.is_empty() {
        return vec![normalize_one(1, &SlideCandidate::default())];
    }

    candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| normalize_one(index + 1, candidate))
        .collect()
}

/// Normalize raw JSON items as produced by the model
pub fn normalize_values(values: &[Value]) -> Vec<Slide> {
    let candidates: Vec<SlideCandidate> = values.iter().map(SlideCandidate::from_value).collect();
    normalize(&candidates)
}

fn normalize_one(position: usize, candidate: &SlideCandidate) -> Slide {
    let title = non_blank(candidate.title.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", slide::PLACEHOLDER_TITLE_PREFIX, position));

    let core_idea = non_blank(candidate.core_idea.as_deref())
        .unwrap_or(slide::PLACEHOLDER_CORE_IDEA)
        .to_string();

    let mut arguments = dedupe_arguments(&candidate.arguments);
    if arguments.is_empty() {
        arguments.push(slide::PLACEHOLDER_ARGUMENT.to_string());
    }

    Slide {
        id: position.to_string(),
        title,
        core_idea,
        arguments,
    }
}

/// Trim, drop blanks, cap, then dedupe keeping first-seen order.
///
/// The cap applies before deduplication, so a duplicate inside the first five
/// costs a slot.
fn dedupe_arguments(arguments: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    arguments
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .take(slide::MAX_ARGUMENTS)
        .filter(|a| seen.insert(a.to_lowercase()))
        .map(str::to_string)
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_case_insensitive_dedupe() {
        let slides = normalize(&[SlideCandidate::new(
            "T",
            "C",
            ["X: foo", "x: Foo", "Y: bar"],
        )]);
        assert_eq!(slides[0].arguments, vec!["X: foo", "Y: bar"]);
    }

    #[test]
    fn test_caps_at_five() {
        let args: Vec<String> = (1..=8).map(|i| format!("arg {}", i)).collect();
        let slides = normalize(&[SlideCandidate::new("T", "C", args)]);
        assert_eq!(slides[0].arguments.len(), 5);
        assert_eq!(slides[0].arguments[4], "arg 5");
    }

    #[test]
    fn test_placeholders_and_positional_ids() {
        let slides = normalize(&[
            SlideCandidate::new("First", "One", ["a"]),
            SlideCandidate {
                title: Some("   ".to_string()),
                core_idea: None,
                arguments: vec!["".to_string(), "  ".to_string()],
            },
        ]);

        assert_eq!(slides[0].id, "1");
        assert_eq!(slides[1].id, "2");
        assert_eq!(slides[1].title, "Slide 2");
        assert_eq!(slides[1].core_idea, slide::PLACEHOLDER_CORE_IDEA);
        assert_eq!(slides[1].arguments, vec![slide::PLACEHOLDER_ARGUMENT]);
    }

    #[test]
    fn test_empty_input_yields_one_slide() {
        let slides = normalize(&[]);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Slide 1");
    }

    #[test]
    fn test_from_model_values() {
        let values = vec![
            json!({"title": " Intro ", "coreIdea": "Why", "arguments": ["a", 3, "A "]}),
            json!("garbage"),
        ];
        let slides = normalize_values(&values);

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Intro");
        assert_eq!(slides[0].arguments, vec!["a"]);
        assert_eq!(slides[1].title, "Slide 2");
    }

    fn candidate_strategy() -> impl Strategy<Value = SlideCandidate> {
        (
            proptest::option::of("[ a-zA-Z]{0,12}"),
            proptest::option::of("[ a-zA-Z]{0,12}"),
            proptest::collection::vec("[ a-cA-C]{0,3}", 0..10),
        )
            .prop_map(|(title, core_idea, arguments)| SlideCandidate {
                title,
                core_idea,
                arguments,
            })
    }

    proptest! {
        #[test]
        fn prop_output_invariants(candidates in proptest::collection::vec(candidate_strategy(), 0..6)) {
            let slides = normalize(&candidates);
            prop_assert_eq!(slides.len(), candidates.len().max(1));

            for (index, slide) in slides.iter().enumerate() {
                prop_assert_eq!(&slide.id, &(index + 1).to_string());
                prop_assert!(!slide.title.trim().is_empty());
                prop_assert!(!slide.core_idea.trim().is_empty());
                prop_assert!((1..=slide::MAX_ARGUMENTS).contains(&slide.arguments.len()));

                let folded: HashSet<String> =
                    slide.arguments.iter().map(|a| a.trim().to_lowercase()).collect();
                prop_assert_eq!(folded.len(), slide.arguments.len());
            }
        }

        #[test]
        fn prop_idempotent(candidates in proptest::collection::vec(candidate_strategy(), 0..6)) {
            let once = normalize(&candidates);
            let again: Vec<SlideCandidate> = once.iter().cloned().map(SlideCandidate::from).collect();
            prop_assert_eq!(normalize(&again), once);
        }
    }
}
