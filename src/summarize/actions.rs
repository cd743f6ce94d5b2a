//! Action item detection: pattern-based scan for imperative and commitment
//! language. Recall-oriented; never fails for well-formed text.

use super::sentences::split_sentences;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Items shorter than this after cleanup are fragments, not actions.
const MIN_ITEM_CHARS: usize = 15;

/// Cues that mark a sentence as a candidate action item.
static ACTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\baction items?\b",
        r"(?i)\bneeds? to\b",
        r"(?i)\bshould\b",
        r"(?i)\bwill\b",
        r"(?i)\bmust\b",
        r"(?i)\blet'?s\b",
        r"(?i)\bplease\b",
        r"(?i)\bto[\s-]?do\b",
        r"(?i)\bfollow[\s-]?up\b",
        r"(?i)\bdeadline\b",
        r"(?i)\bby (?:monday|tuesday|wednesday|thursday|friday|saturday|sunday|tomorrow|next week|end of)\b",
        r"(?i)\bassign(?:ed)?\b",
        r"(?i)\bschedule\b",
        r"(?i)\bmake sure\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("action pattern must compile"))
    .collect()
});

/// Scan transcript text for action items.
///
/// Each matching sentence becomes at most one item (the first matching cue
/// wins), trimmed and de-duplicated case-insensitively, in original sentence
/// order. No matches is a valid, non-error result.
pub fn extract_action_items(text: &str) -> Vec<String> {
    detect_in_sentences(&split_sentences(text))
}

pub(crate) fn detect_in_sentences(sentences: &[String]) -> Vec<String> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();

    for sentence in sentences {
        if !ACTION_PATTERNS.iter().any(|p| p.is_match(sentence)) {
            continue;
        }

        let item = sentence.trim().trim_end_matches('.').trim();
        if item.chars().count() <= MIN_ITEM_CHARS {
            continue;
        }
        if seen.insert(item.to_lowercase()) {
            items.push(item.to_string());
        }
    }

    items
}
