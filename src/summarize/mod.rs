//! Transcript-to-notes extraction
//!
//! Deterministic, rule-based text processing over a finished transcript:
//! - extractive summary (top sentences by word importance, document order)
//! - key points (dense sentences not already in the summary)
//! - action items (imperative/commitment cue scan)
//!
//! All three are total over any string input: bad text degrades to empty
//! output, never to an error.

pub mod actions;
pub mod extractive;
pub mod keypoints;
pub mod sentences;

pub use actions::extract_action_items;
pub use extractive::extract_summary;
pub use keypoints::KEY_POINT_COUNT;

use sentences::{score_sentences, split_sentences};

/// The three note artifacts produced from one transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteExtraction {
    pub summary: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
}

/// Full extraction pass: summary, key points, and action items from one
/// segmentation and one scoring of the transcript, so the key point
/// exclusion set always refers to the same sentences the summary chose.
pub fn summarize_transcript(text: &str, sentence_count: usize) -> NoteExtraction {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return NoteExtraction::default();
    }

    let scores = score_sentences(&sentences);
    let summary_idx = extractive::summary_indices(&sentences, &scores, sentence_count);

    let summary = summary_idx
        .iter()
        .map(|&i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ");

    NoteExtraction {
        summary,
        key_points: keypoints::key_point_selection(&sentences, &scores, &summary_idx),
        action_items: actions::detect_in_sentences(&sentences),
    }
}
