//! Extractive summarization: rank sentences by word importance and keep the
//! best few, in document order.

use super::sentences::{score_sentences, select_top, split_sentences};
use std::collections::HashSet;

/// Indices of the sentences chosen for a summary of `sentence_count`
/// sentences, in document order.
pub(crate) fn summary_indices(
    sentences: &[String],
    scores: &[f64],
    sentence_count: usize,
) -> Vec<usize> {
    if sentences.len() <= sentence_count {
        return (0..sentences.len()).collect();
    }
    select_top(scores, sentence_count, &HashSet::new())
}

/// Generate an extractive summary of the transcript.
///
/// Selection is by score, but the output always reads in document order.
/// An empty or whitespace-only transcript yields an empty summary; a
/// transcript with fewer sentences than requested yields all of them.
pub fn extract_summary(text: &str, sentence_count: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return String::new();
    }

    let scores = score_sentences(&sentences);
    let selected = summary_indices(&sentences, &scores, sentence_count);

    selected
        .iter()
        .map(|&i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
