//! Key point selection: information-dense sentences that did not already
//! make the summary, so the two lists never repeat each other.

use super::sentences::select_top;
use std::collections::HashSet;

/// Maximum number of key points per note.
pub const KEY_POINT_COUNT: usize = 5;

/// Key points shorter than this after cleanup carry no information worth
/// bulleting and are dropped.
const MIN_POINT_CHARS: usize = 15;

/// Pick up to [`KEY_POINT_COUNT`] sentences by score, excluding the indices
/// already used by the summary. Returned in document order, with trailing
/// periods trimmed for bullet rendering. May legitimately be empty when the
/// transcript is shorter than both extraction counts combined.
pub(crate) fn key_point_selection(
    sentences: &[String],
    scores: &[f64],
    summary_indices: &[usize],
) -> Vec<String> {
    let exclude: HashSet<usize> = summary_indices.iter().copied().collect();
    let selected = select_top(scores, KEY_POINT_COUNT, &exclude);

    selected
        .iter()
        .filter_map(|&i| {
            let point = sentences[i].trim_end_matches('.').trim();
            if point.chars().count() > MIN_POINT_CHARS {
                Some(point.to_string())
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::sentences::{score_sentences, split_sentences};
    use super::*;

    #[test]
    fn test_key_points_exclude_summary_sentences() {
        let text = "The quarterly report shows revenue growth across all regions. \
            Marketing expects the campaign budget to double next quarter. \
            Engineering finished the migration of the billing platform. \
            The revenue growth was driven by the billing platform migration.";
        let sentences = split_sentences(text);
        let scores = score_sentences(&sentences);

        let summary_idx = vec![0, 3];
        let points = key_point_selection(&sentences, &scores, &summary_idx);

        for point in &points {
            assert!(
                !sentences[0].starts_with(point.as_str()) && !sentences[3].starts_with(point.as_str()),
                "key point duplicates a summary sentence: {}",
                point
            );
        }
        assert!(!points.is_empty());
    }

    #[test]
    fn test_key_points_empty_when_everything_is_summarized() {
        let text = "Alpha beta gamma delta epsilon. Zeta eta theta iota kappa.";
        let sentences = split_sentences(text);
        let scores = score_sentences(&sentences);

        let summary_idx: Vec<usize> = (0..sentences.len()).collect();
        let points = key_point_selection(&sentences, &scores, &summary_idx);
        assert!(points.is_empty());
    }

    #[test]
    fn test_key_points_trim_trailing_period() {
        let text = "The deployment window opens on Saturday morning. \
            Nothing else of substance was discussed at any length today.";
        let sentences = split_sentences(text);
        let scores = score_sentences(&sentences);

        let points = key_point_selection(&sentences, &scores, &[]);
        for point in &points {
            assert!(!point.ends_with('.'), "expected trimmed bullet: {}", point);
        }
    }
}
