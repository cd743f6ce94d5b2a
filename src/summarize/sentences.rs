//! Sentence segmentation and frequency-based scoring shared by the
//! summary, key point, and action item extractors.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Sentences with fewer word tokens than this are discarded as noise
/// (fragments, lone fillers).
const MIN_SENTENCE_TOKENS: usize = 3;

/// Common English stop words, excluded from the frequency table.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    "i me my myself we our ours ourselves you your yours yourself yourselves \
     he him his himself she her hers herself it its itself they them their \
     theirs themselves what which who whom this that these those am is are was \
     were be been being have has had having do does did doing a an the and but \
     if or because as until while of at by for with about against between through \
     during before after above below to from up down in out on off over under \
     again further then once here there when where why how all both each few more \
     most other some such no nor not only own same so than too very s t can will \
     just don should now d ll m o re ve y ain aren couldn didn doesn hadn hasn \
     haven isn ma mightn mustn needn shan shouldn wasn weren won wouldn \
     also would could may might shall well really actually going got let \
     like thing things know think go get make right um uh yeah okay"
        .split_whitespace()
        .collect()
});

/// Split text into sentences on terminal punctuation (`.` `!` `?`) followed
/// by whitespace, preserving document order. Short fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.trim().chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let at_break = chars.peek().map_or(true, |next| next.is_whitespace());
            if at_break {
                push_sentence(&mut sentences, &current);
                current.clear();
            }
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && word_tokens(trimmed).len() >= MIN_SENTENCE_TOKENS {
        sentences.push(trimmed.to_string());
    }
}

/// Lowercased alphabetic word tokens of a sentence. "CI/CD" tokenizes as
/// "ci", "cd"; "today's" as "today", "s".
pub fn word_tokens(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Score each sentence by the sum of its words' normalized frequencies,
/// divided by the sentence's word count so density wins over raw length.
/// The opening and closing sentences get a small boost.
pub fn score_sentences(sentences: &[String]) -> Vec<f64> {
    let mut freq: HashMap<String, f64> = HashMap::new();
    for sentence in sentences {
        for token in word_tokens(sentence) {
            if token.chars().count() > 2 && !STOP_WORDS.contains(token.as_str()) {
                *freq.entry(token).or_insert(0.0) += 1.0;
            }
        }
    }

    if freq.is_empty() {
        return vec![0.0; sentences.len()];
    }

    let max_freq = freq.values().cloned().fold(0.0_f64, f64::max);
    for value in freq.values_mut() {
        *value /= max_freq;
    }

    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let tokens = word_tokens(sentence);
            if tokens.is_empty() {
                return 0.0;
            }
            let sum: f64 = tokens.iter().filter_map(|t| freq.get(t)).sum();
            let mut score = sum / tokens.len() as f64;
            if i == 0 {
                score *= 1.2;
            } else if i == sentences.len() - 1 {
                score *= 1.1;
            }
            score
        })
        .collect()
}

/// Indices of the top `count` sentences by score, skipping `exclude`.
/// Ties break toward the earlier sentence; the result is returned in
/// original document order.
pub fn select_top(scores: &[f64], count: usize, exclude: &HashSet<usize>) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scores.len()).filter(|i| !exclude.contains(i)).collect();
    // Stable sort keeps earlier positions first among equal scores.
    ranked.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(std::cmp::Ordering::Equal));

    let mut selected: Vec<usize> = ranked.into_iter().take(count).collect();
    selected.sort_unstable();
    selected
}
