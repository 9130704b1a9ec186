//! Keyword Scorer (spec §4.4): baseline score from textual evidence.

use sensor_core::config::ScoringWeights;
use sensor_lexicon::{count_all_matches, CompiledPhrase, Lexicon};

/// Per-conversation keyword-scoring result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordScore {
    pub user_word_count: usize,
    pub intent_hits: usize,
    pub completion_hits: usize,
    pub keyword_score: f64,
}

/// Scores one conversation's textual evidence.
///
/// `user_text` is the conversation's user-only text (intent hits and word
/// count are counted there); `full_text` is the whole conversation
/// (completion hits are counted anywhere per spec §4.4).
pub fn score_keywords(
    lexicon: &Lexicon,
    user_text: &str,
    full_text: &str,
    weights: &ScoringWeights,
) -> KeywordScore {
    let user_word_count = count_non_stopword_tokens(lexicon, user_text);
    let intent_hits = count_all_matches(user_text, lexicon.compiled_intent_phrases());
    let completion_hits = count_all_matches(full_text, lexicon.compiled_completion_phrases());

    let keyword_score = user_word_count as f64 + weights.intent_hit_weight * intent_hits as f64
        - weights.completion_hit_weight * completion_hits as f64;

    KeywordScore {
        user_word_count,
        intent_hits,
        completion_hits,
        keyword_score,
    }
}

fn count_non_stopword_tokens(lexicon: &Lexicon, user_text: &str) -> usize {
    sensor_lexicon::tokenize(user_text)
        .into_iter()
        .filter(|tok| !lexicon.is_stopword(tok))
        .count()
}

/// The evidence snippet anchor: a 200-character window around the
/// highest-weight intent-phrase occurrence, or — if no intent phrase
/// matched — the first 200 characters of the first user message (spec
/// §4.6).
pub fn evidence_snippet(user_text: &str, intent_phrases: &[CompiledPhrase], fallback: &str) -> String {
    const WINDOW: usize = 200;

    if let Some((start, end)) = sensor_lexicon::highest_priority_match(user_text, intent_phrases) {
        let center = (start + end) / 2;
        let half = WINDOW / 2;
        let lo = center.saturating_sub(half);
        let hi = (center + half).min(user_text.len());
        let lo = floor_char_boundary(user_text, lo);
        let hi = ceil_char_boundary(user_text, hi);
        return user_text[lo..hi].trim().to_string();
    }

    let hi = floor_char_boundary(fallback, WINDOW.min(fallback.len()));
    fallback[..hi].trim().to_string()
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
