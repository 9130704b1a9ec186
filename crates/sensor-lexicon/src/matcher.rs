//! Case-insensitive, phrase-level matching over whitespace-normalized text
//! (spec §4.3: "so that 'thinking about' matches contiguously").

use regex::Regex;

/// A compiled phrase pattern paired with its original text.
pub struct CompiledPhrase {
    pub phrase: String,
    regex: Regex,
}

impl CompiledPhrase {
    /// Builds a word-boundary, whitespace-flexible, case-insensitive regex
    /// for `phrase`. Matching is phrase-level: the words must appear
    /// contiguously (only whitespace run length may vary), never
    /// token-level / out-of-order.
    pub fn new(phrase: &str) -> Self {
        let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
        let pattern = format!(r"\b{}\b", words.join(r"\s+"));
        let regex = Regex::new(&format!("(?i){pattern}")).expect("phrase pattern is always valid regex");
        Self {
            phrase: phrase.to_string(),
            regex,
        }
    }

    pub fn count_matches(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    pub fn first_match(&self, text: &str) -> Option<(usize, usize)> {
        self.regex.find(text).map(|m| (m.start(), m.end()))
    }
}

/// Total occurrence count across every phrase in `phrases`.
pub fn count_all_matches(text: &str, phrases: &[CompiledPhrase]) -> usize {
    phrases.iter().map(|p| p.count_matches(text)).sum()
}

/// The first match of the highest-priority phrase (earliest in list order)
/// that occurs anywhere in `text`. Used to pick the evidence snippet anchor
/// (spec §4.6: "the highest-weight intent phrase occurrence").
pub fn highest_priority_match(text: &str, phrases: &[CompiledPhrase]) -> Option<(usize, usize)> {
    phrases.iter().find_map(|p| p.first_match(text))
}
