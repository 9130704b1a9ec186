//! Shared tokenizer used by stopword filtering, vocabulary derivation, and
//! (via re-export) the topic clusterer's TF/IDF keyword summaries, so
//! cluster keywords and lexicon matching stay on the same token boundaries.

/// Splits `text` on non-alphanumeric boundaries, lowercases, and drops
/// single-character tokens (punctuation remnants, not real words).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| s.len() >= 2)
        .map(|s| s.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn drops_single_character_tokens() {
        assert_eq!(tokenize("a b cd"), vec!["cd"]);
    }
}
