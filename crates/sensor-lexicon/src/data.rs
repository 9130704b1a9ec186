use serde::Deserialize;

/// Raw phrase lists and stopwords as they appear on disk (spec §4.3).
#[derive(Debug, Clone, Deserialize)]
pub struct LexiconData {
    pub intent_phrases: Vec<String>,
    pub completion_phrases: Vec<String>,
    pub stopwords: Vec<String>,
}

/// The lexicon bundled with the crate. An `ARTIFACTS_DIR`-relative
/// `lexicon.toml` overrides this without a code change (spec §4.3
/// supplemental: "user-authored intent/completion vocabularies").
pub const DEFAULT_LEXICON_TOML: &str = include_str!("../lexicon/default_lexicon.toml");
