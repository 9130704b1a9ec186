//! # sensor-lexicon
//!
//! The Lexicon (spec §4.3): ordered intent/completion phrase lists,
//! stopwords, phrase-level matching, and the corpus-derived user
//! vocabulary cache.

mod data;
mod matcher;
mod tokenize;
mod vocabulary;

pub use data::{LexiconData, DEFAULT_LEXICON_TOML};
pub use matcher::{count_all_matches, highest_priority_match, CompiledPhrase};
pub use tokenize::tokenize;
pub use vocabulary::{cached_user_vocabulary, corpus_snapshot_hash, derive_user_vocabulary};

use std::collections::HashSet;
use std::path::Path;

use sensor_core::constants::DEFAULT_VOCABULARY_TOP_N;
use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::models::Conversation;
use sensor_storage::IndexStore;

/// Word-level signal source for the keyword and semantic scorers (spec
/// §4.3). Loads the bundled default phrase lists, or an
/// `ARTIFACTS_DIR`-relative `lexicon.toml` override when one exists.
pub struct Lexicon {
    intent_phrases: Vec<CompiledPhrase>,
    completion_phrases: Vec<CompiledPhrase>,
    intent_phrase_text: Vec<String>,
    completion_phrase_text: Vec<String>,
    stopwords: HashSet<String>,
}

impl Lexicon {
    /// Loads the bundled default lexicon.
    pub fn load_default() -> SensorResult<Self> {
        Self::from_toml(DEFAULT_LEXICON_TOML)
    }

    /// Loads `<artifacts_dir>/lexicon.toml` if present, otherwise falls back
    /// to the bundled default (spec §4.3 supplemental).
    pub fn load(artifacts_dir: &Path) -> SensorResult<Self> {
        let override_path = artifacts_dir.join("lexicon.toml");
        if override_path.exists() {
            let text = std::fs::read_to_string(&override_path).map_err(|e| SensorError::CorpusError {
                reason: format!("failed to read {}: {e}", override_path.display()),
            })?;
            return Self::from_toml(&text);
        }
        Self::load_default()
    }

    fn from_toml(text: &str) -> SensorResult<Self> {
        let data: LexiconData = toml::from_str(text).map_err(|e| SensorError::CorpusError {
            reason: format!("failed to parse lexicon: {e}"),
        })?;

        let intent_phrases = data.intent_phrases.iter().map(|p| CompiledPhrase::new(p)).collect();
        let completion_phrases = data
            .completion_phrases
            .iter()
            .map(|p| CompiledPhrase::new(p))
            .collect();
        let stopwords = data.stopwords.iter().map(|s| s.to_lowercase()).collect();

        Ok(Self {
            intent_phrases,
            completion_phrases,
            intent_phrase_text: data.intent_phrases,
            completion_phrase_text: data.completion_phrases,
            stopwords,
        })
    }

    /// Intent-signaling phrases, in authored priority order.
    pub fn intent_phrases(&self) -> &[String] {
        &self.intent_phrase_text
    }

    /// Completion-signaling phrases, in authored priority order.
    pub fn completion_phrases(&self) -> &[String] {
        &self.completion_phrase_text
    }

    /// Compiled intent-phrase matchers (used by the scorer crates so the
    /// regex compilation happens once per refresh, not per conversation).
    pub fn compiled_intent_phrases(&self) -> &[CompiledPhrase] {
        &self.intent_phrases
    }

    /// Compiled completion-phrase matchers.
    pub fn compiled_completion_phrases(&self) -> &[CompiledPhrase] {
        &self.completion_phrases
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(&token.to_lowercase())
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    /// Top-`top_n` most frequent non-stopword user-turn tokens across the
    /// corpus, computed once and cached via `store` (spec §4.3).
    pub fn user_vocabulary(
        &self,
        store: &IndexStore,
        conversations: &[Conversation],
        top_n: usize,
    ) -> SensorResult<Vec<String>> {
        cached_user_vocabulary(store, conversations, &self.stopwords, top_n)
    }

    /// `user_vocabulary` at the spec-default top-N (500).
    pub fn user_vocabulary_default(
        &self,
        store: &IndexStore,
        conversations: &[Conversation],
    ) -> SensorResult<Vec<String>> {
        self.user_vocabulary(store, conversations, DEFAULT_VOCABULARY_TOP_N)
    }
}
