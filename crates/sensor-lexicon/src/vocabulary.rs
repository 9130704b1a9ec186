//! Corpus-derived user vocabulary, computed once and cached (spec §4.3:
//! "computed once, cached"; spec §9: "never block on re-embedding", the
//! same pattern applied here to vocabulary derivation).

use std::collections::HashMap;

use sensor_core::models::Conversation;
use sensor_core::errors::SensorResult;
use sensor_storage::IndexStore;

use crate::tokenize::tokenize;

/// Content hash of the corpus snapshot, used as the vocabulary cache key.
/// Two refreshes over byte-identical corpora hash identically, so
/// `user_vocabulary` is recomputed only when the underlying text changes.
pub fn corpus_snapshot_hash(conversations: &[Conversation]) -> String {
    let mut ids: Vec<&Conversation> = conversations.iter().collect();
    ids.sort_by(|a, b| a.conversation_id.cmp(&b.conversation_id));

    let mut hasher = blake3::Hasher::new();
    for conv in ids {
        hasher.update(conv.conversation_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(conv.user_text().as_bytes());
        hasher.update(b"\0");
    }
    hasher.finalize().to_hex().to_string()
}

/// Derives the top-`top_n` non-stopword terms from the corpus's user text,
/// ranked by frequency descending then lexicographically ascending on
/// ties (deterministic ordering, matching the rest of the pipeline's
/// tie-break conventions).
pub fn derive_user_vocabulary(
    conversations: &[Conversation],
    stopwords: &std::collections::HashSet<String>,
    top_n: usize,
) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for conv in conversations {
        for token in tokenize(&conv.user_text()) {
            if stopwords.contains(&token) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut terms: Vec<(String, usize)> = counts.into_iter().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms.into_iter().take(top_n).map(|(term, _)| term).collect()
}

/// Looks up or computes and caches the user vocabulary for this corpus
/// snapshot via `sensor-storage`'s `IndexStore`.
pub fn cached_user_vocabulary(
    store: &IndexStore,
    conversations: &[Conversation],
    stopwords: &std::collections::HashSet<String>,
    top_n: usize,
) -> SensorResult<Vec<String>> {
    let hash = corpus_snapshot_hash(conversations);
    if let Some(cached) = store.get_cached_vocabulary(&hash)? {
        return Ok(cached);
    }

    let terms = derive_user_vocabulary(conversations, stopwords, top_n);
    store.put_cached_vocabulary(&hash, &terms)?;
    Ok(terms)
}
