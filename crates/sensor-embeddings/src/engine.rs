//! EmbeddingIndex — the Embedding Index component (spec §4.2).
//!
//! Composes a provider, the L1 cache, and `sensor-storage`'s persisted
//! index into the `ensure`/`batch_ensure`/`get`/`all`/`drop_by_model`
//! operations. The model is fixed for the lifetime of one `EmbeddingIndex`
//! (bound at construction from `SensorConfig::model_id`); spec §4.2's
//! `(conversation_id, model_id)` key is always this index's own model, so
//! callers never pass `model_id` explicitly per call.

use chrono::Utc;
use tracing::{debug, info};

use sensor_core::constants::EMBEDDING_BATCH_SIZE;
use sensor_core::errors::SensorResult;
use sensor_core::models::Embedding;
use sensor_core::traits::EmbeddingProvider;
use sensor_storage::IndexStore;

use crate::cache::L1VectorCache;

pub struct EmbeddingIndex {
    store: IndexStore,
    provider: Box<dyn EmbeddingProvider>,
    cache: L1VectorCache,
}

impl EmbeddingIndex {
    pub fn new(store: IndexStore, provider: Box<dyn EmbeddingProvider>) -> Self {
        let cache = L1VectorCache::new(10_000);
        info!(
            model_id = provider.model_id(),
            dims = provider.dimensions(),
            "EmbeddingIndex initialized"
        );
        Self {
            store,
            provider,
            cache,
        }
    }

    pub fn model_id(&self) -> &str {
        self.provider.model_id()
    }

    fn cache_key(&self, conversation_id: &str) -> String {
        format!("{}:{}", self.provider.model_id(), conversation_id)
    }

    /// Idempotent: returns the existing embedding for `(conversation_id,
    /// model_id)` if present, otherwise computes, persists, and returns it.
    pub fn ensure(&self, conversation_id: &str, text: &str) -> SensorResult<Embedding> {
        if let Some(existing) = self.store.get_embedding(conversation_id, self.provider.model_id())? {
            self.cache.insert(self.cache_key(conversation_id), existing.vector.clone());
            return Ok(existing);
        }

        let vector = self.provider.embed(text)?;
        let embedding = Embedding {
            conversation_id: conversation_id.to_string(),
            vector,
            model_id: self.provider.model_id().to_string(),
            text_length: text.chars().count(),
            created_at: Utc::now(),
        };

        self.store.put_embedding(&embedding)?;
        self.cache.insert(self.cache_key(conversation_id), embedding.vector.clone());
        debug!(conversation_id, model_id = self.provider.model_id(), "embedding computed");
        Ok(embedding)
    }

    /// Processes `items` (conversation_id, text pairs) in batches of
    /// `EMBEDDING_BATCH_SIZE`, computing only the conversations missing an
    /// embedding and reusing the rest.
    pub fn batch_ensure(&self, items: &[(String, String)]) -> SensorResult<Vec<Embedding>> {
        let mut results = Vec::with_capacity(items.len());

        for chunk in items.chunks(EMBEDDING_BATCH_SIZE) {
            let mut to_compute: Vec<(usize, &str)> = Vec::new();
            let mut chunk_results: Vec<Option<Embedding>> = vec![None; chunk.len()];

            for (i, (conversation_id, _)) in chunk.iter().enumerate() {
                if let Some(existing) =
                    self.store.get_embedding(conversation_id, self.provider.model_id())?
                {
                    self.cache
                        .insert(self.cache_key(conversation_id), existing.vector.clone());
                    chunk_results[i] = Some(existing);
                } else {
                    to_compute.push((i, conversation_id.as_str()));
                }
            }

            if !to_compute.is_empty() {
                let texts: Vec<String> = to_compute
                    .iter()
                    .map(|(i, _)| chunk[*i].1.clone())
                    .collect();
                let vectors = self.provider.embed_batch(&texts)?;

                for ((i, conversation_id), vector) in to_compute.into_iter().zip(vectors) {
                    let embedding = Embedding {
                        conversation_id: conversation_id.to_string(),
                        vector,
                        model_id: self.provider.model_id().to_string(),
                        text_length: chunk[i].1.chars().count(),
                        created_at: Utc::now(),
                    };
                    self.store.put_embedding(&embedding)?;
                    self.cache
                        .insert(self.cache_key(conversation_id), embedding.vector.clone());
                    chunk_results[i] = Some(embedding);
                }
            }

            results.extend(chunk_results.into_iter().map(|e| e.expect("every slot filled")));
        }

        Ok(results)
    }

    /// Embeds arbitrary text (e.g. a `search` query) without persisting it
    /// under a conversation id. Unlike `ensure`, this is not memoized — a
    /// transient query has no stable identity to key a cache entry on.
    pub fn embed_query(&self, text: &str) -> SensorResult<Vec<f32>> {
        self.provider.embed(text)
    }

    /// Returns the persisted embedding, if any, without computing one.
    pub fn get(&self, conversation_id: &str) -> SensorResult<Option<Embedding>> {
        if let Some(vector) = self.cache.get(&self.cache_key(conversation_id)) {
            if let Some(mut stored) = self.store.get_embedding(conversation_id, self.provider.model_id())? {
                stored.vector = vector;
                return Ok(Some(stored));
            }
        }
        self.store.get_embedding(conversation_id, self.provider.model_id())
    }

    /// All persisted `(conversation_id, vector)` pairs for this index's model.
    pub fn all(&self) -> SensorResult<Vec<(String, Vec<f32>)>> {
        Ok(self
            .store
            .all_embeddings(self.provider.model_id())?
            .into_iter()
            .map(|e| (e.conversation_id, e.vector))
            .collect())
    }

    /// Count of conversations with a persisted embedding for this model.
    pub fn count(&self) -> SensorResult<usize> {
        self.store.count_embedded(self.provider.model_id())
    }

    /// Removes all rows for a stale model id (explicit call only — spec
    /// §4.2/§9: never triggered automatically on model change).
    pub fn drop_by_model(&self, model_id: &str) -> SensorResult<usize> {
        self.store.drop_by_model(model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_embeddings_test_support::tfidf_index;

    mod sensor_embeddings_test_support {
        use super::*;
        use crate::providers::TfIdfFallback;

        pub fn tfidf_index() -> EmbeddingIndex {
            let store = IndexStore::open_in_memory().unwrap();
            let provider = Box::new(TfIdfFallback::new("tfidf-fallback".to_string()));
            EmbeddingIndex::new(store, provider)
        }
    }

    #[test]
    fn ensure_is_idempotent() {
        let index = tfidf_index();
        let a = index.ensure("c1", "I need to finish the report").unwrap();
        let b = index.ensure("c1", "a completely different text").unwrap();
        assert_eq!(a.vector, b.vector, "second ensure should return the persisted vector, not re-embed");
    }

    #[test]
    fn ensure_produces_unit_norm_vector() {
        let index = tfidf_index();
        let embedding = index.ensure("c1", "rust systems programming").unwrap();
        let norm: f32 = embedding.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn batch_ensure_matches_sequential_ensure() {
        let index = tfidf_index();
        let items = vec![
            ("c1".to_string(), "first conversation".to_string()),
            ("c2".to_string(), "second conversation".to_string()),
        ];
        let batch = index.batch_ensure(&items).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].conversation_id, "c1");
        assert_eq!(batch[1].conversation_id, "c2");
    }

    #[test]
    fn get_returns_none_before_ensure() {
        let index = tfidf_index();
        assert!(index.get("never-seen").unwrap().is_none());
    }

    #[test]
    fn all_reflects_every_ensured_conversation() {
        let index = tfidf_index();
        index.ensure("c1", "one").unwrap();
        index.ensure("c2", "two").unwrap();
        let all = index.all().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn drop_by_model_empties_the_index() {
        let index = tfidf_index();
        index.ensure("c1", "one").unwrap();
        let removed = index.drop_by_model("tfidf-fallback").unwrap();
        assert_eq!(removed, 1);
        assert!(index.get("c1").unwrap().is_none());
    }
}
