//! L1 in-memory cache in front of `sensor-storage`'s persisted index.
//!
//! Within one refresh, the same conversation's vector may be read multiple
//! times (scoring, clustering, search) — this cache avoids repeated
//! deserialization of the same BLOB row.

use std::time::Duration;

use moka::sync::Cache;

pub struct L1VectorCache {
    cache: Cache<String, Vec<f32>>,
}

impl L1VectorCache {
    /// `key` convention: `"{model_id}:{conversation_id}"`.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, vector: Vec<f32>) {
        self.cache.insert(key, vector);
    }

    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
