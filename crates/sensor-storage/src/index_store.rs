//! Persistence for the embedding index and the cached user vocabulary.
//!
//! A single SQLite connection behind a mutex, mirroring the teacher's
//! `StorageEngine` shape (open, migrate, expose query methods) but without
//! the reader/writer pool split — spec §5's single-threaded refresh loop
//! never contends on this connection.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::models::Embedding;

pub struct IndexStore {
    conn: Mutex<Connection>,
}

impl IndexStore {
    /// Opens (creating if needed) the index database and runs migrations.
    pub fn open(path: &Path) -> SensorResult<Self> {
        let conn = Connection::open(path).map_err(|e| SensorError::CorpusError {
            reason: format!("failed to open index store at {}: {e}", path.display()),
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// In-memory index store, for tests and `init-embeddings --dry-run`
    /// style invocations.
    pub fn open_in_memory() -> SensorResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| SensorError::CorpusError {
            reason: format!("failed to open in-memory index store: {e}"),
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> SensorResult<()> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS embeddings (
                conversation_id TEXT NOT NULL,
                model_id TEXT NOT NULL,
                vector BLOB NOT NULL,
                text_length INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (conversation_id, model_id)
            );
            CREATE TABLE IF NOT EXISTS vocabulary_cache (
                corpus_hash TEXT PRIMARY KEY,
                terms_json TEXT NOT NULL
            );",
        )
        .map_err(|e| SensorError::CorpusError {
            reason: format!("failed to run index store migrations: {e}"),
        })
    }

    /// Fetches a persisted embedding for `(conversation_id, model_id)`.
    pub fn get_embedding(
        &self,
        conversation_id: &str,
        model_id: &str,
    ) -> SensorResult<Option<Embedding>> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        conn.query_row(
            "SELECT vector, text_length, created_at FROM embeddings \
             WHERE conversation_id = ?1 AND model_id = ?2",
            params![conversation_id, model_id],
            |row| {
                let blob: Vec<u8> = row.get(0)?;
                let text_length: i64 = row.get(1)?;
                let created_at_raw: String = row.get(2)?;
                Ok((blob, text_length, created_at_raw))
            },
        )
        .optional()
        .map_err(|e| SensorError::CorpusError {
            reason: format!("failed to read embedding row: {e}"),
        })?
        .map(|(blob, text_length, created_at_raw)| {
            Ok(Embedding {
                conversation_id: conversation_id.to_string(),
                vector: blob_to_vector(&blob),
                model_id: model_id.to_string(),
                text_length: text_length as usize,
                created_at: parse_timestamp(&created_at_raw)?,
            })
        })
        .transpose()
    }

    /// Persists an embedding, replacing any existing row for the same
    /// `(conversation_id, model_id)` pair. Never partial: one statement.
    pub fn put_embedding(&self, embedding: &Embedding) -> SensorResult<()> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        conn.execute(
            "INSERT INTO embeddings (conversation_id, model_id, vector, text_length, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(conversation_id, model_id) DO UPDATE SET \
             vector = excluded.vector, text_length = excluded.text_length, created_at = excluded.created_at",
            params![
                embedding.conversation_id,
                embedding.model_id,
                vector_to_blob(&embedding.vector),
                embedding.text_length as i64,
                embedding.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| SensorError::CorpusError {
            reason: format!("failed to persist embedding: {e}"),
        })?;
        Ok(())
    }

    /// All persisted embeddings for `model_id`.
    pub fn all_embeddings(&self, model_id: &str) -> SensorResult<Vec<Embedding>> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        let mut stmt = conn
            .prepare(
                "SELECT conversation_id, vector, text_length, created_at FROM embeddings \
                 WHERE model_id = ?1",
            )
            .map_err(|e| SensorError::CorpusError {
                reason: format!("failed to prepare embedding scan: {e}"),
            })?;

        let rows = stmt
            .query_map(params![model_id], |row| {
                let conversation_id: String = row.get(0)?;
                let blob: Vec<u8> = row.get(1)?;
                let text_length: i64 = row.get(2)?;
                let created_at_raw: String = row.get(3)?;
                Ok((conversation_id, blob, text_length, created_at_raw))
            })
            .map_err(|e| SensorError::CorpusError {
                reason: format!("failed to scan embeddings: {e}"),
            })?;

        let mut out = Vec::new();
        for row in rows {
            let (conversation_id, blob, text_length, created_at_raw) =
                row.map_err(|e| SensorError::CorpusError {
                    reason: format!("corrupt embedding row: {e}"),
                })?;
            out.push(Embedding {
                conversation_id,
                vector: blob_to_vector(&blob),
                model_id: model_id.to_string(),
                text_length: text_length as usize,
                created_at: parse_timestamp(&created_at_raw)?,
            });
        }
        Ok(out)
    }

    /// Removes every row for a stale model (spec §4.2: explicit, never
    /// automatic — the caller decides when a model change warrants this).
    pub fn drop_by_model(&self, model_id: &str) -> SensorResult<usize> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        conn.execute("DELETE FROM embeddings WHERE model_id = ?1", params![model_id])
            .map_err(|e| SensorError::CorpusError {
                reason: format!("failed to drop embeddings for model {model_id}: {e}"),
            })
    }

    /// Count of distinct conversation ids with an embedding under `model_id`.
    pub fn count_embedded(&self, model_id: &str) -> SensorResult<usize> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        conn.query_row(
            "SELECT COUNT(*) FROM embeddings WHERE model_id = ?1",
            params![model_id],
            |row| row.get::<_, i64>(0),
        )
        .map(|n| n as usize)
        .map_err(|e| SensorError::CorpusError {
            reason: format!("failed to count embeddings: {e}"),
        })
    }

    /// Cached user vocabulary for a given corpus snapshot hash, if present.
    pub fn get_cached_vocabulary(&self, corpus_hash: &str) -> SensorResult<Option<Vec<String>>> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        let terms_json: Option<String> = conn
            .query_row(
                "SELECT terms_json FROM vocabulary_cache WHERE corpus_hash = ?1",
                params![corpus_hash],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| SensorError::CorpusError {
                reason: format!("failed to read vocabulary cache: {e}"),
            })?;

        terms_json
            .map(|json| {
                serde_json::from_str(&json).map_err(|e| SensorError::CorpusError {
                    reason: format!("corrupt vocabulary cache entry: {e}"),
                })
            })
            .transpose()
    }

    /// Caches the computed vocabulary under `corpus_hash` (spec §4.3:
    /// "computed once, cached").
    pub fn put_cached_vocabulary(&self, corpus_hash: &str, terms: &[String]) -> SensorResult<()> {
        let conn = self.conn.lock().expect("index store mutex poisoned");
        let terms_json = serde_json::to_string(terms).map_err(|e| SensorError::CorpusError {
            reason: format!("failed to serialize vocabulary: {e}"),
        })?;
        conn.execute(
            "INSERT INTO vocabulary_cache (corpus_hash, terms_json) VALUES (?1, ?2) \
             ON CONFLICT(corpus_hash) DO UPDATE SET terms_json = excluded.terms_json",
            params![corpus_hash, terms_json],
        )
        .map_err(|e| SensorError::CorpusError {
            reason: format!("failed to persist vocabulary cache: {e}"),
        })?;
        Ok(())
    }
}

fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

fn parse_timestamp(raw: &str) -> SensorResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| raw.parse::<i64>().map(|secs| Utc.timestamp_opt(secs, 0).unwrap()))
        .map_err(|_| SensorError::CorpusError {
            reason: format!("corrupt timestamp in index store: {raw:?}"),
        })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The BLOB encoding persisted embeddings round-trip through must
        /// preserve every component bit-for-bit (spec §4.2: vectors are
        /// deterministic given `(model_id, text)`, which only holds end to
        /// end if storage never perturbs them).
        #[test]
        fn vector_blob_round_trips(vector in proptest::collection::vec(any::<f32>(), 0..384)) {
            let blob = vector_to_blob(&vector);
            let restored = blob_to_vector(&blob);
            prop_assert_eq!(restored.len(), vector.len());
            for (a, b) in vector.iter().zip(restored.iter()) {
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }
        }
    }
}
