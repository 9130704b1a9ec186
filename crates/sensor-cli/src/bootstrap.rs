//! Wires a `SensorConfig` into the concrete backends each refresh needs:
//! the message store, the embedding index, and the lexicon.

use std::path::Path;

use sensor_core::config::SensorConfig;
use sensor_core::errors::SensorResult;
use sensor_core::traits::ConversationSource;
use sensor_embeddings::{create_provider, EmbeddingIndex};
use sensor_lexicon::Lexicon;
use sensor_storage::{IndexStore, JsonlCorpus, SqliteCorpus};

/// Opens the message corpus `config.corpus_path` points at. A `.jsonl`
/// extension selects the newline-delimited snapshot reader; anything else
/// is treated as a SQLite database (spec §6's row-store schema).
pub fn open_corpus(config: &SensorConfig) -> SensorResult<Box<dyn ConversationSource>> {
    let path = &config.corpus_path;
    if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
        Ok(Box::new(JsonlCorpus::open(path)?))
    } else {
        Ok(Box::new(SqliteCorpus::open(path)?))
    }
}

/// Opens (creating if needed) the embedding index's persistence under
/// `<artifacts_dir>/index.sqlite3` and wraps it with the provider
/// `config.model_id` selects.
pub fn open_embedding_index(config: &SensorConfig) -> SensorResult<EmbeddingIndex> {
    std::fs::create_dir_all(&config.artifacts_dir).map_err(|e| sensor_core::errors::SensorError::CorpusError {
        reason: format!(
            "failed to create artifacts directory {}: {e}",
            config.artifacts_dir.display()
        ),
    })?;
    let store = IndexStore::open(&index_db_path(&config.artifacts_dir))?;
    let provider = create_provider(
        &config.model_id,
        config.onnx_model_path.as_ref().and_then(|p| p.to_str()),
    )?;
    Ok(EmbeddingIndex::new(store, provider))
}

pub fn index_db_path(artifacts_dir: &Path) -> std::path::PathBuf {
    artifacts_dir.join("index.sqlite3")
}

/// Loads the lexicon: the bundled default, or an `ARTIFACTS_DIR`-relative
/// `lexicon.toml` override when present.
pub fn open_lexicon(config: &SensorConfig) -> SensorResult<Lexicon> {
    Lexicon::load(&config.artifacts_dir)
}
