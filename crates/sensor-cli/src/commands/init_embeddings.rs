//! `init-embeddings`: one-shot embedding backfill (spec §6). Idempotent —
//! conversations that already have an embedding for the configured model
//! are left untouched.

use tracing::info;

use sensor_core::config::SensorConfig;
use sensor_core::errors::SensorResult;

use crate::bootstrap::{open_corpus, open_embedding_index};

pub fn run(config: &SensorConfig) -> SensorResult<usize> {
    let corpus = open_corpus(config)?;
    let conversations = corpus.list_conversations()?;
    let index = open_embedding_index(config)?;

    let before = index.count()?;
    let items: Vec<(String, String)> = conversations
        .iter()
        .map(|c| (c.conversation_id.clone(), c.embed_text()))
        .collect();
    index.batch_ensure(&items)?;
    let after = index.count()?;

    let newly_embedded = after.saturating_sub(before);
    info!(
        conversations = conversations.len(),
        newly_embedded, total_embedded = after, "embedding backfill complete"
    );
    Ok(newly_embedded)
}
