//! `search <query>`: embed the query and return the top-20 conversations by
//! cosine similarity to it (spec §6, testable property: self-retrieval).

use sensor_core::config::SensorConfig;
use sensor_core::errors::SensorResult;
use sensor_core::models::cosine_similarity;

use crate::bootstrap::{open_corpus, open_embedding_index};

const TOP_N: usize = 20;

#[derive(Debug, Clone)]
pub struct SearchHit {
    pub conversation_id: String,
    pub title: String,
    pub similarity: f64,
}

pub fn run(config: &SensorConfig, query: &str) -> SensorResult<Vec<SearchHit>> {
    let corpus = open_corpus(config)?;
    let conversations = corpus.list_conversations()?;
    let titles: std::collections::HashMap<String, String> = conversations
        .into_iter()
        .map(|c| (c.conversation_id, c.title))
        .collect();

    let index = open_embedding_index(config)?;
    let query_vector = index.embed_query(query)?;

    let mut hits: Vec<SearchHit> = index
        .all()?
        .into_iter()
        .map(|(id, vector)| {
            let similarity = cosine_similarity(&vector, &query_vector);
            let title = titles.get(&id).cloned().unwrap_or_else(|| id.clone());
            SearchHit {
                conversation_id: id,
                title,
                similarity,
            }
        })
        .collect();

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.conversation_id.cmp(&b.conversation_id))
    });
    hits.truncate(TOP_N);
    Ok(hits)
}
