//! `cluster`: run the topic clusterer on demand and emit a cluster summary
//! (spec §4.9, §6). Not part of `refresh` — an orthogonal consumer of the
//! embedding index.

use std::collections::HashMap;

use sensor_cluster::cluster_topics;
use sensor_core::config::SensorConfig;
use sensor_core::errors::SensorResult;
use sensor_core::models::Cluster;

use crate::bootstrap::{open_corpus, open_embedding_index, open_lexicon};

pub fn run(config: &SensorConfig) -> SensorResult<Vec<Cluster>> {
    let corpus = open_corpus(config)?;
    let conversations = corpus.list_conversations()?;
    let user_texts: HashMap<String, String> = conversations
        .iter()
        .map(|c| (c.conversation_id.clone(), c.user_text()))
        .collect();

    let lexicon = open_lexicon(config)?;
    let index = open_embedding_index(config)?;
    let vectors = index.all()?;

    Ok(cluster_topics(&vectors, &user_texts, &lexicon, config.cluster_k))
}
