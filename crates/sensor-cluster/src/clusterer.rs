//! Topic Clusterer (spec §4.9): k-means over the Embedding Index, with
//! per-cluster keyword summaries. An orthogonal consumer of the Embedding
//! Index — run on demand via the `cluster` CLI command, not every refresh.

use std::collections::HashMap;

use tracing::info;

use sensor_core::constants::{CLUSTER_MIN_VECTOR_MULTIPLE, MIN_CLUSTER_SIZE};
use sensor_core::models::Cluster;
use sensor_lexicon::Lexicon;

use crate::kmeans::kmeans;
use crate::keyword_summary::{top_keywords, CorpusDocumentFrequency};

/// Clusters `vectors` (conversation_id, embedding) into `k` topics.
///
/// Returns an empty list — not an error — when fewer than `2*k` vectors
/// are available (spec §4.9). Clusters with fewer than
/// [`MIN_CLUSTER_SIZE`](sensor_core::constants::MIN_CLUSTER_SIZE) members
/// after k-means converges are suppressed from the result.
pub fn cluster_topics(
    vectors: &[(String, Vec<f32>)],
    user_texts: &HashMap<String, String>,
    lexicon: &Lexicon,
    k: usize,
) -> Vec<Cluster> {
    if vectors.len() < CLUSTER_MIN_VECTOR_MULTIPLE * k {
        info!(
            available = vectors.len(),
            required = CLUSTER_MIN_VECTOR_MULTIPLE * k,
            "not enough vectors to cluster; returning empty result"
        );
        return Vec::new();
    }

    let raw_vectors: Vec<Vec<f32>> = vectors.iter().map(|(_, v)| v.clone()).collect();
    let raw_clusters = kmeans(&raw_vectors, k);

    let corpus_idf = CorpusDocumentFrequency::compute(
        user_texts.values().map(|s| s.as_str()),
        lexicon,
    );

    let mut clusters = Vec::new();
    for raw in raw_clusters {
        if raw.members.len() < MIN_CLUSTER_SIZE {
            continue;
        }

        let members: Vec<String> = raw.members.iter().map(|&i| vectors[i].0.clone()).collect();
        let member_texts: Vec<&str> = members
            .iter()
            .filter_map(|id| user_texts.get(id).map(|s| s.as_str()))
            .collect();
        let keywords = top_keywords(member_texts.into_iter(), &corpus_idf, lexicon);

        clusters.push(Cluster {
            cluster_id: clusters.len(),
            size: members.len(),
            keywords,
            centroid: raw.centroid,
            members,
        });
    }

    info!(clusters = clusters.len(), k, "topic clusterer produced clusters");
    clusters
}
