use serde::{Deserialize, Serialize};

/// A k-means cluster over the embedding index (spec §3, §4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: usize,
    pub size: usize,
    pub keywords: Vec<String>,
    pub centroid: Vec<f32>,
    pub members: Vec<String>,
}
