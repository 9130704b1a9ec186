use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted dense vector for one conversation under one embedding model
/// (spec §3). Vectors are stored unit-normalized; `norm` invariants are
/// enforced at construction time, not re-checked on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub conversation_id: String,
    pub vector: Vec<f32>,
    pub model_id: String,
    pub text_length: usize,
    pub created_at: DateTime<Utc>,
}

impl Embedding {
    /// L2 norm of the stored vector.
    pub fn norm(&self) -> f64 {
        self.vector
            .iter()
            .map(|x| (*x as f64) * (*x as f64))
            .sum::<f64>()
            .sqrt()
    }

    /// Cosine similarity against another embedding's vector. Both vectors
    /// are expected to already be unit-normalized, so this reduces to a dot
    /// product; we still guard against a degenerate zero vector.
    pub fn cosine_similarity(&self, other: &[f32]) -> f64 {
        cosine_similarity(&self.vector, other)
    }
}

/// Cosine similarity between two equal-length vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "vectors must share dimensionality");
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// L2-normalizes `vector` in place. No-op on a (near-)zero vector.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f64 = vector.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm <= f64::EPSILON {
        return;
    }
    for x in vector.iter_mut() {
        *x = (*x as f64 / norm) as f32;
    }
}
