use serde::{Deserialize, Serialize};

/// Linear fusion weights and keyword-score constants (spec §4.4, §4.5, §4.6).
///
/// Kept as plain configuration rather than literals in the scoring code so
/// the 0.6/0.4 fusion split and the 30/50 keyword weights can be tuned
/// without touching `sensor-scoring` or `sensor-detector`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight applied to the semantic score in the fused score.
    pub semantic_weight: f64,
    /// Weight applied to the keyword score in the fused score.
    pub keyword_weight: f64,
    /// Per-occurrence bonus for an intent-phrase hit in user text.
    pub intent_hit_weight: f64,
    /// Per-occurrence penalty for a completion-phrase hit anywhere in the
    /// conversation.
    pub completion_hit_weight: f64,
    /// Hard cutoff: conversations at or above this `completion_similarity`
    /// are never emitted as open loops.
    pub completion_similarity_cutoff: f64,
    /// Minimum `intent_similarity` that, combined with at least one
    /// intent-phrase hit, admits a conversation past the noise filter.
    pub noise_filter_intent_similarity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            semantic_weight: 0.6,
            keyword_weight: 0.4,
            intent_hit_weight: 30.0,
            completion_hit_weight: 50.0,
            completion_similarity_cutoff: 0.70,
            noise_filter_intent_similarity: 0.30,
        }
    }
}

/// Classification bands over `intent_similarity` (spec §4.6).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationThresholds {
    pub strong: f64,
    pub medium: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            strong: 0.50,
            medium: 0.30,
        }
    }
}
