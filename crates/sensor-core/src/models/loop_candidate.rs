use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Semantic-confidence band derived from `intent_similarity` (spec §4.6),
/// independent of the fused score used for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationBand {
    Strong,
    Medium,
    Weak,
}

impl ClassificationBand {
    /// Bands `intent_similarity` against the configured thresholds.
    pub fn classify(intent_similarity: f64, strong: f64, medium: f64) -> Self {
        if intent_similarity >= strong {
            Self::Strong
        } else if intent_similarity >= medium {
            Self::Medium
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Medium => "medium",
            Self::Weak => "weak",
        }
    }
}

/// One ranked, unresolved intent surfaced by the loop detector (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopCandidate {
    pub conversation_id: String,
    pub title: String,
    pub score: f64,
    pub keyword_component: f64,
    pub semantic_component: f64,
    pub intent_similarity: f64,
    pub completion_similarity: f64,
    pub evidence_snippet: String,
    pub last_at: DateTime<Utc>,
    pub classification: ClassificationBand,
}
