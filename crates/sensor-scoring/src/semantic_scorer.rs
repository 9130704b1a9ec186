//! Semantic Scorer (spec §4.5): cosine similarity to the intent/completion
//! prototype vectors.

use sensor_core::config::ScoringWeights;
use sensor_core::errors::SensorResult;
use sensor_core::models::{cosine_similarity, l2_normalize};
use sensor_core::traits::EmbeddingProvider;

/// The two prototype vectors computed once per refresh from the Lexicon
/// (spec §4.5). `Prototypes` is immutable for the lifetime of one refresh:
/// every conversation is scored against the same pair.
pub struct Prototypes {
    pub intent: Vec<f32>,
    pub completion: Vec<f32>,
}

impl Prototypes {
    /// Computes both prototypes: the unit-normalized mean embedding of each
    /// phrase set.
    pub fn compute(
        provider: &dyn EmbeddingProvider,
        intent_phrases: &[String],
        completion_phrases: &[String],
    ) -> SensorResult<Self> {
        let intent = mean_embedding(provider, intent_phrases)?;
        let completion = mean_embedding(provider, completion_phrases)?;
        Ok(Self { intent, completion })
    }
}

fn mean_embedding(provider: &dyn EmbeddingProvider, phrases: &[String]) -> SensorResult<Vec<f32>> {
    let vectors = provider.embed_batch(phrases)?;
    let dims = provider.dimensions();
    let mut mean = vec![0.0f32; dims];

    for vector in &vectors {
        for (m, v) in mean.iter_mut().zip(vector) {
            *m += *v;
        }
    }
    let count = vectors.len().max(1) as f32;
    for m in &mut mean {
        *m /= count;
    }
    l2_normalize(&mut mean);
    Ok(mean)
}

/// Per-conversation semantic-scoring result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SemanticScore {
    pub intent_similarity: f64,
    pub completion_similarity: f64,
    pub semantic_score: f64,
}

/// Scores one conversation's embedding against the prototypes. The 100x
/// scale is fixed (spec §4.5), independent of the configurable fusion
/// weights applied downstream in the loop detector.
pub fn score_semantics(vector: &[f32], prototypes: &Prototypes, _weights: &ScoringWeights) -> SemanticScore {
    let intent_similarity = cosine_similarity(vector, &prototypes.intent);
    let completion_similarity = cosine_similarity(vector, &prototypes.completion);
    let semantic_score = 100.0 * intent_similarity - 100.0 * completion_similarity;

    SemanticScore {
        intent_similarity,
        completion_similarity,
        semantic_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_core::config::ScoringWeights;

    struct StubProvider;
    impl EmbeddingProvider for StubProvider {
        fn embed(&self, text: &str) -> SensorResult<Vec<f32>> {
            // Deterministic stub: maps text to a vector whose first
            // component is 1.0 if it contains "intent", else 0.0, and
            // second component 1.0 if it contains "done".
            let a = if text.contains("intent") { 1.0 } else { 0.0 };
            let b = if text.contains("done") { 1.0 } else { 0.0 };
            let mut v = vec![a, b, 0.0, 0.0];
            l2_normalize(&mut v);
            Ok(v)
        }
        fn embed_batch(&self, texts: &[String]) -> SensorResult<Vec<Vec<f32>>> {
            texts.iter().map(|t| self.embed(t)).collect()
        }
        fn dimensions(&self) -> usize {
            4
        }
        fn model_id(&self) -> &str {
            "stub"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn intent_prototype_scores_higher_similarity_for_intent_like_vector() {
        let provider = StubProvider;
        let prototypes = Prototypes::compute(
            &provider,
            &["intent phrase".to_string()],
            &["done phrase".to_string()],
        )
        .unwrap();

        let intent_vector = provider.embed("intent marker text").unwrap();
        let score = score_semantics(&intent_vector, &prototypes, &ScoringWeights::default());
        assert!(score.intent_similarity > score.completion_similarity);
        assert!(score.semantic_score > 0.0);
    }

    #[test]
    fn completion_like_vector_scores_negative_semantic_score() {
        let provider = StubProvider;
        let prototypes = Prototypes::compute(
            &provider,
            &["intent phrase".to_string()],
            &["done phrase".to_string()],
        )
        .unwrap();

        let completion_vector = provider.embed("it is done").unwrap();
        let score = score_semantics(&completion_vector, &prototypes, &ScoringWeights::default());
        assert!(score.semantic_score < 0.0);
    }
}
