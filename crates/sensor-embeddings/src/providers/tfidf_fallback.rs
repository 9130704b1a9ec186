//! TF-IDF sparse-to-dense fallback provider.
//!
//! Generates fixed-dimension vectors from term frequency-inverse document
//! frequency scores, hashed into buckets. No external model file, no
//! network call — always available, fully deterministic. Spec §4.2 treats
//! this as a *documented* provider choice (selected via
//! `MODEL_ID=tfidf-fallback`), not a silent degrade path.

use std::collections::HashMap;

use sensor_core::constants::EMBEDDING_DIMENSIONS;
use sensor_core::errors::SensorResult;
use sensor_core::traits::EmbeddingProvider;

pub struct TfIdfFallback {
    model_id: String,
}

impl TfIdfFallback {
    pub fn new(model_id: String) -> Self {
        Self { model_id }
    }

    /// Hashes a term into a bucket index using FNV-1a.
    fn hash_term(term: &str) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % EMBEDDING_DIMENSIONS
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn tfidf_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; EMBEDDING_DIMENSIONS];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; EMBEDDING_DIMENSIONS];

        for (term, count) in &tf {
            let freq = count / total;
            // Approximate IDF: penalize very short terms (likely stopwords).
            let idf = 1.0 + (term.len() as f32).ln();
            let bucket = Self::hash_term(term);
            vec[bucket] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }

        vec
    }
}

impl EmbeddingProvider for TfIdfFallback {
    fn embed(&self, text: &str) -> SensorResult<Vec<f32>> {
        Ok(self.tfidf_vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> SensorResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.tfidf_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> TfIdfFallback {
        TfIdfFallback::new("tfidf-fallback".to_string())
    }

    #[test]
    fn empty_text_returns_zero_vector() {
        let p = provider();
        let v = p.embed("").unwrap();
        assert_eq!(v.len(), EMBEDDING_DIMENSIONS);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn produces_fixed_dimensions() {
        let p = provider();
        let v = p.embed("hello world test embedding").unwrap();
        assert_eq!(v.len(), EMBEDDING_DIMENSIONS);
    }

    #[test]
    fn output_is_unit_normalized() {
        let p = provider();
        let v = p.embed("rust programming language systems").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn deterministic_for_same_text() {
        let p = provider();
        let a = p.embed("I need to finish the report").unwrap();
        let b = p.embed("I need to finish the report").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn batch_matches_individual_calls() {
        let p = provider();
        let texts = vec!["hello world".to_string(), "foo bar baz".to_string()];
        let batch = p.embed_batch(&texts).unwrap();
        for (i, text) in texts.iter().enumerate() {
            assert_eq!(batch[i], p.embed(text).unwrap());
        }
    }

    #[test]
    fn similar_texts_score_higher_cosine_than_unrelated() {
        let p = provider();
        let a = p.embed("rust programming language").unwrap();
        let b = p.embed("rust programming systems").unwrap();
        let c = p.embed("cooking recipes pasta").unwrap();

        let cos_ab: f32 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let cos_ac: f32 = a.iter().zip(&c).map(|(x, y)| x * y).sum();
        assert!(cos_ab > cos_ac);
    }
}
