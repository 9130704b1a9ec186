//! # sensor-scoring
//!
//! The Keyword Scorer (spec §4.4) and Semantic Scorer (spec §4.5): the two
//! per-conversation signals the Loop Detector fuses.

mod keyword_scorer;
mod semantic_scorer;

pub use keyword_scorer::{evidence_snippet, score_keywords, KeywordScore};
pub use semantic_scorer::{score_semantics, Prototypes, SemanticScore};

use rayon::prelude::*;
use sensor_core::config::ScoringWeights;
use sensor_lexicon::Lexicon;

/// One conversation's raw inputs to both scorers, borrowed so the caller
/// keeps ownership of `Conversation`/embedding storage.
pub struct ScoringInput<'a> {
    pub user_text: &'a str,
    pub full_text: &'a str,
    pub vector: &'a [f32],
}

/// Scores every item in `inputs` against `lexicon`/`prototypes` using
/// rayon's work-stealing pool (spec §5: scoring is CPU-bound and may use
/// backend parallelism; the per-conversation computations are independent,
/// so fan-out here doesn't affect the deterministic sort the Loop Detector
/// applies afterward). Output order matches input order.
pub fn score_conversations(
    inputs: &[ScoringInput],
    lexicon: &Lexicon,
    prototypes: &Prototypes,
    weights: &ScoringWeights,
) -> Vec<(KeywordScore, SemanticScore)> {
    inputs
        .par_iter()
        .map(|input| {
            let keyword = score_keywords(lexicon, input.user_text, input.full_text, weights);
            let semantic = score_semantics(input.vector, prototypes, weights);
            (keyword, semantic)
        })
        .collect()
}
