//! Loop Detector (spec §4.6): fuses the keyword and semantic scores, ranks
//! conversations, and emits the top-K open loops subject to the hard
//! completion cutoff and the noise filter.

use std::collections::HashMap;

use tracing::{debug, warn};

use sensor_core::config::{ClassificationThresholds, ScoringWeights};
use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::models::{ClassificationBand, Conversation, LoopCandidate};
use sensor_lexicon::Lexicon;
use sensor_scoring::{evidence_snippet, score_conversations, Prototypes, ScoringInput};

/// Everything the detector needs for one refresh's ranking pass.
pub struct DetectorInput<'a> {
    pub conversations: &'a [Conversation],
    pub embeddings: &'a HashMap<String, Vec<f32>>,
    pub lexicon: &'a Lexicon,
    pub prototypes: &'a Prototypes,
}

/// Detects open loops across `input.conversations`.
///
/// Spec §4.6: an empty corpus yields an empty loop list, not an error. A
/// conversation missing an embedding is an `IndexStale` condition — the
/// detector refuses to run rather than silently skip it, since that would
/// make loop ranking depend on embed ordering.
pub fn detect_loops(
    input: DetectorInput,
    weights: &ScoringWeights,
    classification: &ClassificationThresholds,
    top_k: usize,
) -> SensorResult<Vec<LoopCandidate>> {
    if input.conversations.is_empty() {
        return Ok(Vec::new());
    }

    let missing = input
        .conversations
        .iter()
        .filter(|c| !input.embeddings.contains_key(&c.conversation_id))
        .count();
    if missing > 0 {
        return Err(SensorError::IndexStale {
            model_id: "current".to_string(),
            missing,
        });
    }

    let user_texts: Vec<String> = input.conversations.iter().map(|c| c.user_text()).collect();
    // Untruncated: completion hits must be counted anywhere in the
    // conversation (spec §4.4), and the 5000-char embedding truncation
    // (spec §4.1/§9) is scoped to the embedding path only, not scoring.
    let full_texts: Vec<String> = input.conversations.iter().map(|c| c.full_text(usize::MAX)).collect();
    for (conv, user_text) in input.conversations.iter().zip(&user_texts) {
        if user_text.trim().is_empty() {
            warn!(conversation_id = %conv.conversation_id, "conversation has empty user text; keyword score will be zero");
        }
    }

    let scoring_inputs: Vec<ScoringInput> = input
        .conversations
        .iter()
        .zip(&user_texts)
        .zip(&full_texts)
        .map(|((conv, user_text), full_text)| ScoringInput {
            user_text,
            full_text,
            vector: &input.embeddings[&conv.conversation_id],
        })
        .collect();
    let scored = score_conversations(&scoring_inputs, input.lexicon, input.prototypes, weights);

    let mut candidates: Vec<LoopCandidate> = Vec::with_capacity(input.conversations.len());

    for ((conv, user_text), (keyword, semantic)) in
        input.conversations.iter().zip(&user_texts).zip(scored)
    {
        let score = weights.semantic_weight * semantic.semantic_score
            + weights.keyword_weight * keyword.keyword_score;

        if semantic.completion_similarity >= weights.completion_similarity_cutoff {
            continue;
        }
        if keyword.intent_hits == 0 && semantic.intent_similarity < weights.noise_filter_intent_similarity {
            continue;
        }

        let snippet = evidence_snippet(
            user_text,
            input.lexicon.compiled_intent_phrases(),
            conv.messages
                .iter()
                .find(|m| m.role == sensor_core::models::MessageRole::User)
                .map(|m| m.text.as_str())
                .unwrap_or(""),
        );

        candidates.push(LoopCandidate {
            conversation_id: conv.conversation_id.clone(),
            title: conv.title.clone(),
            score,
            keyword_component: keyword.keyword_score,
            semantic_component: semantic.semantic_score,
            intent_similarity: semantic.intent_similarity,
            completion_similarity: semantic.completion_similarity,
            evidence_snippet: snippet,
            last_at: conv.last_at,
            classification: ClassificationBand::classify(
                semantic.intent_similarity,
                classification.strong,
                classification.medium,
            ),
        });
    }

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.last_at.cmp(&a.last_at))
            .then_with(|| a.conversation_id.cmp(&b.conversation_id))
    });

    candidates.truncate(top_k);
    debug!(emitted = candidates.len(), top_k, "loop detector ranked candidates");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sensor_core::models::{Message, MessageRole};

    fn conv(id: &str, text: &str, secs: i64) -> Conversation {
        Conversation::from_messages(
            id.to_string(),
            vec![Message {
                conversation_id: id.to_string(),
                message_index: 0,
                role: MessageRole::User,
                text: text.to_string(),
                created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            }],
        )
        .unwrap()
    }

    fn flat_prototypes(dims: usize) -> Prototypes {
        Prototypes {
            intent: vec![0.0; dims],
            completion: vec![0.0; dims],
        }
    }

    #[test]
    fn empty_corpus_yields_empty_loop_list() {
        let lexicon = Lexicon::load_default().unwrap();
        let prototypes = flat_prototypes(4);
        let conversations: Vec<Conversation> = Vec::new();
        let embeddings = HashMap::new();
        let input = DetectorInput {
            conversations: &conversations,
            embeddings: &embeddings,
            lexicon: &lexicon,
            prototypes: &prototypes,
        };
        let result = detect_loops(
            input,
            &ScoringWeights::default(),
            &ClassificationThresholds::default(),
            15,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn missing_embedding_is_index_stale() {
        let lexicon = Lexicon::load_default().unwrap();
        let prototypes = flat_prototypes(4);
        let conversations = vec![conv("c1", "i need to finish", 0)];
        let embeddings = HashMap::new();
        let input = DetectorInput {
            conversations: &conversations,
            embeddings: &embeddings,
            lexicon: &lexicon,
            prototypes: &prototypes,
        };
        let err = detect_loops(
            input,
            &ScoringWeights::default(),
            &ClassificationThresholds::default(),
            15,
        )
        .unwrap_err();
        assert!(matches!(err, SensorError::IndexStale { .. }));
    }

    #[test]
    fn single_intent_conversation_is_emitted_as_strong() {
        let lexicon = Lexicon::load_default().unwrap();
        let prototypes = flat_prototypes(4);
        let conversations = vec![conv("c1", "I need to finish the report", 0)];
        let mut embeddings = HashMap::new();
        // A vector aligned toward the intent axis; flat prototypes here
        // leave semantic similarity at zero, so the keyword signal alone
        // must admit the conversation.
        embeddings.insert("c1".to_string(), vec![0.0, 0.0, 0.0, 0.0]);
        let input = DetectorInput {
            conversations: &conversations,
            embeddings: &embeddings,
            lexicon: &lexicon,
            prototypes: &prototypes,
        };
        let result = detect_loops(
            input,
            &ScoringWeights::default(),
            &ClassificationThresholds::default(),
            15,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].conversation_id, "c1");
        assert!(result[0].keyword_component > 0.0);
    }

    #[test]
    fn completion_coded_conversation_is_never_emitted() {
        let lexicon = Lexicon::load_default().unwrap();
        let prototypes = Prototypes {
            intent: vec![0.0, 0.0],
            completion: vec![1.0, 0.0],
        };
        let conversations = vec![conv("c1", "I need to finish this, done", 0)];
        let mut embeddings = HashMap::new();
        embeddings.insert("c1".to_string(), vec![1.0, 0.0]);
        let input = DetectorInput {
            conversations: &conversations,
            embeddings: &embeddings,
            lexicon: &lexicon,
            prototypes: &prototypes,
        };
        let result = detect_loops(
            input,
            &ScoringWeights::default(),
            &ClassificationThresholds::default(),
            15,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn tie_break_orders_by_last_at_then_conversation_id() {
        let lexicon = Lexicon::load_default().unwrap();
        let prototypes = flat_prototypes(2);
        let conversations = vec![
            conv("b", "i need to finish task", 100),
            conv("a", "i need to finish task", 100),
            conv("c", "i need to finish task", 50),
        ];
        let mut embeddings = HashMap::new();
        for c in &conversations {
            embeddings.insert(c.conversation_id.clone(), vec![0.0, 0.0]);
        }
        let input = DetectorInput {
            conversations: &conversations,
            embeddings: &embeddings,
            lexicon: &lexicon,
            prototypes: &prototypes,
        };
        let result = detect_loops(
            input,
            &ScoringWeights::default(),
            &ClassificationThresholds::default(),
            15,
        )
        .unwrap();
        assert_eq!(result[0].conversation_id, "a");
        assert_eq!(result[1].conversation_id, "b");
        assert_eq!(result[2].conversation_id, "c");
    }
}
