//! End-to-end boundary scenarios for the refresh pipeline, wired through
//! `TfIdfFallback` so no ONNX model is required. Each test builds a corpus
//! in memory and drives it through the same sequence `sensor-cli`'s
//! `refresh` command does: embed, detect, aggregate, route, validate+write.

use std::collections::HashMap;

use chrono::Utc;

use sensor_core::config::{ClassificationThresholds, RouterThresholds, ScoringWeights};
use sensor_core::models::{ClosureRegistry, ClosureStats, Conversation, Mode};
use sensor_detector::{compute_closure_stats, detect_loops, route, DetectorInput};
use sensor_embeddings::{EmbeddingIndex, TfIdfFallback};
use sensor_lexicon::Lexicon;
use sensor_scoring::Prototypes;
use sensor_storage::{read_closure_registry, IndexStore};
use sensor_validation::{write_cognitive_state, write_daily_payload, write_directive_text, write_loops};

use test_fixtures::{conversation_with_completion, conversation_with_intent, fixture_path, synthetic_open_corpus};

fn embed_all(conversations: &[Conversation]) -> (HashMap<String, Vec<f32>>, Prototypes) {
    let store = IndexStore::open_in_memory().unwrap();
    let provider = TfIdfFallback::new("tfidf-fallback".to_string());
    let index = EmbeddingIndex::new(store, Box::new(provider));

    let items: Vec<(String, String)> = conversations
        .iter()
        .map(|c| (c.conversation_id.clone(), c.embed_text()))
        .collect();
    index.batch_ensure(&items).unwrap();

    let lexicon = Lexicon::load_default().unwrap();
    let proto_provider = TfIdfFallback::new("tfidf-fallback".to_string());
    let prototypes =
        Prototypes::compute(&proto_provider, lexicon.intent_phrases(), lexicon.completion_phrases()).unwrap();

    (index.all().unwrap().into_iter().collect(), prototypes)
}

#[test]
fn empty_corpus_routes_to_build_with_ratio_one() {
    let conversations: Vec<Conversation> = Vec::new();
    let (embeddings, prototypes) = embed_all(&conversations);
    let lexicon = Lexicon::load_default().unwrap();

    let input = DetectorInput {
        conversations: &conversations,
        embeddings: &embeddings,
        lexicon: &lexicon,
        prototypes: &prototypes,
    };
    let loops = detect_loops(
        input,
        &ScoringWeights::default(),
        &ClassificationThresholds::default(),
        15,
    )
    .unwrap();
    assert!(loops.is_empty());

    let registry = ClosureRegistry::empty();
    let stats = compute_closure_stats(&loops, &registry);
    assert_eq!(stats.closure_ratio, 1.0);

    let directive = route(&stats, None, &RouterThresholds::default(), Utc::now().date_naive());
    assert_eq!(directive.mode, Mode::Build);
    assert!(directive.build_allowed);
}

#[test]
fn single_intent_conversation_is_strong_and_routes_to_closure() {
    let conversations = vec![conversation_with_intent(
        "conv-a",
        "I need to finish the launch plan",
        0,
    )];
    let (embeddings, prototypes) = embed_all(&conversations);
    let lexicon = Lexicon::load_default().unwrap();

    let input = DetectorInput {
        conversations: &conversations,
        embeddings: &embeddings,
        lexicon: &lexicon,
        prototypes: &prototypes,
    };
    let loops = detect_loops(
        input,
        &ScoringWeights::default(),
        &ClassificationThresholds::default(),
        15,
    )
    .unwrap();
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].conversation_id, "conv-a");

    let registry = ClosureRegistry::empty();
    let stats = compute_closure_stats(&loops, &registry);
    assert_eq!(stats.open, 1);
    assert_eq!(stats.closed, 0);

    let directive = route(
        &stats,
        loops.first(),
        &RouterThresholds::default(),
        Utc::now().date_naive(),
    );
    assert_eq!(directive.mode, Mode::Closure);
    assert!(directive.primary_action.contains("launch plan"));
}

#[test]
fn twenty_one_open_loops_forces_closure_regardless_of_ratio() {
    let conversations = synthetic_open_corpus(21);
    let (embeddings, prototypes) = embed_all(&conversations);
    let lexicon = Lexicon::load_default().unwrap();

    let input = DetectorInput {
        conversations: &conversations,
        embeddings: &embeddings,
        lexicon: &lexicon,
        prototypes: &prototypes,
    };
    let loops = detect_loops(
        input,
        &ScoringWeights::default(),
        &ClassificationThresholds::default(),
        30,
    )
    .unwrap();
    assert_eq!(loops.len(), 21);

    let registry = ClosureRegistry::empty();
    let stats = compute_closure_stats(&loops, &registry);
    assert_eq!(stats.open, 21);

    let directive = route(&stats, loops.first(), &RouterThresholds::default(), Utc::now().date_naive());
    assert_eq!(directive.mode, Mode::Closure);
}

#[test]
fn ten_open_ninety_closed_yields_point_nine_ratio_and_build_mode() {
    let stats = ClosureStats::from_counts(10, 90, 0, None);
    assert!((stats.closure_ratio - 0.9).abs() < 1e-12);

    let directive = route(&stats, None, &RouterThresholds::default(), Utc::now().date_naive());
    assert_eq!(directive.mode, Mode::Build);
    assert!(directive.build_allowed);
}

#[test]
fn completion_coded_conversation_never_appears_in_top_k() {
    let conversations = vec![
        conversation_with_intent("open-1", "I still need to draft the proposal", 0),
        conversation_with_completion("closed-1", "finished and shipped the proposal, all done", 3600),
    ];
    let (embeddings, prototypes) = embed_all(&conversations);
    let lexicon = Lexicon::load_default().unwrap();

    let input = DetectorInput {
        conversations: &conversations,
        embeddings: &embeddings,
        lexicon: &lexicon,
        prototypes: &prototypes,
    };
    let loops = detect_loops(
        input,
        &ScoringWeights::default(),
        &ClassificationThresholds::default(),
        15,
    )
    .unwrap();
    assert!(loops.iter().all(|l| l.conversation_id != "closed-1"));
}

#[test]
fn refresh_twice_is_byte_stable_modulo_generated_at() {
    let conversations = vec![conversation_with_intent("conv-a", "I need to finish the launch plan", 0)];
    let lexicon = Lexicon::load_default().unwrap();
    let registry = ClosureRegistry::empty();

    let run = || {
        let (embeddings, prototypes) = embed_all(&conversations);
        let input = DetectorInput {
            conversations: &conversations,
            embeddings: &embeddings,
            lexicon: &lexicon,
            prototypes: &prototypes,
        };
        let loops = detect_loops(
            input,
            &ScoringWeights::default(),
            &ClassificationThresholds::default(),
            15,
        )
        .unwrap();
        let stats = compute_closure_stats(&loops, &registry);
        let directive = route(&stats, loops.first(), &RouterThresholds::default(), Utc::now().date_naive());
        (stats, directive, loops)
    };

    let (stats_a, directive_a, loops_a) = run();
    let (stats_b, directive_b, loops_b) = run();

    assert_eq!(stats_a.open, stats_b.open);
    assert_eq!(stats_a.closure_ratio, stats_b.closure_ratio);
    assert_eq!(directive_a.mode, directive_b.mode);
    assert_eq!(directive_a.primary_action, directive_b.primary_action);
    assert_eq!(loops_a.len(), loops_b.len());
    assert_eq!(loops_a[0].score, loops_b[0].score);
}

#[test]
fn sample_corpus_fixture_loads_and_closure_registry_round_trips() {
    let corpus = sensor_storage::JsonlCorpus::open(&fixture_path("corpora/sample_corpus.jsonl")).unwrap();
    let conversations = sensor_core::traits::ConversationSource::list_conversations(&corpus).unwrap();
    assert_eq!(conversations.len(), 4);

    let registry = read_closure_registry(&fixture_path("registries/sample_closures.json")).unwrap();
    assert_eq!(registry.closures.len(), 2);
    assert_eq!(registry.stats.total_closures, 2);
}

#[test]
fn validated_artifacts_write_successfully_for_a_build_mode_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let stats = ClosureStats::from_counts(0, 0, 0, None);
    let directive = route(&stats, None, &RouterThresholds::default(), Utc::now().date_naive());

    write_cognitive_state(&dir.path().join("cognitive_state.json"), &stats, &[], Utc::now()).unwrap();
    write_directive_text(&dir.path().join("daily_directive.txt"), &directive).unwrap();
    write_daily_payload(&dir.path().join("daily_payload.json"), &directive, &stats, &[]).unwrap();
    write_loops(&dir.path().join("loops_latest.json"), &[], 0.70).unwrap();

    for name in ["cognitive_state.json", "daily_directive.txt", "daily_payload.json", "loops_latest.json"] {
        assert!(dir.path().join(name).exists());
    }
}
