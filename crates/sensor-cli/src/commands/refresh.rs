//! `refresh`: the full pipeline (spec §5 ordering).
//!
//! 1. Quiesce the message store (a snapshot `list_conversations` read).
//! 2. Ensure an embedding for every conversation before scoring begins.
//! 3. Score (keyword + semantic, fused inside the detector) and rank.
//! 4. Read the closure registry, aggregate closure statistics.
//! 5. Route to a mode directive.
//! 6. Validate and atomically write every artifact.

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use tracing::info;

use sensor_core::config::SensorConfig;
use sensor_core::errors::SensorResult;
use sensor_core::models::RefreshReport;
use sensor_detector::{compute_closure_stats, detect_loops, route, DetectorInput};
use sensor_scoring::Prototypes;
use sensor_storage::{acquire_refresh_lock, read_closure_registry, IndexStore};

use crate::bootstrap::{index_db_path, open_corpus, open_embedding_index, open_lexicon};

pub fn run(config: &SensorConfig) -> SensorResult<RefreshReport> {
    let started = Instant::now();
    let _lock = acquire_refresh_lock(&config.artifacts_dir)?;

    let corpus = open_corpus(config)?;
    let conversations = corpus.list_conversations()?;
    info!(conversations = conversations.len(), "message store quiesced");

    let lexicon = open_lexicon(config)?;
    let vocab_store = IndexStore::open(&index_db_path(&config.artifacts_dir))?;
    let _vocabulary = lexicon.user_vocabulary_default(&vocab_store, &conversations)?;

    let index = open_embedding_index(config)?;
    let items: Vec<(String, String)> = conversations
        .iter()
        .map(|c| (c.conversation_id.clone(), c.embed_text()))
        .collect();
    let embedded_before = index.count()?;
    let embeddings = index.batch_ensure(&items)?;
    let embedded_after = index.count()?;
    let embeddings_computed = embedded_after.saturating_sub(embedded_before);
    let embeddings_reused = embeddings.len().saturating_sub(embeddings_computed);

    let mut warnings = Vec::new();
    for conv in &conversations {
        if conv.user_text().trim().is_empty() {
            warnings.push(format!(
                "conversation {} has empty user text; keyword score will be zero",
                conv.conversation_id
            ));
        }
    }

    let embeddings_map: HashMap<String, Vec<f32>> = embeddings
        .into_iter()
        .map(|e| (e.conversation_id, e.vector))
        .collect();

    // Prototypes are recomputed every refresh from the lexicon's phrase
    // lists; a fresh provider instance avoids threading the boxed provider
    // out of `EmbeddingIndex` for a one-off batch embed.
    let prototype_provider = sensor_embeddings::create_provider(
        &config.model_id,
        config.onnx_model_path.as_ref().and_then(|p| p.to_str()),
    )?;
    let prototypes = Prototypes::compute(
        prototype_provider.as_ref(),
        lexicon.intent_phrases(),
        lexicon.completion_phrases(),
    )?;

    let detector_input = DetectorInput {
        conversations: &conversations,
        embeddings: &embeddings_map,
        lexicon: &lexicon,
        prototypes: &prototypes,
    };
    let loops = detect_loops(
        detector_input,
        &config.scoring,
        &config.classification,
        config.loop_top_k,
    )?;
    info!(open_loops = loops.len(), "loop detector ranked candidates");

    let registry_path = config.artifacts_dir.join("closures.json");
    let registry = read_closure_registry(&registry_path)?;
    let stats = compute_closure_stats(&loops, &registry);

    let generated_at = Utc::now();
    let directive = route(&stats, loops.first(), &config.router, generated_at.date_naive());
    info!(mode = directive.mode.as_str(), risk = directive.risk.as_str(), "router selected mode");

    let cognitive = sensor_validation::write_cognitive_state(
        &config.artifacts_dir.join("cognitive_state.json"),
        &stats,
        &loops,
        generated_at,
    )?;
    sensor_validation::write_directive_text(&config.artifacts_dir.join("daily_directive.txt"), &directive)?;
    sensor_validation::write_daily_payload(
        &config.artifacts_dir.join("daily_payload.json"),
        &directive,
        &stats,
        &loops,
    )?;
    sensor_validation::write_loops(
        &config.artifacts_dir.join("loops_latest.json"),
        &loops,
        config.scoring.completion_similarity_cutoff,
    )?;
    sensor_validation::write_daily_projection(
        &config.artifacts_dir.join("daily_projection.json"),
        generated_at.date_naive(),
        cognitive,
        directive,
    )?;

    let report = RefreshReport {
        conversations_seen: conversations.len(),
        embeddings_computed,
        embeddings_reused,
        warnings,
        duration: started.elapsed(),
    };
    info!(
        conversations = report.conversations_seen,
        embeddings_computed = report.embeddings_computed,
        embeddings_reused = report.embeddings_reused,
        warnings = report.warnings.len(),
        duration_ms = report.duration.as_millis(),
        "refresh complete"
    );
    Ok(report)
}
