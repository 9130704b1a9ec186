//! Validate-then-atomic-write for every output artifact (spec §4.10, §9).
//!
//! Every writer here follows the same shape: build the artifact doc,
//! run its contract check, and only then serialize and atomically write it.
//! A non-empty violation list short-circuits before any bytes touch disk,
//! so the previous artifact on disk is left untouched (spec §7).

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::models::{ClosureStats, Directive, LoopCandidate};
use sensor_storage::write_atomically;

use crate::artifacts::{
    build_cognitive_state, build_daily_payload, build_daily_projection, build_directive_text,
    CognitiveStateDoc, DailyPayloadDoc, DailyProjectionDoc,
};
use crate::contracts::{
    validate_cognitive_state, validate_daily_payload, validate_daily_projection, validate_directive_text,
    validate_loops,
};

fn to_pretty_json<T: Serialize>(artifact: &str, value: &T) -> SensorResult<String> {
    let mut text = serde_json::to_string_pretty(value).map_err(|e| SensorError::ContractViolation {
        artifact: artifact.to_string(),
        details: format!("failed to serialize: {e}"),
    })?;
    text.push('\n');
    Ok(text)
}

fn fail_if_violated(artifact: &str, violations: Vec<String>) -> SensorResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(SensorError::ContractViolation {
        artifact: artifact.to_string(),
        details: violations.join("; "),
    })
}

/// `cognitive_state.json` — CognitiveMetricsComputed.
pub fn write_cognitive_state(
    path: &Path,
    stats: &ClosureStats,
    loops: &[LoopCandidate],
    generated_at: DateTime<Utc>,
) -> SensorResult<CognitiveStateDoc> {
    let doc = build_cognitive_state(stats, loops, generated_at);
    fail_if_violated("cognitive_state.json", validate_cognitive_state(&doc))?;
    let text = to_pretty_json("cognitive_state.json", &doc)?;
    write_atomically(path, &text)?;
    Ok(doc)
}

/// `daily_directive.txt` — MODE/ACTION/RISK lines.
pub fn write_directive_text(path: &Path, directive: &Directive) -> SensorResult<()> {
    let text = build_directive_text(directive);
    fail_if_violated("daily_directive.txt", validate_directive_text(&text))?;
    write_atomically(path, &text)
}

/// `daily_payload.json` — DailyPayload.v1.
pub fn write_daily_payload(
    path: &Path,
    directive: &Directive,
    stats: &ClosureStats,
    loops: &[LoopCandidate],
) -> SensorResult<DailyPayloadDoc> {
    let doc = build_daily_payload(directive, stats, loops);
    fail_if_violated("daily_payload.json", validate_daily_payload(&doc))?;
    let text = to_pretty_json("daily_payload.json", &doc)?;
    write_atomically(path, &text)?;
    Ok(doc)
}

/// `loops_latest.json` — ranked LoopCandidates, no declared contract beyond
/// the completion-similarity cutoff every emitted candidate already
/// satisfies by construction (spec §4.6); re-checked here defensively since
/// this is the one artifact written straight from detector output.
pub fn write_loops(path: &Path, loops: &[LoopCandidate], completion_cutoff: f64) -> SensorResult<()> {
    fail_if_violated("loops_latest.json", validate_loops(loops, completion_cutoff))?;
    let text = to_pretty_json("loops_latest.json", &loops)?;
    write_atomically(path, &text)
}

/// `daily_projection.json` — DailyProjection.v1.
pub fn write_daily_projection(
    path: &Path,
    date: NaiveDate,
    cognitive: CognitiveStateDoc,
    directive: Directive,
) -> SensorResult<DailyProjectionDoc> {
    let doc = build_daily_projection(date, cognitive, directive);
    fail_if_violated("daily_projection.json", validate_daily_projection(&doc))?;
    let text = to_pretty_json("daily_projection.json", &doc)?;
    write_atomically(path, &text)?;
    Ok(doc)
}
