//! Contract checks: one plain function per artifact, each returning the
//! list of violations found (empty = passes). Spec §4.10: validation
//! failure is fatal and the previous artifact is preserved — the caller
//! (see [`crate::writer`]) turns a non-empty violation list into a
//! `ContractViolation` error before ever touching disk.

use sensor_core::models::LoopCandidate;

use crate::artifacts::{CognitiveStateDoc, DailyPayloadDoc, DailyProjectionDoc};

/// cognitive_state.json: `closure.ratio` must be in `[0, 1]` (testable
/// property 4).
pub fn validate_cognitive_state(doc: &CognitiveStateDoc) -> Vec<String> {
    let mut violations = Vec::new();

    if !(0.0..=1.0).contains(&doc.closure.ratio) {
        violations.push(format!("closure.ratio {} is outside [0, 1]", doc.closure.ratio));
    }

    violations
}

/// loops_latest.json: no emitted loop may have `completion_similarity >=
/// cutoff` (testable property 5).
pub fn validate_loops(loops: &[LoopCandidate], completion_cutoff: f64) -> Vec<String> {
    loops
        .iter()
        .filter(|l| l.completion_similarity >= completion_cutoff)
        .map(|l| {
            format!(
                "loop {} has completion_similarity {} >= cutoff {}",
                l.conversation_id, l.completion_similarity, completion_cutoff
            )
        })
        .collect()
}

/// daily_payload.json: the loop count and titles must agree with the
/// closure stats and loop list they were built from.
pub fn validate_daily_payload(doc: &DailyPayloadDoc) -> Vec<String> {
    let mut violations = Vec::new();

    if doc.open_loops.len() != doc.open_loop_count {
        violations.push(format!(
            "open_loops has {} entries but open_loop_count is {}",
            doc.open_loops.len(),
            doc.open_loop_count
        ));
    }
    if !(0.0..=1.0).contains(&doc.closure_ratio) {
        violations.push(format!("closure_ratio {} is outside [0, 1]", doc.closure_ratio));
    }
    if doc.build_allowed && doc.mode != sensor_core::models::Mode::Build {
        violations.push(format!("build_allowed is true but mode is {:?}", doc.mode));
    }

    violations
}

/// daily_directive.txt: must contain exactly the three documented
/// `KEY=value` lines (spec §6), in order.
pub fn validate_directive_text(text: &str) -> Vec<String> {
    let mut violations = Vec::new();
    let lines: Vec<&str> = text.lines().collect();

    let expectations = [("MODE=", 0), ("ACTION=", 1), ("RISK=", 2)];
    for (prefix, idx) in expectations {
        match lines.get(idx) {
            Some(line) if line.starts_with(prefix) => {}
            Some(line) => violations.push(format!("line {idx} {line:?} does not start with {prefix:?}")),
            None => violations.push(format!("missing line {idx} (expected {prefix:?})")),
        }
    }

    violations
}

/// daily_projection.json: the nested cognitive/directive documents must
/// each independently pass their own contract, and the outer `date` must
/// match the directive's `generated_at`.
pub fn validate_daily_projection(doc: &DailyProjectionDoc) -> Vec<String> {
    let mut violations = validate_cognitive_state(&doc.cognitive);
    if doc.date != doc.directive.generated_at {
        violations.push(format!(
            "projection date {} does not match directive.generated_at {}",
            doc.date, doc.directive.generated_at
        ));
    }
    violations
}
