//! On-disk shapes for every output artifact (spec §6). Plain structs, not a
//! generic schema engine: there are exactly five fixed shapes, and field
//! order here is the field order that lands in the JSON file (`serde_json`
//! preserves declared struct field order).

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use sensor_core::models::{ClassificationBand, ClosureStats, Directive, LoopCandidate, Mode, Risk};

/// `cognitive_state.json` — CognitiveMetricsComputed.
#[derive(Debug, Clone, Serialize)]
pub struct CognitiveStateDoc {
    pub closure: ClosureDoc,
    pub loops: Vec<LoopSummaryDoc>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClosureDoc {
    pub open: usize,
    pub closed: usize,
    pub archived: usize,
    pub ratio: f64,
}

impl From<&ClosureStats> for ClosureDoc {
    fn from(stats: &ClosureStats) -> Self {
        Self {
            open: stats.open,
            closed: stats.closed,
            archived: stats.archived,
            ratio: stats.closure_ratio,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoopSummaryDoc {
    pub title: String,
    pub score: f64,
    pub classification: ClassificationBand,
    pub last_at: DateTime<Utc>,
}

impl From<&LoopCandidate> for LoopSummaryDoc {
    fn from(loop_candidate: &LoopCandidate) -> Self {
        Self {
            title: loop_candidate.title.clone(),
            score: loop_candidate.score,
            classification: loop_candidate.classification,
            last_at: loop_candidate.last_at,
        }
    }
}

pub fn build_cognitive_state(stats: &ClosureStats, loops: &[LoopCandidate], generated_at: DateTime<Utc>) -> CognitiveStateDoc {
    CognitiveStateDoc {
        closure: ClosureDoc::from(stats),
        loops: loops.iter().map(LoopSummaryDoc::from).collect(),
        generated_at,
    }
}

/// `daily_payload.json` — DailyPayload.v1.
#[derive(Debug, Clone, Serialize)]
pub struct DailyPayloadDoc {
    pub mode: Mode,
    pub build_allowed: bool,
    pub primary_action: String,
    pub open_loops: Vec<String>,
    pub open_loop_count: usize,
    pub closure_ratio: f64,
    pub risk: Risk,
    pub generated_at: NaiveDate,
}

pub fn build_daily_payload(directive: &Directive, stats: &ClosureStats, loops: &[LoopCandidate]) -> DailyPayloadDoc {
    DailyPayloadDoc {
        mode: directive.mode,
        build_allowed: directive.build_allowed,
        primary_action: directive.primary_action.clone(),
        open_loops: loops.iter().map(|l| l.title.clone()).collect(),
        open_loop_count: stats.open,
        closure_ratio: stats.closure_ratio,
        risk: directive.risk,
        generated_at: directive.generated_at,
    }
}

/// `daily_projection.json` — DailyProjection.v1.
#[derive(Debug, Clone, Serialize)]
pub struct DailyProjectionDoc {
    pub date: NaiveDate,
    pub cognitive: CognitiveStateDoc,
    pub directive: Directive,
}

pub fn build_daily_projection(
    date: NaiveDate,
    cognitive: CognitiveStateDoc,
    directive: Directive,
) -> DailyProjectionDoc {
    DailyProjectionDoc {
        date,
        cognitive,
        directive,
    }
}

/// `daily_directive.txt` — plain text, machine-parseable `KEY=value` lines.
pub fn build_directive_text(directive: &Directive) -> String {
    format!(
        "MODE={}\nACTION={}\nRISK={}\n",
        directive.mode.as_str(),
        directive.primary_action,
        directive.risk.as_str()
    )
}
