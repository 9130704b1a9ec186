//! Router (spec §4.8): a pure total function from `ClosureStats` to a
//! `Directive`. No hidden state, no time-of-day logic — only the date the
//! directive is stamped with comes from outside the threshold table.

use chrono::NaiveDate;

use sensor_core::config::RouterThresholds;
use sensor_core::models::{ClosureStats, Directive, LoopCandidate, Mode, Risk};

/// Selects a mode for `stats` against `thresholds` and synthesizes the
/// directive. `top_loop` is the highest-ranked open loop, if any, used to
/// fill `primary_action`'s title for CLOSURE/MAINTENANCE modes.
///
/// Ties are resolved by earlier rows of the spec §4.8 table winning: CLOSURE
/// is checked first, then MAINTENANCE, with BUILD as the default.
pub fn route(
    stats: &ClosureStats,
    top_loop: Option<&LoopCandidate>,
    thresholds: &RouterThresholds,
    generated_at: NaiveDate,
) -> Directive {
    if stats.closure_ratio < thresholds.closure_ratio_floor || stats.open > thresholds.closure_open_ceiling {
        return Directive {
            mode: Mode::Closure,
            primary_action: primary_action(Mode::Closure, top_loop),
            rationale: format!(
                "closure_ratio={:.2} (floor {:.2}), open={} (ceiling {})",
                stats.closure_ratio, thresholds.closure_ratio_floor, stats.open, thresholds.closure_open_ceiling
            ),
            risk: Risk::High,
            build_allowed: false,
            generated_at,
        };
    }

    if stats.open > thresholds.maintenance_open_floor && stats.open <= thresholds.maintenance_open_ceiling {
        return Directive {
            mode: Mode::Maintenance,
            primary_action: primary_action(Mode::Maintenance, top_loop),
            rationale: format!(
                "open={} is within the maintenance band ({}, {}], closure_ratio={:.2}",
                stats.open, thresholds.maintenance_open_floor, thresholds.maintenance_open_ceiling, stats.closure_ratio
            ),
            risk: Risk::Medium,
            build_allowed: false,
            generated_at,
        };
    }

    Directive {
        mode: Mode::Build,
        primary_action: primary_action(Mode::Build, top_loop),
        rationale: format!(
            "open={} is at or below the maintenance floor, closure_ratio={:.2}",
            stats.open, stats.closure_ratio
        ),
        risk: Risk::Low,
        build_allowed: true,
        generated_at,
    }
}

fn primary_action(mode: Mode, top_loop: Option<&LoopCandidate>) -> String {
    match mode {
        Mode::Closure => match top_loop {
            Some(l) => format!("Close or archive '{}'", l.title),
            None => "Close or archive the oldest open loop".to_string(),
        },
        Mode::Maintenance => match top_loop {
            Some(l) => format!("Review '{}'", l.title),
            None => "Review open loops".to_string(),
        },
        Mode::Build => "Ship one new outcome today".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sensor_core::models::ClassificationBand;

    fn date() -> NaiveDate {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap().date_naive()
    }

    fn sample_loop(title: &str) -> LoopCandidate {
        LoopCandidate {
            conversation_id: "c1".to_string(),
            title: title.to_string(),
            score: 10.0,
            keyword_component: 1.0,
            semantic_component: 1.0,
            intent_similarity: 0.6,
            completion_similarity: 0.1,
            evidence_snippet: String::new(),
            last_at: Utc.timestamp_opt(0, 0).unwrap(),
            classification: ClassificationBand::Strong,
        }
    }

    #[test]
    fn low_closure_ratio_triggers_closure_mode() {
        let stats = ClosureStats::from_counts(1, 0, 0, None);
        let directive = route(&stats, Some(&sample_loop("ship the report")), &RouterThresholds::default(), date());
        assert_eq!(directive.mode, Mode::Closure);
        assert!(!directive.build_allowed);
        assert_eq!(directive.risk, Risk::High);
        assert!(directive.primary_action.contains("ship the report"));
    }

    #[test]
    fn more_than_twenty_open_triggers_closure_regardless_of_ratio() {
        let stats = ClosureStats::from_counts(21, 100, 0, None);
        let directive = route(&stats, None, &RouterThresholds::default(), date());
        assert_eq!(directive.mode, Mode::Closure);
    }

    #[test]
    fn maintenance_band_is_exclusive_on_the_floor() {
        let stats = ClosureStats::from_counts(15, 90, 0, None);
        let directive = route(&stats, None, &RouterThresholds::default(), date());
        assert_eq!(directive.mode, Mode::Maintenance);
        assert_eq!(directive.risk, Risk::Medium);
    }

    #[test]
    fn ten_open_is_build_not_maintenance() {
        let stats = ClosureStats::from_counts(10, 90, 0, None);
        let directive = route(&stats, None, &RouterThresholds::default(), date());
        assert_eq!(directive.mode, Mode::Build);
        assert!(directive.build_allowed);
    }

    #[test]
    fn empty_corpus_routes_to_build() {
        let stats = ClosureStats::from_counts(0, 0, 0, None);
        let directive = route(&stats, None, &RouterThresholds::default(), date());
        assert_eq!(directive.mode, Mode::Build);
    }

    #[test]
    fn ninety_closed_ten_open_routes_to_build() {
        let stats = ClosureStats::from_counts(10, 90, 0, None);
        assert!((stats.closure_ratio - 0.9).abs() < 1e-12);
        let directive = route(&stats, None, &RouterThresholds::default(), date());
        assert_eq!(directive.mode, Mode::Build);
    }

    #[test]
    fn router_is_pure() {
        let stats = ClosureStats::from_counts(5, 50, 3, Some(10));
        let a = route(&stats, None, &RouterThresholds::default(), date());
        let b = route(&stats, None, &RouterThresholds::default(), date());
        assert_eq!(a.mode, b.mode);
        assert_eq!(a.rationale, b.rationale);
    }
}
