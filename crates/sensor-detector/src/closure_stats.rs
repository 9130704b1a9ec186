//! Closure Statistics (spec §4.7): aggregates open/closed/archived counts
//! from the Loop Detector's output and the external closure registry.

use std::collections::{HashMap, HashSet};

use sensor_core::models::{ClosureOutcome, ClosureRegistry, ClosureStats, LoopCandidate};

/// Classifies every loop-bearing conversation into exactly one of
/// open/closed/archived and aggregates the counts.
///
/// A conversation is `open` if the Loop Detector emitted it this refresh.
/// Otherwise, if the closure registry records an outcome for it, it is
/// `closed` or `archived` per that outcome's most recent entry. Anything
/// else is `none` and excluded from the ratio (spec §4.7).
pub fn compute_closure_stats(open_loops: &[LoopCandidate], registry: &ClosureRegistry) -> ClosureStats {
    let open_ids: HashSet<&str> = open_loops.iter().map(|l| l.conversation_id.as_str()).collect();

    // Dedup registry entries by loop_id, keeping the most recent (`ts`)
    // outcome as authoritative.
    let mut latest: HashMap<&str, &sensor_core::models::Closure> = HashMap::new();
    for closure in &registry.closures {
        latest
            .entry(closure.loop_id.as_str())
            .and_modify(|existing| {
                if closure.ts > existing.ts {
                    *existing = closure;
                }
            })
            .or_insert(closure);
    }

    let mut closed = 0usize;
    let mut archived = 0usize;
    for (loop_id, closure) in &latest {
        if open_ids.contains(loop_id) {
            continue;
        }
        match closure.outcome {
            ClosureOutcome::Closed => closed += 1,
            ClosureOutcome::Archived => archived += 1,
        }
    }

    ClosureStats::from_counts(open_ids.len(), closed, archived, registry.stats.last_closure_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sensor_core::models::{Closure, ClosureRegistryStats, ClassificationBand};

    fn loop_candidate(id: &str) -> LoopCandidate {
        LoopCandidate {
            conversation_id: id.to_string(),
            title: id.to_string(),
            score: 1.0,
            keyword_component: 1.0,
            semantic_component: 1.0,
            intent_similarity: 0.6,
            completion_similarity: 0.1,
            evidence_snippet: String::new(),
            last_at: Utc.timestamp_opt(0, 0).unwrap(),
            classification: ClassificationBand::Strong,
        }
    }

    fn registry_with(closures: Vec<Closure>) -> ClosureRegistry {
        ClosureRegistry {
            closures,
            stats: ClosureRegistryStats {
                total_closures: 0,
                last_closure_at: Some(42),
                streak_days: 0,
                best_streak: 0,
            },
        }
    }

    #[test]
    fn empty_inputs_yield_ratio_one() {
        let stats = compute_closure_stats(&[], &ClosureRegistry::empty());
        assert_eq!(stats.open, 0);
        assert_eq!(stats.closure_ratio, 1.0);
    }

    #[test]
    fn open_loop_with_no_closures_gives_ratio_zero() {
        let open = vec![loop_candidate("c1")];
        let stats = compute_closure_stats(&open, &ClosureRegistry::empty());
        assert_eq!(stats.open, 1);
        assert_eq!(stats.closed, 0);
        assert_eq!(stats.closure_ratio, 0.0);
    }

    #[test]
    fn closed_and_archived_are_counted_separately() {
        let registry = registry_with(vec![
            Closure {
                ts: 1,
                loop_id: "c1".to_string(),
                title: "t".to_string(),
                outcome: ClosureOutcome::Closed,
            },
            Closure {
                ts: 2,
                loop_id: "c2".to_string(),
                title: "t".to_string(),
                outcome: ClosureOutcome::Archived,
            },
        ]);
        let stats = compute_closure_stats(&[], &registry);
        assert_eq!(stats.closed, 1);
        assert_eq!(stats.archived, 1);
        assert_eq!(stats.closure_ratio, 1.0, "closed/(open+closed) = 1/1");
    }

    #[test]
    fn currently_open_conversation_overrides_a_stale_registry_entry() {
        let registry = registry_with(vec![Closure {
            ts: 1,
            loop_id: "c1".to_string(),
            title: "t".to_string(),
            outcome: ClosureOutcome::Closed,
        }]);
        let open = vec![loop_candidate("c1")];
        let stats = compute_closure_stats(&open, &registry);
        assert_eq!(stats.open, 1);
        assert_eq!(stats.closed, 0);
    }

    #[test]
    fn duplicate_registry_entries_keep_the_most_recent_outcome() {
        let registry = registry_with(vec![
            Closure {
                ts: 1,
                loop_id: "c1".to_string(),
                title: "t".to_string(),
                outcome: ClosureOutcome::Closed,
            },
            Closure {
                ts: 5,
                loop_id: "c1".to_string(),
                title: "t".to_string(),
                outcome: ClosureOutcome::Archived,
            },
        ]);
        let stats = compute_closure_stats(&[], &registry);
        assert_eq!(stats.closed, 0);
        assert_eq!(stats.archived, 1);
    }
}
