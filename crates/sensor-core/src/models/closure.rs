use serde::{Deserialize, Serialize};

/// Outcome recorded against a closed loop in the external closure registry
/// (spec §6: `closures.json`, written by the state kernel, read-only here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosureOutcome {
    Closed,
    Archived,
}

/// One entry in the closure registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Closure {
    pub ts: i64,
    pub loop_id: String,
    pub title: String,
    pub outcome: ClosureOutcome,
}

/// Aggregate streak/count stats carried alongside the closure list. Read,
/// never recomputed by this core — they belong to the external state
/// kernel's bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureRegistryStats {
    pub total_closures: u64,
    pub last_closure_at: Option<i64>,
    pub streak_days: u64,
    pub best_streak: u64,
}

/// The full contents of `closures.json` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureRegistry {
    pub closures: Vec<Closure>,
    pub stats: ClosureRegistryStats,
}

impl ClosureRegistry {
    /// An empty registry, used when `closures.json` does not yet exist.
    pub fn empty() -> Self {
        Self {
            closures: Vec::new(),
            stats: ClosureRegistryStats {
                total_closures: 0,
                last_closure_at: None,
                streak_days: 0,
                best_streak: 0,
            },
        }
    }
}

/// Aggregated open/closed/archived counts for one refresh (spec §3, §4.7).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClosureStats {
    pub open: usize,
    pub closed: usize,
    pub archived: usize,
    pub closure_ratio: f64,
    pub last_closure_at: Option<i64>,
}

impl ClosureStats {
    /// Computes stats from raw counts. `closure_ratio` is always derived
    /// here, never accepted as an independent input (spec invariant: "it is
    /// never written independently").
    pub fn from_counts(open: usize, closed: usize, archived: usize, last_closure_at: Option<i64>) -> Self {
        let denominator = open + closed;
        let closure_ratio = if denominator == 0 {
            1.0
        } else {
            closed as f64 / denominator as f64
        };

        Self {
            open,
            closed,
            archived,
            closure_ratio,
            last_closure_at,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Spec §8 testable property 4: `closure_ratio` is in `[0, 1]` for
        /// every possible count combination, not just the hand-picked cases
        /// above.
        #[test]
        fn closure_ratio_is_always_in_unit_interval(
            open in 0usize..10_000,
            closed in 0usize..10_000,
            archived in 0usize..10_000,
        ) {
            let stats = ClosureStats::from_counts(open, closed, archived, None);
            prop_assert!((0.0..=1.0).contains(&stats.closure_ratio));
        }

        /// Archived counts never affect the ratio (spec §4.7: excluded from
        /// the denominator).
        #[test]
        fn archived_count_never_changes_ratio(
            open in 0usize..1_000,
            closed in 0usize..1_000,
            archived_a in 0usize..1_000,
            archived_b in 0usize..1_000,
        ) {
            let a = ClosureStats::from_counts(open, closed, archived_a, None);
            let b = ClosureStats::from_counts(open, closed, archived_b, None);
            prop_assert_eq!(a.closure_ratio, b.closure_ratio);
        }
    }
}
