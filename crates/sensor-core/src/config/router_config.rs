use serde::{Deserialize, Serialize};

/// The router's mode-selection threshold table (spec §4.8).
///
/// A plain struct rather than a `Vec` of rules: there are exactly three
/// rows, their evaluation order is fixed (earlier rows win ties), and the
/// router is meant to be auditable by reading this struct, not by walking a
/// data-driven rule list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterThresholds {
    /// CLOSURE triggers when `closure_ratio` drops below this, or `open`
    /// exceeds `closure_open_ceiling`.
    pub closure_ratio_floor: f64,
    pub closure_open_ceiling: usize,
    /// MAINTENANCE's open-loop band: `maintenance_open_floor < open <=
    /// maintenance_open_ceiling`.
    pub maintenance_open_floor: usize,
    pub maintenance_open_ceiling: usize,
}

impl Default for RouterThresholds {
    fn default() -> Self {
        Self {
            closure_ratio_floor: 0.15,
            closure_open_ceiling: 20,
            maintenance_open_floor: 10,
            maintenance_open_ceiling: 20,
        }
    }
}
