use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Downstream behavior gate produced by the router (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Closure,
    Maintenance,
    Build,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closure => "CLOSURE",
            Self::Maintenance => "MAINTENANCE",
            Self::Build => "BUILD",
        }
    }
}

/// Risk level attached to a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    High,
    Medium,
    Low,
}

impl Risk {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// The router's pure output: mode + primary action + rationale + risk
/// (spec §3, §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
    pub mode: Mode,
    pub primary_action: String,
    pub rationale: String,
    pub risk: Risk,
    pub build_allowed: bool,
    pub generated_at: NaiveDate,
}
