//! Error taxonomy for the cognitive sensor.
//!
//! One flat enum rather than the teacher's per-crate error split: the core
//! pipeline here is a single linear refresh, not a multi-subsystem memory
//! store, so every component shares one vocabulary of failure modes and one
//! exit-code mapping (spec §7).

/// Result alias used throughout the workspace.
pub type SensorResult<T> = Result<T, SensorError>;

/// All failure modes a refresh (or any core operation) can surface.
///
/// Propagation policy: errors bubble to the refresh entry point and
/// terminate the run. None of these are swallowed mid-pipeline; the only
/// non-fatal condition (an empty user-text conversation) is logged as a
/// warning, never constructed as a `SensorError`.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("conversation not found: {conversation_id}")]
    NotFound { conversation_id: String },

    #[error("corpus error: {reason}")]
    CorpusError { reason: String },

    #[error("embedding model unavailable: {model_id}: {reason}")]
    ModelUnavailable { model_id: String, reason: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(
        "embedding index is stale: {missing} conversation(s) have no embedding for model {model_id}"
    )]
    IndexStale { model_id: String, missing: usize },

    #[error("contract violation for {artifact}: {details}")]
    ContractViolation { artifact: String, details: String },

    #[error("refresh already in progress (held by pid {pid})")]
    RefreshInProgress { pid: u32 },
}

impl SensorError {
    /// Maps this error to the process exit code documented in spec §6/§7.
    ///
    /// Error kinds spec.md §6 does not assign a dedicated code to
    /// (`NotFound`, `DimensionMismatch`, `IndexStale`) fall back to the
    /// generic failure code 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            SensorError::ContractViolation { .. } => 2,
            SensorError::ModelUnavailable { .. } => 3,
            SensorError::CorpusError { .. } => 4,
            SensorError::RefreshInProgress { .. } => 5,
            SensorError::NotFound { .. }
            | SensorError::DimensionMismatch { .. }
            | SensorError::IndexStale { .. } => 1,
        }
    }
}
