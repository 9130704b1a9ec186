use std::time::Duration;

/// Ambient diagnostic summary of one refresh run. Not a contract artifact:
/// it exists purely for the `tracing` summary event at the end of `refresh`,
/// never persisted or validated.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub conversations_seen: usize,
    pub embeddings_computed: usize,
    pub embeddings_reused: usize,
    pub warnings: Vec<String>,
    pub duration: Duration,
}

impl RefreshReport {
    pub fn new() -> Self {
        Self {
            conversations_seen: 0,
            embeddings_computed: 0,
            embeddings_reused: 0,
            warnings: Vec::new(),
            duration: Duration::ZERO,
        }
    }
}

impl Default for RefreshReport {
    fn default() -> Self {
        Self::new()
    }
}
