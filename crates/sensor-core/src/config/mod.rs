//! Layered configuration: built-in defaults, overridden by an optional
//! `sensor.toml`, overridden again by environment variables. Env always wins
//! (spec §6).

mod defaults;
mod router_config;
mod scoring_config;

pub use router_config::RouterThresholds;
pub use scoring_config::{ClassificationThresholds, ScoringWeights};

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::SensorResult;

/// Fully resolved configuration for one refresh (or CLI invocation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Path to the message corpus (a SQLite file or a JSONL snapshot).
    pub corpus_path: PathBuf,
    /// Directory the pipeline writes its output artifacts into.
    pub artifacts_dir: PathBuf,
    /// Embedding model identifier. `"tfidf-fallback"` selects the
    /// dependency-free deterministic fallback provider explicitly.
    pub model_id: String,
    /// Filesystem path to the ONNX model file backing `model_id`, when
    /// `model_id` is not `"tfidf-fallback"`. Unused by the fallback
    /// provider.
    pub onnx_model_path: Option<PathBuf>,
    /// Number of open loops the loop detector emits.
    pub loop_top_k: usize,
    /// Number of k-means clusters the topic clusterer targets.
    pub cluster_k: usize,
    /// Linear fusion weights and keyword constants (spec §9: these must be
    /// configurable, not hard-coded, so the policy can be tuned without a
    /// code change).
    pub scoring: ScoringWeights,
    /// `intent_similarity` classification band thresholds.
    pub classification: ClassificationThresholds,
    /// Router mode-selection threshold table.
    pub router: RouterThresholds,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from(defaults::DEFAULT_CORPUS_PATH),
            artifacts_dir: PathBuf::from(defaults::DEFAULT_ARTIFACTS_DIR),
            model_id: defaults::DEFAULT_MODEL_ID.to_string(),
            onnx_model_path: None,
            loop_top_k: constants::DEFAULT_LOOP_TOP_K,
            cluster_k: constants::DEFAULT_CLUSTER_K,
            scoring: ScoringWeights::default(),
            classification: ClassificationThresholds::default(),
            router: RouterThresholds::default(),
        }
    }
}

impl SensorConfig {
    /// Load configuration: defaults, layered with an optional `sensor.toml`
    /// in `config_dir`, layered again with environment variables.
    pub fn load(config_dir: &Path) -> SensorResult<Self> {
        let mut config = Self::default();

        let toml_path = config_dir.join("sensor.toml");
        if toml_path.exists() {
            let text =
                std::fs::read_to_string(&toml_path).map_err(|e| crate::errors::SensorError::CorpusError {
                    reason: format!("failed to read {}: {e}", toml_path.display()),
                })?;
            config = toml::from_str(&text).map_err(|e| crate::errors::SensorError::CorpusError {
                reason: format!("failed to parse {}: {e}", toml_path.display()),
            })?;
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Applies the environment variables documented in spec §6. Env always
    /// takes precedence over the file and the built-in defaults.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("CORPUS_PATH") {
            self.corpus_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("MODEL_ID") {
            self.model_id = v;
        }
        if let Ok(v) = env::var("MODEL_PATH") {
            self.onnx_model_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("LOOP_TOP_K") {
            if let Ok(parsed) = v.parse() {
                self.loop_top_k = parsed;
            }
        }
        if let Ok(v) = env::var("CLUSTER_K") {
            if let Ok(parsed) = v.parse() {
                self.cluster_k = parsed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = SensorConfig::default();
        assert_eq!(config.loop_top_k, 15);
        assert_eq!(config.cluster_k, 10);
        assert_eq!(config.model_id, defaults::DEFAULT_MODEL_ID);
    }

    #[test]
    fn env_overrides_win_over_defaults() {
        env::set_var("LOOP_TOP_K", "7");
        let mut config = SensorConfig::default();
        config.apply_env_overrides();
        env::remove_var("LOOP_TOP_K");
        assert_eq!(config.loop_top_k, 7);
    }
}
