//! ONNX Runtime embedding provider.
//!
//! Loads a local ONNX sentence-embedding model via the `ort` crate (v2).
//! Spec §4.2 does not mandate which model; this implementation documents
//! its choice in DESIGN.md: a 384-dim local MiniLM-family model, mean-pooled
//! and L2-normalized. No network call is ever made — the model file must
//! already be on disk (spec §1 Non-goals: "no network calls").

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use sensor_core::constants::EMBEDDING_DIMENSIONS;
use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::traits::EmbeddingProvider;

/// ONNX-based embedding provider.
///
/// Wraps an ort `Session` and handles tokenization, inference, and
/// mean-pooling of the output tensor into a fixed 384-dim unit vector.
pub struct OnnxProvider {
    /// `Session::run` needs `&mut self`; the trait requires `&self`, so the
    /// session lives behind a mutex.
    session: Mutex<Session>,
    model_id: String,
}

// Safety: `Session` is `Send` but not `Sync`; the mutex provides `Sync`.
unsafe impl Sync for OnnxProvider {}

impl OnnxProvider {
    /// Loads an ONNX model from `model_path`. `ModelUnavailable` on any
    /// failure — the caller decides whether to fall back, this provider
    /// never substitutes itself.
    pub fn load(model_path: &str, model_id: String) -> SensorResult<Self> {
        let path = Path::new(model_path);
        if !path.exists() {
            return Err(SensorError::ModelUnavailable {
                model_id,
                reason: format!("model file not found at {model_path}"),
            });
        }

        let session = Session::builder()
            .and_then(|b| b.with_intra_threads(2))
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| SensorError::ModelUnavailable {
                model_id: model_id.clone(),
                reason: e.to_string(),
            })?;

        debug!(model_id = %model_id, dims = EMBEDDING_DIMENSIONS, "ONNX model loaded");

        Ok(Self {
            session: Mutex::new(session),
            model_id,
        })
    }

    fn infer(&self, text: &str) -> SensorResult<Vec<f32>> {
        let token_ids = Self::simple_tokenize(text);
        let seq_len = token_ids.len();

        let input_ids: Vec<i64> = token_ids.iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = vec![1i64; seq_len];

        let ids_tensor = Tensor::from_array((vec![1i64, seq_len as i64], input_ids)).map_err(|e| {
            SensorError::ModelUnavailable {
                model_id: self.model_id.clone(),
                reason: format!("tensor creation failed: {e}"),
            }
        })?;
        let mask_tensor = Tensor::from_array((vec![1i64, seq_len as i64], attention_mask)).map_err(|e| {
            SensorError::ModelUnavailable {
                model_id: self.model_id.clone(),
                reason: format!("tensor creation failed: {e}"),
            }
        })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| SensorError::ModelUnavailable {
                model_id: self.model_id.clone(),
                reason: format!("session lock poisoned: {e}"),
            })?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor])
            .map_err(|e| SensorError::ModelUnavailable {
                model_id: self.model_id.clone(),
                reason: e.to_string(),
            })?;

        let (_name, output) = outputs.iter().next().ok_or_else(|| SensorError::ModelUnavailable {
            model_id: self.model_id.clone(),
            reason: "no output tensor".to_string(),
        })?;

        let (shape, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| SensorError::ModelUnavailable {
                model_id: self.model_id.clone(),
                reason: format!("tensor extraction failed: {e}"),
            })?;

        let mut pooled = if shape.len() == 3 {
            // [batch=1, seq, dims] — mean pool over the sequence axis.
            let seq = shape[1] as usize;
            let dims = shape[2] as usize;
            let mut pooled = vec![0.0f32; dims];
            for s in 0..seq {
                for d in 0..dims {
                    pooled[d] += data[s * dims + d];
                }
            }
            for v in &mut pooled {
                *v /= seq as f32;
            }
            pooled
        } else if shape.len() == 2 {
            // [batch=1, dims] — already pooled.
            let dims = shape[1] as usize;
            data[..dims].to_vec()
        } else {
            return Err(SensorError::ModelUnavailable {
                model_id: self.model_id.clone(),
                reason: format!("unexpected output shape: {shape:?}"),
            });
        };

        let norm: f32 = pooled.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut pooled {
                *v /= norm;
            }
        }

        if pooled.len() != EMBEDDING_DIMENSIONS {
            return Err(SensorError::DimensionMismatch {
                expected: EMBEDDING_DIMENSIONS,
                actual: pooled.len(),
            });
        }

        Ok(pooled)
    }

    /// Deterministic bag-of-hashed-tokens tokenizer. A real deployment
    /// swaps this for the model's shipped tokenizer; the hashing scheme
    /// keeps `(model_id, text) -> vector` reproducible in its absence.
    fn simple_tokenize(text: &str) -> Vec<u32> {
        if text.is_empty() {
            return vec![101, 102];
        }
        let mut ids = vec![101u32];
        for word in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.is_empty() {
                continue;
            }
            let mut h: u32 = 0x811c_9dc5;
            for b in word.to_lowercase().as_bytes() {
                h ^= *b as u32;
                h = h.wrapping_mul(0x0100_0193);
            }
            ids.push(1 + (h % 29_999));
        }
        ids.push(102);
        ids
    }
}

impl EmbeddingProvider for OnnxProvider {
    fn embed(&self, text: &str) -> SensorResult<Vec<f32>> {
        self.infer(text)
    }

    fn embed_batch(&self, texts: &[String]) -> SensorResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.infer(t)).collect()
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn is_available(&self) -> bool {
        true
    }
}
