mod onnx_provider;
mod tfidf_fallback;

pub use onnx_provider::OnnxProvider;
pub use tfidf_fallback::TfIdfFallback;

use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::traits::EmbeddingProvider;

/// Resolves `model_id` to a provider instance.
///
/// `"tfidf-fallback"` explicitly selects the dependency-free deterministic
/// provider (spec §4.2: this is a documented choice, not an automatic
/// substitution). Any other id is treated as an ONNX model path/name; if it
/// cannot be loaded this returns `ModelUnavailable` rather than silently
/// falling back — callers that want the fallback ask for it by name.
pub fn create_provider(model_id: &str, onnx_model_path: Option<&str>) -> SensorResult<Box<dyn EmbeddingProvider>> {
    if model_id == "tfidf-fallback" {
        return Ok(Box::new(TfIdfFallback::new(model_id.to_string())));
    }

    let path = onnx_model_path.ok_or_else(|| SensorError::ModelUnavailable {
        model_id: model_id.to_string(),
        reason: "no ONNX model path configured".to_string(),
    })?;

    let provider = OnnxProvider::load(path, model_id.to_string())?;
    Ok(Box::new(provider))
}
