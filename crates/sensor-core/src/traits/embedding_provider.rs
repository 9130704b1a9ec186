use crate::errors::SensorResult;

/// A fixed text-to-vector backend. Spec §4.2's embedding contract: the same
/// `(model_id, text)` must always yield the same vector, and the vector must
/// be a meaningful semantic-proximity space, not a token-frequency
/// projection dressed up as one.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a dense vector of `dimensions()`
    /// floats.
    fn embed(&self, text: &str) -> SensorResult<Vec<f32>>;

    /// Embed a batch of texts. Implementations may process these more
    /// efficiently than repeated single-item calls, but must return results
    /// in the same order as `texts`.
    fn embed_batch(&self, texts: &[String]) -> SensorResult<Vec<Vec<f32>>>;

    /// Dimensionality this provider produces.
    fn dimensions(&self) -> usize;

    /// Identifier persisted as `Embedding::model_id`.
    fn model_id(&self) -> &str;

    /// Whether this provider is currently usable.
    fn is_available(&self) -> bool;
}
