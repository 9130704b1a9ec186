//! # sensor-embeddings
//!
//! The Embedding Index (spec §4.2): a provider abstraction over a local
//! ONNX sentence-embedding model with a deterministic TF-IDF fallback, an L1
//! in-memory cache in front of `sensor-storage`'s persisted index, and the
//! `ensure`/`batch_ensure`/`get`/`all`/`drop_by_model` operations spec §4.2
//! names.

pub mod cache;
pub mod engine;
pub mod providers;

pub use engine::EmbeddingIndex;
pub use providers::{create_provider, OnnxProvider, TfIdfFallback};
