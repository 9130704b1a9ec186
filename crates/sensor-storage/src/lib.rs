//! # sensor-storage
//!
//! Read-only access to the message corpus, persistence for the embedding
//! index and cached user vocabulary, the closure registry reader, and the
//! atomic write helper every artifact writer shares.

pub mod atomic_write;
pub mod closure_registry;
pub mod corpus;
pub mod index_store;
pub mod refresh_lock;

pub use atomic_write::write_atomically;
pub use closure_registry::read_closure_registry;
pub use corpus::{JsonlCorpus, SqliteCorpus};
pub use index_store::IndexStore;
pub use refresh_lock::{acquire as acquire_refresh_lock, RefreshLockGuard};
