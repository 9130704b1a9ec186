//! # sensor-core
//!
//! Foundation crate for the cognitive sensor. Defines all types, traits,
//! errors, config, and constants. Every other crate in the workspace depends
//! on this one.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::SensorConfig;
pub use errors::{SensorError, SensorResult};
pub use models::{
    ClassificationBand, Closure, ClosureOutcome, ClosureRegistry, ClosureStats, Cluster,
    Conversation, Directive, Embedding, LoopCandidate, Message, MessageRole, Mode, RefreshReport,
    Risk,
};
