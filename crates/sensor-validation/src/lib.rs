//! # sensor-validation
//!
//! The Contract Validator & Projection Builder (spec §4.10): per-artifact
//! shapes, plain-function contract checks, and the validate-then-atomic-
//! write helper every refresh writer goes through.

pub mod artifacts;
pub mod contracts;
pub mod writer;

pub use writer::{write_cognitive_state, write_daily_payload, write_daily_projection, write_directive_text, write_loops};
