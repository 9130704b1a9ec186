//! Top-level argument parser for the `sensor` binary (spec §6).

use clap::{Parser, Subcommand};

/// The cognitive sensor: batch refresh pipeline and query surface over a
/// conversation corpus.
#[derive(Debug, Parser)]
#[command(name = "sensor", version, about = "Cognitive Sensor — open-loop detector and mode router")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline: embeddings, scoring, loop detection, closure
    /// statistics, routing, and contract-validated artifact writes.
    Refresh,
    /// One-shot embedding backfill for every conversation missing one.
    /// Idempotent.
    InitEmbeddings,
    /// Embed `query` and return the top-20 conversations by cosine
    /// similarity to it.
    Search {
        /// Free-text query.
        query: String,
    },
    /// Run the topic clusterer and emit a cluster summary.
    Cluster,
}
