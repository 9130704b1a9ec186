//! `sensor` — CLI entrypoint for the cognitive sensor core (spec §6, §7).

mod bootstrap;
mod cli;
mod commands;

use std::path::Path;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sensor_core::config::SensorConfig;
use sensor_core::errors::SensorError;

fn main() {
    init_tracing();

    let cli = cli::Cli::parse();
    let config = match SensorConfig::load(Path::new(".")) {
        Ok(config) => config,
        Err(err) => fail(&err),
    };

    let result = match &cli.command {
        cli::Commands::Refresh => commands::refresh::run(&config).map(|report| {
            println!(
                "refresh complete: {} conversations, {} embeddings computed, {} reused, {} warning(s)",
                report.conversations_seen,
                report.embeddings_computed,
                report.embeddings_reused,
                report.warnings.len()
            );
        }),
        cli::Commands::InitEmbeddings => commands::init_embeddings::run(&config).map(|newly_embedded| {
            println!("init-embeddings complete: {newly_embedded} embedding(s) computed");
        }),
        cli::Commands::Search { query } => commands::search::run(&config, query).map(|hits| {
            let rows: Vec<serde_json::Value> = hits
                .iter()
                .map(|hit| {
                    serde_json::json!({
                        "conversation_id": hit.conversation_id,
                        "title": hit.title,
                        "similarity": hit.similarity,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows).unwrap_or_default());
        }),
        cli::Commands::Cluster => commands::cluster::run(&config).map(|clusters| {
            println!("{}", serde_json::to_string_pretty(&clusters).unwrap_or_default());
        }),
    };

    if let Err(err) = result {
        fail(&err);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Writes the single-line error summary spec §7 requires and exits with
/// the category's mapped code.
fn fail(err: &SensorError) -> ! {
    eprintln!("sensor: error: {err}");
    std::process::exit(err.exit_code());
}
