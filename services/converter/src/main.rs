//! Telemetry conversion service.
//!
//! Loads a channel schema, streams decoded records from a JSON-lines
//! feed, assembles them into CF-style variable series, and writes the
//! handoff document for the external metadata writer.

mod feed;
mod writer;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use channel_schema::Registry;
use record_assembler::{Session, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "converter")]
#[command(about = "Convert decoded sensor telemetry into a CF-style dataset document")]
struct Args {
    /// Channel schema file (YAML)
    #[arg(short, long)]
    schema: String,

    /// Decoded record feed (JSON lines), "-" for stdin
    #[arg(short, long, default_value = "-")]
    records: String,

    /// Output path for the dataset document, "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Abort on the first unknown type ID instead of skipping
    #[arg(long)]
    strict: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = Registry::from_path(&args.schema)
        .with_context(|| format!("loading channel schema from {}", args.schema))?;
    info!(channels = registry.len(), schema = %args.schema, "loaded channel schema");

    let mut session = Session::new(Arc::new(registry), SessionConfig { strict: args.strict });

    let stats = feed::run(&mut session, &args.records).await?;
    info!(
        accepted = stats.accepted,
        skipped = stats.skipped,
        "record feed exhausted"
    );

    let dataset = session.finish();
    if !dataset.unknown_ids.is_empty() {
        warn!(
            skipped = dataset.unknown_ids.skipped_records,
            ids = ?dataset.unknown_ids.hex_ids(),
            "records without a schema entry were dropped; extend the channel schema to capture them"
        );
    }

    writer::write_dataset(dataset, &args.output)?;
    info!(
        variables = dataset.variables.len(),
        output = %args.output,
        "wrote dataset document"
    );

    Ok(())
}
