//! Command-line interface for trace-sync
//!
//! # Usage Examples
//!
//! ```bash
//! # Consume the spans topic, print ingested output to stdout
//! trace-sync --brokers localhost:9092 --topics spans
//!
//! # Multiple topics, custom wrapped-payload field, output to a file
//! trace-sync --brokers kafka-1:9092,kafka-2:9092 \
//!   --topics spans,spans-legacy \
//!   --json-field payload \
//!   --out ingested.jsonl
//! ```

use clap::Parser;
use span_sink::JsonLinesSink;
use span_types::NoLegacyDecoder;
use trace_sync_kafka_source::{run_ingest, CollectorMetrics, Config};
use tracing::info;

#[derive(Parser)]
#[command(name = "trace-sync")]
#[command(about = "Ingests trace spans from Kafka into a downstream sink")]
#[command(long_about = None)]
struct Cli {
    /// Kafka consumer options
    #[command(flatten)]
    source: Config,

    /// Where to write ingested output as JSON lines ("-" for stdout)
    #[arg(long, default_value = "-")]
    out: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let metrics = CollectorMetrics::new();

    // No legacy codec ships in this binary; deployments that still receive
    // the historical single-span encoding embed the library with their own
    // decoder instead.
    info!("Legacy single-span decoding disabled; such messages are dropped and counted");

    match cli.out.as_str() {
        "-" => {
            let sink = JsonLinesSink::new(tokio::io::stdout());
            run_ingest(cli.source, NoLegacyDecoder, sink, metrics).await?;
        }
        path => {
            let file = tokio::fs::File::create(path).await?;
            let sink = JsonLinesSink::new(file);
            run_ingest(cli.source, NoLegacyDecoder, sink, metrics).await?;
        }
    }

    Ok(())
}
