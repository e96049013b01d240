//! Kafka span ingest entrypoint.
//!
//! Builds the consumer, installs the interrupt handler, and runs the worker
//! until shutdown.

use crate::consumer::{ConsumerConfig, KafkaSource};
use crate::error::Result;
use crate::metrics::CollectorMetrics;
use crate::partitions::PartitionTracker;
use crate::worker::{Worker, WorkerConfig};
use clap::Parser;
use span_sink::SpanSink;
use span_types::SpanDecoder;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

/// Configuration for the Kafka span ingest worker.
#[derive(Debug, Clone, Parser)]
pub struct Config {
    /// Kafka brokers (comma-separated or multiple --brokers)
    #[clap(long, value_delimiter = ',', required = true)]
    pub brokers: Vec<String>,
    /// Consumer group ID
    #[clap(long, default_value = "trace-sync")]
    pub group_id: String,
    /// Topics to consume from (comma-separated)
    #[clap(long)]
    pub topics: String,
    /// JSON object field that carries the encoded payload for wrapped
    /// messages
    #[clap(long, default_value = "message")]
    pub json_field: String,
    /// Maximum number of messages to take from Kafka per poll
    #[clap(long, default_value_t = 500)]
    pub batch_size: usize,
    /// Bounded wait for the first message of each poll, in milliseconds
    #[clap(long, default_value_t = 1000)]
    pub poll_wait_ms: u64,
    /// Auto offset reset strategy ("earliest" or "latest")
    #[clap(long, default_value = "earliest")]
    pub auto_offset_reset: String,
    /// Session timeout in milliseconds
    #[clap(long, default_value = "30000")]
    pub session_timeout_ms: String,
}

/// Run the ingest worker until interrupted.
///
/// The worker is generic over the decoder and sink, so all per-message calls
/// are statically dispatched after monomorphization.
pub async fn run_ingest<D, S>(
    config: Config,
    decoder: D,
    sink: S,
    metrics: CollectorMetrics,
) -> Result<()>
where
    D: SpanDecoder,
    S: SpanSink,
{
    info!(
        "Starting Kafka span ingest from topics {} (group {})",
        config.topics, config.group_id
    );

    let tracker = Arc::new(PartitionTracker::new());
    let consumer_config = ConsumerConfig {
        brokers: config.brokers.join(","),
        group_id: config.group_id.clone(),
        topics: config.topics.clone(),
        auto_offset_reset: config.auto_offset_reset.clone(),
        session_timeout_ms: config.session_timeout_ms.clone(),
        ..Default::default()
    };
    let source = KafkaSource::new(consumer_config, Arc::clone(&tracker))?;

    let worker_config = WorkerConfig {
        json_field: config.json_field.clone(),
        batch_size: config.batch_size,
        poll_wait: Duration::from_millis(config.poll_wait_ms),
    };
    let shutdown = setup_shutdown_handler();
    let worker = Worker::new(worker_config, source, decoder, sink, metrics.clone(), shutdown);
    worker.run().await?;

    info!(
        "Ingest stopped: {} messages seen, {} dropped, {} bytes decoded in-process",
        metrics.messages(),
        metrics.messages_dropped(),
        metrics.bytes()
    );
    Ok(())
}

/// Sets up a shutdown signal handler
fn setup_shutdown_handler() -> broadcast::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        info!("Received interrupt signal (Ctrl+C)");
        let _ = shutdown_tx.send(());
    });

    shutdown_rx
}
