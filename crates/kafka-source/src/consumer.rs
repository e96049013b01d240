//! rdkafka consumer wrapper.
//!
//! Owns the `StreamConsumer` and keeps the [`PartitionTracker`] in sync with
//! the consumer group's rebalance protocol through a custom consumer context.

use crate::error::{Error, Result};
use crate::message::RawMessage;
use crate::partitions::{PartitionTracker, TopicPartition};
use crate::source::MessageSource;
use rdkafka::client::ClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer as RdkafkaConsumer, ConsumerContext, Rebalance, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Message as RdkafkaMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

/// How long to keep draining already-buffered messages after the first one
/// of a batch arrived.
const DRAIN_WAIT: Duration = Duration::from_millis(10);

/// Configuration for the Kafka consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Kafka brokers (comma-separated list)
    pub brokers: String,
    /// Consumer group ID
    pub group_id: String,
    /// Topics to consume from (comma-separated list)
    pub topics: String,
    /// Auto offset reset strategy ("earliest" or "latest")
    pub auto_offset_reset: String,
    /// Session timeout in milliseconds
    pub session_timeout_ms: String,
    /// Enable auto commit
    ///
    /// True by default: the worker delivers at-most-once per poll cycle and
    /// leaves commit timing to the client.
    pub enable_auto_commit: bool,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            group_id: "trace-sync".to_string(),
            topics: "".to_string(),
            auto_offset_reset: "earliest".to_string(),
            session_timeout_ms: "30000".to_string(),
            enable_auto_commit: true,
        }
    }
}

/// Consumer context that mirrors rebalance events into the tracker.
///
/// rdkafka invokes these callbacks on its own path, interleaved with polling;
/// the tracker's whole-value swap keeps readers consistent.
struct TrackingContext {
    tracker: Arc<PartitionTracker>,
}

impl ClientContext for TrackingContext {}

impl ConsumerContext for TrackingContext {
    fn post_rebalance(&self, rebalance: &Rebalance<'_>) {
        match rebalance {
            Rebalance::Assign(tpl) => {
                let partitions: Vec<TopicPartition> = tpl
                    .elements()
                    .iter()
                    .map(|elem| TopicPartition::new(elem.topic(), elem.partition()))
                    .collect();
                info!("Partitions assigned: {partitions:?}");
                self.tracker.on_assigned(partitions);
            }
            Rebalance::Revoke(_) => {
                info!("Partitions revoked");
                self.tracker.on_revoked();
            }
            Rebalance::Error(e) => warn!("Rebalance error: {e}"),
        }
    }
}

/// Kafka-backed message source.
pub struct KafkaSource {
    consumer: StreamConsumer<TrackingContext>,
    tracker: Arc<PartitionTracker>,
}

impl KafkaSource {
    /// Create a consumer and subscribe to the configured topics.
    pub fn new(config: ConsumerConfig, tracker: Arc<PartitionTracker>) -> Result<Self> {
        let topics: Vec<&str> = config
            .topics
            .split(',')
            .map(str::trim)
            .filter(|topic| !topic.is_empty())
            .collect();
        if topics.is_empty() {
            return Err(Error::InvalidConfig("no topics configured".to_string()));
        }

        let context = TrackingContext {
            tracker: Arc::clone(&tracker),
        };
        let consumer: StreamConsumer<TrackingContext> = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", config.enable_auto_commit.to_string())
            .set("auto.offset.reset", &config.auto_offset_reset)
            .set("session.timeout.ms", &config.session_timeout_ms)
            .set("enable.partition.eof", "false")
            .create_with_context(context)
            .map_err(|e| Error::Consumer(format!("Failed to create consumer: {e}")))?;

        consumer
            .subscribe(&topics)
            .map_err(|e| Error::Consumer(format!("Failed to subscribe to topics: {e}")))?;

        Ok(Self { consumer, tracker })
    }

    /// Snapshot of the partitions this consumer currently owns.
    pub fn assigned_partitions(&self) -> Arc<Vec<TopicPartition>> {
        self.tracker.snapshot()
    }

    fn raw_message(msg: &BorrowedMessage<'_>) -> RawMessage {
        RawMessage {
            // A null payload becomes an empty one and is classified as
            // undersized downstream.
            payload: msg.payload().map(<[u8]>::to_vec).unwrap_or_default(),
            topic: msg.topic().to_string(),
            partition: msg.partition(),
            offset: msg.offset(),
        }
    }
}

#[async_trait::async_trait]
impl MessageSource for KafkaSource {
    async fn poll(&self, max: usize, wait: Duration) -> Result<Vec<RawMessage>> {
        let mut messages = Vec::new();

        // Bounded wait for the first message; timing out with an empty batch
        // is the idle-topic case, not an error.
        match timeout(wait, self.consumer.recv()).await {
            Ok(Ok(msg)) => messages.push(Self::raw_message(&msg)),
            Ok(Err(e)) => return Err(Error::Kafka(e)),
            Err(_) => return Ok(messages),
        }

        // Drain whatever the client already has buffered.
        while messages.len() < max {
            match timeout(DRAIN_WAIT, self.consumer.recv()).await {
                Ok(Ok(msg)) => messages.push(Self::raw_message(&msg)),
                Ok(Err(e)) => return Err(Error::Kafka(e)),
                Err(_) => break,
            }
        }

        Ok(messages)
    }

    fn close(&self) {
        self.consumer.unsubscribe();
        info!("Kafka consumer closed");
    }
}
