//! Kafka consumer worker for trace-sync.
//!
//! One worker polls a set of Kafka topics, classifies each message's encoding
//! from its leading bytes, decodes or forwards the payload, and hands the
//! result to a [`span_sink::SpanSink`]. A malformed message never terminates
//! the loop: per-message failures are counted and skipped.
//!
//! # Features
//!
//! - Leading-byte format classification without a full parse
//! - Failure isolation: decode errors are dropped and counted, not raised
//! - Partition-assignment tracking via the consumer group rebalance protocol
//! - Clean shutdown: an interrupt during polling exits the loop without error
//!   and releases the consumer exactly once

/// Raw-message batch polling seam
///
/// Implemented by the rdkafka-backed [`KafkaSource`] in production and by
/// in-memory sources in tests.
pub mod source;

/// rdkafka consumer wrapper and rebalance wiring
pub mod consumer;

pub mod error;
pub mod format;
pub mod message;
pub mod metrics;
pub mod partitions;
pub mod sync;
pub mod worker;

// Re-export main types for easy access
pub use consumer::{ConsumerConfig, KafkaSource};
pub use error::{Error, Result};
pub use format::{classify, MessageFormat};
pub use message::RawMessage;
pub use metrics::CollectorMetrics;
pub use partitions::{PartitionTracker, TopicPartition};
pub use source::MessageSource;
pub use sync::{run_ingest, Config};
pub use worker::{Worker, WorkerConfig};
