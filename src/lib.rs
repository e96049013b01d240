//! trace-sync
//!
//! A single-worker ingester for trace spans published to Kafka. Messages on
//! the span topics arrive in three encodings that are distinguishable from
//! their leading bytes; the worker classifies each message without parsing
//! it, decodes the historical single-span encoding in-process, and forwards
//! everything else to the downstream sink still encoded, tagged with the
//! decoder it requires.
//!
//! # Features
//!
//! - Failure isolation: one malformed message never stops consumption
//! - Partition-assignment tracking through the consumer group rebalance
//!   protocol, readable at any time without locking
//! - Clean shutdown on interrupt, releasing the consumer exactly once
//!
//! # CLI Usage
//!
//! ```bash
//! # Consume two topics and print ingested output as JSON lines
//! trace-sync --brokers localhost:9092 --topics spans,spans-legacy
//!
//! # Unwrap JSON-wrapped payloads from a custom field, write to a file
//! trace-sync --brokers localhost:9092 --topics spans \
//!   --json-field payload --out ingested.jsonl
//! ```

// Re-export the workspace crates for convenience
pub use span_sink as sink;
pub use span_types as types;
pub use trace_sync_kafka_source as kafka;
