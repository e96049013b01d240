//! Ingestion sink abstraction for trace-sync.
//!
//! The ingest worker hands off everything it consumes through the
//! [`SpanSink`] trait: decoded spans via `accept`, still-encoded payloads via
//! `accept_encoded`. Two implementations ship here:
//!
//! - [`MemorySink`] - in-process buffers, for tests and embedding
//! - [`JsonLinesSink`] - one JSON object per line to any async writer

pub mod jsonl;
pub mod memory;
pub mod traits;

pub use jsonl::JsonLinesSink;
pub use memory::MemorySink;
pub use traits::SpanSink;
