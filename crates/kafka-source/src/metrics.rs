//! Ingest counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counters for the ingest worker.
///
/// Cheap to clone; all clones share state, so the caller can keep a handle
/// for reporting while the worker increments. The worker itself never reads
/// the counters back.
#[derive(Debug, Clone, Default)]
pub struct CollectorMetrics {
    messages: Arc<AtomicU64>,
    bytes: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl CollectorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one message taken off the queue, valid or not.
    pub fn increment_messages(&self) {
        self.messages.fetch_add(1, Ordering::Relaxed);
    }

    /// Count payload bytes handed to the in-process decoder.
    pub fn increment_bytes(&self, count: u64) {
        self.bytes.fetch_add(count, Ordering::Relaxed);
    }

    /// Count one message discarded without reaching the sink.
    pub fn increment_messages_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn messages(&self) -> u64 {
        self.messages.load(Ordering::Relaxed)
    }

    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    pub fn messages_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
