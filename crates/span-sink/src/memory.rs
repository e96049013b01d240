//! In-memory sink.

use crate::traits::SpanSink;
use anyhow::Result;
use span_types::{DecoderHint, Span};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Sink that buffers everything in memory.
///
/// Cheap to clone; all clones share the same buffers, so a test can keep a
/// handle while the worker owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    spans: Arc<Mutex<Vec<Span>>>,
    encoded: Arc<Mutex<Vec<(Vec<u8>, DecoderHint)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spans accepted so far.
    pub async fn spans(&self) -> Vec<Span> {
        self.spans.lock().await.clone()
    }

    /// Encoded payloads accepted so far, with their decoder hints.
    pub async fn encoded(&self) -> Vec<(Vec<u8>, DecoderHint)> {
        self.encoded.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SpanSink for MemorySink {
    async fn accept(&self, spans: Vec<Span>) -> Result<()> {
        self.spans.lock().await.extend(spans);
        Ok(())
    }

    async fn accept_encoded(&self, payload: Vec<u8>, hint: DecoderHint) -> Result<()> {
        self.encoded.lock().await.push((payload, hint));
        Ok(())
    }
}
