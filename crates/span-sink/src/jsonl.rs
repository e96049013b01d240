//! JSON-lines sink.
//!
//! Writes one JSON object per line to any async writer: decoded spans as-is,
//! forwarded payloads as `{"hint": ..., "payload": "<base64>"}` so arbitrary
//! bytes survive the text encoding.

use crate::traits::SpanSink;
use anyhow::Result;
use base64::Engine;
use serde::Serialize;
use span_types::{DecoderHint, Span};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// One output line for a payload the worker forwarded without decoding.
#[derive(Serialize)]
struct EncodedLine {
    hint: DecoderHint,
    payload: String,
}

/// Sink that appends JSON lines to an async writer.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    async fn write_line(&self, line: Vec<u8>) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Unpin + Send> SpanSink for JsonLinesSink<W> {
    async fn accept(&self, spans: Vec<Span>) -> Result<()> {
        for span in &spans {
            self.write_line(serde_json::to_vec(span)?).await?;
        }
        Ok(())
    }

    async fn accept_encoded(&self, payload: Vec<u8>, hint: DecoderHint) -> Result<()> {
        let line = EncodedLine {
            hint,
            payload: base64::engine::general_purpose::STANDARD.encode(&payload),
        };
        self.write_line(serde_json::to_vec(&line)?).await
    }
}
