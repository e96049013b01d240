//! SpanSink trait definition.

use anyhow::Result;
use span_types::{DecoderHint, Span};

/// Trait for the downstream ingestion pipeline.
///
/// The worker treats delivery as fire-and-forget: it logs a failed `Result`
/// at debug level and keeps consuming. Implementations that need delivery
/// guarantees (retries, buffering, backpressure) provide them internally.
///
/// # Usage Pattern
///
/// The worker is generic over the sink for zero-cost dispatch:
///
/// ```ignore
/// pub async fn run_ingest<D: SpanDecoder, S: SpanSink>(
///     config: Config,
///     decoder: D,
///     sink: S,
/// ) -> Result<()> {
///     // All sink calls here are statically dispatched after monomorphization
///     sink.accept(spans).await?;
/// }
/// ```
#[async_trait::async_trait]
pub trait SpanSink: Send + Sync {
    /// Accept spans that were already decoded in-process.
    async fn accept(&self, spans: Vec<Span>) -> Result<()>;

    /// Accept a still-encoded payload together with the decoder it requires.
    ///
    /// The sink (or whatever it forwards to) owns the actual decoding; the
    /// worker only classifies.
    async fn accept_encoded(&self, payload: Vec<u8>, hint: DecoderHint) -> Result<()>;
}
