//! Decoder contract.
//!
//! The ingest worker decodes the historical single-span binary encoding
//! in-process through the [`SpanDecoder`] trait; every other encoding is
//! forwarded to the sink together with a [`DecoderHint`] naming the decoder
//! the downstream pipeline should apply.

use crate::error::{DecodeError, Result};
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Names the decoder a forwarded payload requires downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderHint {
    /// Self-describing payload; the decoder detects the exact sub-format.
    Detecting,
    /// Historical binary encoding carrying exactly one span per message.
    LegacySingleSpan,
}

/// Decodes one span from the historical single-span binary encoding.
///
/// Implementations must fail on malformed input rather than produce a
/// partial span; the worker counts failures and moves on.
pub trait SpanDecoder: Send + Sync {
    fn decode_span(&self, bytes: &[u8]) -> Result<Span>;
}

/// Decoder for deployments with no remaining legacy producers.
///
/// Rejects every payload, so messages in the legacy encoding are counted as
/// dropped. Deployments that still receive legacy traffic wire a real codec
/// through [`SpanDecoder`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLegacyDecoder;

impl SpanDecoder for NoLegacyDecoder {
    fn decode_span(&self, _bytes: &[u8]) -> Result<Span> {
        Err(DecodeError::Unsupported(
            "legacy single-span codec not configured".to_string(),
        ))
    }
}
