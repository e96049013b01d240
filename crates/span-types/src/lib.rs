//! Shared types for trace-sync.
//!
//! This crate defines the span record produced by decoders and consumed by
//! sinks, plus the decoder contract itself. Both the kafka-source crate and
//! the span-sink crate depend on these definitions; neither depends on the
//! other.

pub mod decoder;
pub mod error;
pub mod span;

// Re-export main types for convenient access
pub use decoder::{DecoderHint, NoLegacyDecoder, SpanDecoder};
pub use error::{DecodeError, Result};
pub use span::Span;
