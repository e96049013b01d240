//! Leading-byte classification of raw queue messages.
//!
//! Producers have historically written three encodings to the span topics,
//! and their framing conventions happen to be disjoint in the value range of
//! the first byte. Classification therefore needs no parse: one or two bytes
//! decide which decoder applies, which keeps the cost of discarding garbage
//! low at high message rates. Adversarial inputs can misclassify; that is
//! accepted behavior, and the downstream decoder rejects what the sniffer
//! got wrong.

/// First byte of the structured-envelope encoding: tag of a length-delimited
/// field 1. Existing producers depend on this value; do not change it.
pub const ENVELOPE_FIELD_TAG: u8 = 10;

/// Legacy framing byte that marks a span *list* rather than a single span.
pub const LEGACY_LIST_MARKER: u8 = 12;

/// Highest type byte the legacy single-span framing starts with.
pub const LEGACY_TYPE_MAX: u8 = 16;

/// ASCII `{`, the start of a JSON object wrapper.
pub const JSON_OBJECT_OPEN: u8 = 123;

/// Which decoding path applies to a raw message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFormat {
    /// Too short to classify; dropped without decoding.
    Undersized,
    /// Historical binary encoding of exactly one span.
    LegacySingleSpan,
    /// Self-describing encoding; the detecting decoder picks the sub-format.
    StructuredEnvelope,
    /// JSON object carrying the real payload in a named field.
    JsonFieldWrapped,
}

/// Classify a message by its leading bytes. Pure; never fails.
pub fn classify(bytes: &[u8]) -> MessageFormat {
    // Two bytes are needed to recognize the envelope signature.
    if bytes.len() < 2 {
        return MessageFormat::Undersized;
    }
    // Envelope: field-1 tag followed by a varint length, which is never zero
    // for a non-empty field.
    if bytes[0] == ENVELOPE_FIELD_TAG && bytes[1] != 0 {
        return MessageFormat::StructuredEnvelope;
    }
    if bytes[0] <= LEGACY_TYPE_MAX && bytes[0] != LEGACY_LIST_MARKER {
        return MessageFormat::LegacySingleSpan;
    }
    if bytes[0] == JSON_OBJECT_OPEN {
        return MessageFormat::JsonFieldWrapped;
    }
    MessageFormat::StructuredEnvelope
}
