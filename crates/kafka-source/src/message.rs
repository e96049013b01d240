//! Raw message type.

/// A raw message taken off the queue, before classification.
///
/// Topic, partition and offset are carried for diagnostics only; the decode
/// path looks at nothing but the payload bytes.
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// Message value bytes (empty when the record had a null payload)
    pub payload: Vec<u8>,
    /// Kafka topic name
    pub topic: String,
    /// Kafka partition number
    pub partition: i32,
    /// Kafka offset within the partition
    pub offset: i64,
}

impl RawMessage {
    /// Convenience constructor for tests and embedders.
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            topic: String::new(),
            partition: 0,
            offset: 0,
        }
    }
}
