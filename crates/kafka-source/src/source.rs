//! Message source trait.

use crate::error::Result;
use crate::message::RawMessage;
use std::time::Duration;

/// Where the worker pulls batches of raw messages from.
///
/// The production implementation is [`crate::KafkaSource`]; tests drive the
/// worker with in-memory sources instead of a broker.
#[async_trait::async_trait]
pub trait MessageSource: Send + Sync {
    /// Wait up to `wait` for a first message, then drain whatever else is
    /// immediately available, up to `max` messages total.
    ///
    /// An empty batch is normal and means nothing arrived within the wait.
    /// An `Err` is a source-level failure, not a bad message; the worker
    /// treats it as fatal.
    async fn poll(&self, max: usize, wait: Duration) -> Result<Vec<RawMessage>>;

    /// Release the underlying connection.
    ///
    /// The worker calls this exactly once, on every exit path.
    fn close(&self);
}
