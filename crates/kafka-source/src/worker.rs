//! The polling loop.
//!
//! Polls the source in bounded batches, classifies every message, and
//! dispatches it: legacy single-span payloads are decoded in-process, JSON
//! wrappers are unwrapped, everything else goes to the sink still encoded.
//! Per-message failures are counted and skipped; only source-level failures
//! end the loop. The source is released exactly once on every exit path.

use crate::error::Result;
use crate::format::{classify, MessageFormat};
use crate::message::RawMessage;
use crate::metrics::CollectorMetrics;
use crate::source::MessageSource;
use span_sink::SpanSink;
use span_types::{DecoderHint, Span, SpanDecoder};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Knobs for the polling loop.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// JSON object field that carries the encoded payload for wrapped
    /// messages
    pub json_field: String,
    /// Maximum messages per poll
    pub batch_size: usize,
    /// Bounded wait for the first message of each poll
    pub poll_wait: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            json_field: "message".to_string(),
            batch_size: 500,
            poll_wait: Duration::from_secs(1),
        }
    }
}

/// Consumes raw messages from a source until shut down.
pub struct Worker<Q, D, S> {
    config: WorkerConfig,
    source: Q,
    decoder: D,
    sink: S,
    metrics: CollectorMetrics,
    shutdown: broadcast::Receiver<()>,
}

impl<Q, D, S> Worker<Q, D, S>
where
    Q: MessageSource,
    D: SpanDecoder,
    S: SpanSink,
{
    pub fn new(
        config: WorkerConfig,
        source: Q,
        decoder: D,
        sink: S,
        metrics: CollectorMetrics,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            config,
            source,
            decoder,
            sink,
            metrics,
            shutdown,
        }
    }

    /// Run until the shutdown channel fires or the source fails.
    ///
    /// Shutdown during a poll is the normal exit and returns `Ok`. Whatever
    /// the outcome, the source is closed exactly once before returning.
    pub async fn run(mut self) -> Result<()> {
        info!("Starting polling loop");
        let result = self.poll_loop().await;
        match &result {
            Ok(()) => info!("Polling loop stopped"),
            Err(e) => error!("Unexpected error in polling loop: {e}"),
        }
        self.source.close();
        result
    }

    async fn poll_loop(&mut self) -> Result<()> {
        loop {
            let batch = tokio::select! {
                _ = self.shutdown.recv() => {
                    info!("Shutdown signal received");
                    return Ok(());
                }
                polled = self.source.poll(self.config.batch_size, self.config.poll_wait) => {
                    polled?
                }
            };
            debug!("Poll returned batch of {} messages", batch.len());
            for message in &batch {
                self.process_message(message).await;
            }
        }
    }

    /// Classify and dispatch one message. Infallible by construction: every
    /// failure path ends in a counter or a log line, so one bad message can
    /// never take the loop down.
    async fn process_message(&self, message: &RawMessage) {
        self.metrics.increment_messages();
        let bytes = &message.payload;
        match classify(bytes) {
            MessageFormat::Undersized => self.metrics.increment_messages_dropped(),
            MessageFormat::LegacySingleSpan => {
                self.metrics.increment_bytes(bytes.len() as u64);
                match self.decoder.decode_span(bytes) {
                    Ok(span) => self.forward_spans(vec![span]).await,
                    // Counter only: malformed traffic must not flood the log.
                    Err(_) => self.metrics.increment_messages_dropped(),
                }
            }
            MessageFormat::JsonFieldWrapped => self.process_json_wrapped(message).await,
            MessageFormat::StructuredEnvelope => self.forward_encoded(bytes.clone()).await,
        }
    }

    async fn process_json_wrapped(&self, message: &RawMessage) {
        let fields: HashMap<String, String> = match serde_json::from_slice(&message.payload) {
            Ok(fields) => fields,
            Err(_) => {
                self.metrics.increment_messages_dropped();
                return;
            }
        };
        match fields.get(&self.config.json_field) {
            Some(value) => self.forward_encoded(value.clone().into_bytes()).await,
            None => {
                // Dropped but deliberately not counted, unlike decode
                // failures; dashboards built on the drop counter rely on the
                // distinction.
                warn!(
                    "JSON message missing field {}: {}",
                    self.config.json_field,
                    String::from_utf8_lossy(&message.payload)
                );
            }
        }
    }

    // Sink completion is fire-and-forget on both forwarding paths.

    async fn forward_spans(&self, spans: Vec<Span>) {
        if let Err(e) = self.sink.accept(spans).await {
            debug!("Sink rejected spans: {e:#}");
        }
    }

    async fn forward_encoded(&self, payload: Vec<u8>) {
        if let Err(e) = self.sink.accept_encoded(payload, DecoderHint::Detecting).await {
            debug!("Sink rejected encoded payload: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use span_sink::MemorySink;
    use span_types::DecodeError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Decoder that accepts exactly one payload and rejects the rest.
    struct KeyedDecoder {
        accepted: Vec<u8>,
    }

    impl SpanDecoder for KeyedDecoder {
        fn decode_span(&self, bytes: &[u8]) -> span_types::Result<Span> {
            if bytes == self.accepted {
                Ok(Span::new("trace", "span", "decoded"))
            } else {
                Err(DecodeError::Malformed("not the accepted payload".into()))
            }
        }
    }

    /// Source that serves scripted batches, then signals shutdown and blocks.
    struct ScriptedSource {
        batches: Mutex<VecDeque<Vec<RawMessage>>>,
        fail_after_batches: bool,
        done: broadcast::Sender<()>,
        closed: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl MessageSource for ScriptedSource {
        async fn poll(&self, _max: usize, _wait: Duration) -> Result<Vec<RawMessage>> {
            let mut batches = self.batches.lock().await;
            match batches.pop_front() {
                Some(batch) => Ok(batch),
                None if self.fail_after_batches => {
                    Err(Error::Consumer("broker went away".to_string()))
                }
                None => {
                    let _ = self.done.send(());
                    drop(batches);
                    std::future::pending().await
                }
            }
        }

        fn close(&self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Run {
        result: Result<()>,
        metrics: CollectorMetrics,
        sink: MemorySink,
        closed: Arc<AtomicUsize>,
    }

    async fn run_worker(batches: Vec<Vec<RawMessage>>, decoder: KeyedDecoder) -> Run {
        run_worker_with(batches, decoder, false).await
    }

    async fn run_worker_with(
        batches: Vec<Vec<RawMessage>>,
        decoder: KeyedDecoder,
        fail_after_batches: bool,
    ) -> Run {
        let (done, shutdown) = broadcast::channel(1);
        let closed = Arc::new(AtomicUsize::new(0));
        let source = ScriptedSource {
            batches: Mutex::new(batches.into()),
            fail_after_batches,
            done,
            closed: Arc::clone(&closed),
        };
        let metrics = CollectorMetrics::new();
        let sink = MemorySink::new();
        let config = WorkerConfig {
            json_field: "myfield".to_string(),
            ..Default::default()
        };
        let worker = Worker::new(
            config,
            source,
            decoder,
            sink.clone(),
            metrics.clone(),
            shutdown,
        );
        Run {
            result: worker.run().await,
            metrics,
            sink,
            closed,
        }
    }

    fn rejecting_decoder() -> KeyedDecoder {
        KeyedDecoder { accepted: vec![] }
    }

    #[tokio::test]
    async fn undersized_messages_are_dropped_and_counted() {
        let run = run_worker(
            vec![vec![RawMessage::new(vec![]), RawMessage::new(vec![7])]],
            rejecting_decoder(),
        )
        .await;
        assert!(run.result.is_ok());
        assert_eq!(run.metrics.messages(), 2);
        assert_eq!(run.metrics.messages_dropped(), 2);
        assert!(run.sink.spans().await.is_empty());
        assert!(run.sink.encoded().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_legacy_message_does_not_stop_the_batch() {
        let good = vec![5u8, 5];
        let run = run_worker(
            vec![vec![
                RawMessage::new(vec![1, 0]),
                RawMessage::new(good.clone()),
            ]],
            KeyedDecoder { accepted: good },
        )
        .await;
        assert_eq!(run.metrics.messages(), 2);
        assert_eq!(run.metrics.messages_dropped(), 1);
        // Both payloads hit the in-process decoder, so both count as bytes.
        assert_eq!(run.metrics.bytes(), 4);
        let spans = run.sink.spans().await;
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "decoded");
    }

    #[tokio::test]
    async fn envelope_payloads_are_forwarded_with_detecting_hint() {
        let run = run_worker(
            vec![vec![
                RawMessage::new(vec![10, 1, 42]),
                RawMessage::new(vec![200, 200]),
            ]],
            rejecting_decoder(),
        )
        .await;
        assert_eq!(run.metrics.messages_dropped(), 0);
        assert_eq!(run.metrics.bytes(), 0);
        assert_eq!(
            run.sink.encoded().await,
            vec![
                (vec![10, 1, 42], DecoderHint::Detecting),
                (vec![200, 200], DecoderHint::Detecting),
            ]
        );
    }

    #[tokio::test]
    async fn envelope_tag_with_zero_length_takes_the_legacy_path() {
        let run = run_worker(vec![vec![RawMessage::new(vec![10, 0])]], rejecting_decoder()).await;
        assert_eq!(run.metrics.bytes(), 2);
        assert_eq!(run.metrics.messages_dropped(), 1);
        assert!(run.sink.encoded().await.is_empty());
    }

    #[tokio::test]
    async fn json_field_value_is_forwarded_as_bytes() {
        let run = run_worker(
            vec![vec![RawMessage::new(&br#"{"myfield":"abcXYZ"}"#[..])]],
            rejecting_decoder(),
        )
        .await;
        assert_eq!(run.metrics.messages_dropped(), 0);
        assert_eq!(
            run.sink.encoded().await,
            vec![(b"abcXYZ".to_vec(), DecoderHint::Detecting)]
        );
    }

    #[tokio::test]
    async fn missing_json_field_is_dropped_without_counting() {
        let run = run_worker(
            vec![vec![
                RawMessage::new(&br#"{"other":"x"}"#[..]),
                RawMessage::new(vec![10, 1]),
            ]],
            rejecting_decoder(),
        )
        .await;
        // The drop counter stays untouched for this path; only the warn log
        // records it. The next message in the batch still processes.
        assert_eq!(run.metrics.messages(), 2);
        assert_eq!(run.metrics.messages_dropped(), 0);
        assert_eq!(run.sink.encoded().await.len(), 1);
    }

    #[tokio::test]
    async fn unparseable_json_is_dropped_and_counted() {
        let run = run_worker(
            vec![vec![RawMessage::new(&b"{not json"[..])]],
            rejecting_decoder(),
        )
        .await;
        assert_eq!(run.metrics.messages_dropped(), 1);
        assert!(run.sink.encoded().await.is_empty());
    }

    #[tokio::test]
    async fn shutdown_during_poll_exits_cleanly_and_closes_once() {
        let run = run_worker(vec![], rejecting_decoder()).await;
        assert!(run.result.is_ok());
        assert_eq!(run.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn source_failure_propagates_but_still_closes_once() {
        let run = run_worker_with(
            vec![vec![RawMessage::new(vec![10, 1])]],
            rejecting_decoder(),
            true,
        )
        .await;
        assert!(run.result.is_err());
        assert_eq!(run.closed.load(Ordering::SeqCst), 1);
        // The batch before the failure was still processed.
        assert_eq!(run.sink.encoded().await.len(), 1);
    }
}
