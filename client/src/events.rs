use tokio::sync::{broadcast, mpsc};
use tracing::warn;

const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Per-subscriber stream over a broadcast feed.
///
/// A spawned task drains the broadcast receiver into a private channel so
/// a slow subscriber only loses its own messages: lag is logged and
/// skipped rather than terminating the stream. Dropping the subscription
/// aborts the forwarding task.
pub struct Subscription<T: Clone + Send + 'static> {
    receiver: mpsc::Receiver<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Clone + Send + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self._handle.abort();
    }
}

impl<T: Clone + Send + 'static> Subscription<T> {
    pub(crate) fn new(mut source: broadcast::Receiver<T>) -> Self {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);

        let handle = tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            break; // Receiver dropped
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("subscriber lagged behind, skipped {} events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            receiver: rx,
            _handle: handle,
        }
    }

    /// Receive the next event from the stream.
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.recv().await
    }
}

impl<T: Clone + Send + 'static> futures_util::Stream for Subscription<T> {
    type Item = T;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
