//! Cooperative cancellation for in-flight sends.

use std::sync::Arc;

use tokio::sync::watch;

/// Cancels one send. Cloning shares the same signal.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Creates a receiver that can be awaited.
    #[must_use]
    pub fn receiver(&self) -> CancellationReceiver {
        CancellationReceiver {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaitable side of a [`CancellationToken`].
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationReceiver {
    /// Completes when the token is cancelled.
    ///
    /// Never completes if every token is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if self.receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    /// Returns true if the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_receiver() {
        let token = CancellationToken::new();
        let mut receiver = token.receiver();
        assert!(!receiver.is_cancelled());

        let waiter = tokio::spawn(async move { receiver.cancelled().await });
        token.cancel();
        assert!(
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .is_ok()
        );
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_receiver_created_after_cancel_completes() {
        let token = CancellationToken::new();
        token.cancel();
        let mut receiver = token.receiver();
        receiver.cancelled().await;
        assert!(receiver.is_cancelled());
    }

    #[tokio::test]
    async fn test_dropped_token_never_cancels() {
        let token = CancellationToken::new();
        let mut receiver = token.receiver();
        drop(token);
        let result =
            tokio::time::timeout(Duration::from_millis(20), receiver.cancelled()).await;
        assert!(result.is_err());
    }
}
