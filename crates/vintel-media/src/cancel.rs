//! Cooperative cancellation.
//!
//! A run holds an optional `watch::Receiver<bool>`; flipping the sender to
//! `true` makes the next checkpoint return [`MediaError::Cancelled`].

use tokio::sync::watch;

use crate::error::{MediaError, MediaResult};

/// Cancellation checkpoint shared by the pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn none() -> Self {
        Self { rx: None }
    }

    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Create a linked sender/signal pair.
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self::new(rx))
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolve once cancellation is requested. Never resolves for
    /// [`CancelSignal::none`] or when the sender is dropped without firing.
    pub async fn cancelled(&self) {
        let Some(mut rx) = self.rx.clone() else {
            return std::future::pending().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }

    /// Return `Cancelled` if cancellation was requested.
    pub fn check(&self) -> MediaResult<()> {
        if self.is_cancelled() {
            Err(MediaError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl From<watch::Receiver<bool>> for CancelSignal {
    fn from(rx: watch::Receiver<bool>) -> Self {
        Self::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_never_cancels() {
        assert!(CancelSignal::none().check().is_ok());
    }

    #[test]
    fn test_channel_cancels() {
        let (tx, signal) = CancelSignal::channel();
        assert!(signal.check().is_ok());

        tx.send(true).unwrap();
        assert!(matches!(signal.check(), Err(MediaError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_send() {
        let (tx, signal) = CancelSignal::channel();
        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.cancelled().await }
        });

        tx.send(true).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("cancelled() should resolve")
            .unwrap();
    }
}
