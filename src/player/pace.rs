//! Cancellable timing for the output scheduler.
//!
//! Every suspension point of a reveal or a boot stage goes through a
//! [`Pacer`]. Triggering the shared [`Shutdown`] makes all pending and future
//! waits return [`Cancelled`], so nothing schedules another step after
//! teardown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Returned by any scheduler wait once shutdown has been triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("output scheduling was cancelled")]
pub struct Cancelled;

/// Shared shutdown switch.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Stop all scheduling. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once shutdown has been triggered.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so this only errors if it was dropped.
        let _ = rx.wait_for(|down| *down).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Sleeps that give up as soon as shutdown is triggered.
#[derive(Debug, Clone, Default)]
pub struct Pacer {
    shutdown: Shutdown,
}

impl Pacer {
    pub fn new(shutdown: Shutdown) -> Self {
        Self { shutdown }
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.shutdown
    }

    /// Wait for `duration`, or fail with `Cancelled` on shutdown.
    pub async fn wait(&self, duration: Duration) -> Result<(), Cancelled> {
        self.guard(tokio::time::sleep(duration)).await
    }

    /// Run `fut` to completion unless shutdown is triggered first.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        if self.shutdown.is_triggered() {
            return Err(Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.shutdown.triggered() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }
}
