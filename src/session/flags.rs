//! Once-only session flags.

use std::sync::Arc;

use tokio::sync::watch;

/// The `started` and `completed` flags of one session.
///
/// Both start false and are never reset. Clones share the same flags, so the
/// boot controller, the fallback guard, the player and the command loop all
/// see one state.
#[derive(Debug, Clone)]
pub struct SessionFlags {
    started: Arc<watch::Sender<bool>>,
    completed: Arc<watch::Sender<bool>>,
}

impl SessionFlags {
    pub fn new() -> Self {
        Self {
            started: Arc::new(watch::channel(false).0),
            completed: Arc::new(watch::channel(false).0),
        }
    }

    /// Claim the startup sequence.
    ///
    /// Atomic check-and-set: exactly one caller ever gets `true`, no matter
    /// how many paths race for it.
    pub fn try_claim_startup(&self) -> bool {
        self.started.send_if_modified(|started| {
            if *started {
                false
            } else {
                *started = true;
                true
            }
        })
    }

    pub fn is_started(&self) -> bool {
        *self.started.borrow()
    }

    /// Resolves once someone has claimed the startup sequence.
    pub async fn wait_started(&self) {
        let mut rx = self.started.subscribe();
        let _ = rx.wait_for(|started| *started).await;
    }

    /// Mark the startup narrative as finished. Idempotent.
    pub fn mark_completed(&self) {
        let was = self.completed.send_replace(true);
        if !was {
            tracing::debug!("session completed, output pruning enabled");
        }
    }

    pub fn is_completed(&self) -> bool {
        *self.completed.borrow()
    }

    /// Resolves once the interactive stage has been reached.
    pub async fn wait_completed(&self) {
        let mut rx = self.completed.subscribe();
        let _ = rx.wait_for(|completed| *completed).await;
    }
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self::new()
    }
}
