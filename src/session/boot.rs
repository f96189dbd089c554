//! Boot sequence
//!
//! Two paths race for the startup sequence:
//!
//! - the primary path waits for a key press, runs the progress bar, hands
//!   over to the effects and then plays the two narrative sets
//! - the fallback path wakes up after a fixed timeout and, if nobody has
//!   started yet, plays a short narrative set instead
//!
//! Both claim `started` through one atomic check-and-set, so exactly one of
//! them plays. The primary path's waits are raced against "started was
//! claimed", so it stops at its next suspension point when it loses.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::script::{
    fallback_messages, initial_messages, system_messages, BootTimings, AWAITING_PROMPT, BOOT_STEPS,
};
use crate::effects::Visuals;
use crate::input::InputEvents;
use crate::player::{Cancelled, MessagePlayer};

/// Stages of the boot sequence, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BootStage {
    AwaitingInput,
    Progressing,
    HandoffToEffects,
    MessagePlayback,
    Interactive,
}

/// Which path ended up owning the startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPath {
    Primary,
    Fallback,
}

pub struct BootController {
    player: Arc<MessagePlayer>,
    visuals: Visuals,
    timings: BootTimings,
    stage: watch::Sender<BootStage>,
}

impl BootController {
    pub fn new(player: Arc<MessagePlayer>, visuals: Visuals, timings: BootTimings) -> Self {
        Self {
            player,
            visuals,
            timings,
            stage: watch::channel(BootStage::AwaitingInput).0,
        }
    }

    pub fn stage(&self) -> BootStage {
        *self.stage.borrow()
    }

    /// Watch stage changes.
    pub fn subscribe(&self) -> watch::Receiver<BootStage> {
        self.stage.subscribe()
    }

    /// Run the boot sequence until the terminal is interactive.
    pub async fn run(&self, input: &mut InputEvents) -> Result<BootPath, Cancelled> {
        // A path that lost the claim never resolves; the winner ends the race
        let primary = async {
            match self.primary(input).await {
                Ok(Some(path)) => Ok(path),
                Ok(None) => std::future::pending().await,
                Err(e) => Err(e),
            }
        };
        let fallback = async {
            match self.fallback().await {
                Ok(Some(path)) => Ok(path),
                Ok(None) => std::future::pending().await,
                Err(e) => Err(e),
            }
        };

        let path = tokio::select! {
            path = primary => path,
            path = fallback => path,
        }?;
        tracing::info!("boot finished via {:?} path", path);
        Ok(path)
    }

    /// Claim the startup sequence and play it.
    ///
    /// Returns false without doing anything when the sequence has already
    /// been claimed.
    pub async fn start_messages(&self) -> Result<bool, Cancelled> {
        if !self.player.flags().try_claim_startup() {
            tracing::debug!("startup sequence already claimed");
            return Ok(false);
        }
        self.enter(BootStage::MessagePlayback);
        let pacer = self.player.pacer();

        pacer.wait(self.timings.initial_delay).await?;
        self.player.play_all(initial_messages()).await?;
        pacer.wait(self.timings.stage_delay).await?;
        self.player.play_all(system_messages()).await?;

        self.enter_interactive().await?;
        Ok(true)
    }

    /// Final stage: mark the session completed and show the input line.
    pub async fn enter_interactive(&self) -> Result<(), Cancelled> {
        self.player
            .pacer()
            .wait(self.timings.interactive_delay)
            .await?;
        self.player.flags().mark_completed();
        self.player.screen().lock().show_input();
        self.enter(BootStage::Interactive);
        Ok(())
    }

    async fn primary(&self, input: &mut InputEvents) -> Result<Option<BootPath>, Cancelled> {
        self.enter(BootStage::AwaitingInput);
        self.player.screen().lock().boot_waiting(AWAITING_PROMPT);
        if self.unless_claimed(first_activation(input)).await?.is_none() {
            return Ok(None);
        }
        self.player.sound().activate();

        self.enter(BootStage::Progressing);
        for (n, step) in BOOT_STEPS.iter().enumerate() {
            self.player
                .screen()
                .lock()
                .boot_progress(step.progress, step.status);
            tracing::debug!("boot step {}: {}", n + 1, step.status);
            if !self.sleep_unless_claimed(step.delay).await? {
                return Ok(None);
            }
        }

        self.enter(BootStage::HandoffToEffects);
        if !self.sleep_unless_claimed(self.timings.settle).await? {
            return Ok(None);
        }
        self.player.screen().lock().boot.fading = true;
        if !self.sleep_unless_claimed(self.timings.fade).await? {
            return Ok(None);
        }
        self.player.screen().lock().hide_boot();
        self.player.sound().try_confirm();
        if !self.sleep_unless_claimed(self.timings.effects_delay).await? {
            return Ok(None);
        }
        let pacer = self.player.pacer();
        match self
            .unless_claimed(self.visuals.try_reset_and_settle(pacer))
            .await?
        {
            Some(settled) => settled?,
            None => return Ok(None),
        }

        Ok(self.start_messages().await?.then_some(BootPath::Primary))
    }

    async fn fallback(&self) -> Result<Option<BootPath>, Cancelled> {
        self.player
            .pacer()
            .wait(self.timings.fallback_timeout)
            .await?;
        if !self.player.flags().try_claim_startup() {
            return Ok(None);
        }
        tracing::warn!(
            "boot did not start within {:?}, forcing fallback start",
            self.timings.fallback_timeout
        );

        self.player.screen().lock().hide_boot();
        self.enter(BootStage::MessagePlayback);
        self.player.play_all(fallback_messages()).await?;
        self.enter_interactive().await?;
        Ok(Some(BootPath::Fallback))
    }

    /// Run `fut` unless the startup sequence gets claimed first.
    async fn unless_claimed<F: Future>(&self, fut: F) -> Result<Option<F::Output>, Cancelled> {
        let flags = self.player.flags();
        if flags.is_started() {
            return Ok(None);
        }
        self.player
            .pacer()
            .guard(async {
                tokio::select! {
                    biased;
                    _ = flags.wait_started() => None,
                    out = fut => Some(out),
                }
            })
            .await
    }

    /// Sleep; false when the startup sequence was claimed meanwhile.
    async fn sleep_unless_claimed(&self, duration: Duration) -> Result<bool, Cancelled> {
        Ok(self
            .unless_claimed(tokio::time::sleep(duration))
            .await?
            .is_some())
    }

    fn enter(&self, stage: BootStage) {
        let previous = self.stage.send_replace(stage);
        if previous != stage {
            tracing::info!("boot stage {:?} -> {:?}", previous, stage);
        }
    }
}

impl std::fmt::Debug for BootController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootController")
            .field("stage", &self.stage())
            .field("timings", &self.timings)
            .finish()
    }
}

/// Wait for the first key press or click. A closed channel never resolves.
async fn first_activation(input: &mut InputEvents) {
    if input.recv().await.is_none() {
        std::future::pending::<()>().await;
    }
}
