//! Queue playback.
//!
//! `play_all` reveals the messages of a queue strictly one after another:
//! each message gets a fresh entry on the screen, rings the keystroke sound
//! if it asks for it, is fully revealed, and is followed by a fixed pause
//! (except the last one). Whole queues are serialized, so two callers never
//! interleave their reveals on the screen.

use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;

use super::message::{Message, MessageQueue};
use super::pace::{Cancelled, Pacer};
use super::typewriter::Typewriter;
use crate::effects::Sound;
use crate::screen::SharedScreen;
use crate::session::SessionFlags;

/// Pause between two messages of the same queue.
pub const MESSAGE_PAUSE: Duration = Duration::from_millis(300);

/// Plays message queues onto the shared screen.
#[derive(Debug)]
pub struct MessagePlayer {
    screen: SharedScreen,
    typewriter: Typewriter,
    sound: Sound,
    flags: SessionFlags,
    pacer: Pacer,
    /// Held for the duration of one queue
    turn: AsyncMutex<()>,
}

impl MessagePlayer {
    pub fn new(screen: SharedScreen, sound: Sound, flags: SessionFlags, pacer: Pacer) -> Self {
        Self {
            screen,
            typewriter: Typewriter::new(pacer.clone()),
            sound,
            flags,
            pacer,
            turn: AsyncMutex::new(()),
        }
    }

    pub fn screen(&self) -> &SharedScreen {
        &self.screen
    }

    pub fn sound(&self) -> &Sound {
        &self.sound
    }

    pub fn flags(&self) -> &SessionFlags {
        &self.flags
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// True when no queue is playing.
    pub fn is_idle(&self) -> bool {
        self.typewriter.is_idle() && self.turn.try_lock().is_ok()
    }

    /// Play every message of `queue` in order.
    ///
    /// Resolves with the number of messages revealed once the last reveal
    /// has completed. An empty queue resolves immediately.
    pub async fn play_all(&self, queue: MessageQueue) -> Result<usize, Cancelled> {
        if queue.is_empty() {
            return Ok(0);
        }

        let _turn = self.pacer.guard(self.turn.lock()).await?;
        let total = queue.len();
        for (index, message) in queue.into_iter().enumerate() {
            self.play_one(&message).await?;
            if index + 1 < total {
                self.pacer.wait(MESSAGE_PAUSE).await?;
            }
        }
        Ok(total)
    }

    /// Add a message that is shown in full at once, without a reveal.
    pub fn post(&self, message: &Message) {
        let prune = self.flags.is_completed();
        self.screen
            .lock()
            .push_text(message.style, &message.text, prune);
    }

    async fn play_one(&self, message: &Message) -> Result<(), Cancelled> {
        // Never trim the backlog while the startup narrative is running
        let prune = self.flags.is_completed();
        let id = self.screen.lock().push_entry(message.style, prune);

        if message.play_sound {
            self.sound.try_keystroke();
        }

        tracing::trace!(style = message.style.name(), "revealing {:?}", message.text);
        let target = self.screen.entry_target(id);
        self.typewriter.reveal(&target, &message.text).await?;
        Ok(())
    }
}
