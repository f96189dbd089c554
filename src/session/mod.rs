//! One terminal session: boot, then the interactive command loop.
//!
//! The session owns the once-only flags and hands them to the player, the
//! boot controller and the command loop, so no state lives in globals.

mod boot;
mod command_loop;
mod flags;
mod script;

pub use boot::{BootController, BootPath, BootStage};
pub use command_loop::{CommandLoop, Flow, LoopExit, INPUT_SETTLE, REDIRECT_DELAY};
pub use flags::SessionFlags;
pub use script::{
    fallback_messages, initial_messages, system_messages, BootStep, BootTimings, AWAITING_PROMPT,
    BOOT_STEPS,
};

use std::sync::Arc;

use crate::effects::{Links, Sound, Visuals};
use crate::input::InputEvents;
use crate::player::{Cancelled, MessagePlayer, Pacer};
use crate::screen::{Banner, SharedScreen};
use crate::shell::LoadOutcome;

/// The optional collaborators of a session.
#[derive(Debug, Clone, Default)]
pub struct Collaborators {
    pub sound: Sound,
    pub visuals: Visuals,
    pub links: Links,
}

#[derive(Debug)]
pub struct Session {
    player: Arc<MessagePlayer>,
    boot: BootController,
    commands: CommandLoop,
}

impl Session {
    /// Build a session over `screen` from a loaded command document.
    ///
    /// Load notices are posted to the screen right away and the banner is
    /// set from the document's site name.
    pub fn new(
        screen: SharedScreen,
        outcome: LoadOutcome,
        collaborators: Collaborators,
        pacer: Pacer,
        timings: BootTimings,
    ) -> Self {
        let LoadOutcome {
            document, notices, ..
        } = outcome;
        screen.lock().banner = Banner::for_site(&document.site);

        let player = Arc::new(MessagePlayer::new(
            screen,
            collaborators.sound,
            SessionFlags::new(),
            pacer,
        ));
        for notice in &notices {
            player.post(notice);
        }

        let boot = BootController::new(
            player.clone(),
            collaborators.visuals.clone(),
            timings,
        );
        let commands = CommandLoop::new(
            player.clone(),
            document.table,
            collaborators.visuals,
            collaborators.links,
        );
        Self {
            player,
            boot,
            commands,
        }
    }

    pub fn flags(&self) -> &SessionFlags {
        self.player.flags()
    }

    pub fn boot(&self) -> &BootController {
        &self.boot
    }

    pub fn player(&self) -> &MessagePlayer {
        &self.player
    }

    /// Run the boot sequence, then commands until `exit` or end of input.
    pub async fn run(&self, input: &mut InputEvents) -> Result<LoopExit, Cancelled> {
        let path = self.boot.run(input).await?;
        // Keys pressed while the narrative played were typed at a hidden prompt
        let mut discarded = 0;
        while input.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!("discarded {} keys typed during boot", discarded);
        }
        tracing::debug!("entering command loop after {:?} boot", path);
        self.commands.run(input).await
    }
}
