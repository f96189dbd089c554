//! Interactive command loop
//!
//! Reads the prompt line, runs commands and reveals their output. The input
//! line is hidden from the moment a line is submitted until its output has
//! been fully revealed and a short settle delay has passed; keys pressed in
//! between are dropped.

use std::sync::Arc;
use std::time::Duration;

use crate::effects::{Links, Visuals};
use crate::input::{InputEvent, InputEvents};
use crate::player::{Cancelled, Message, MessagePlayer, MessageQueue};
use crate::shell::{BuiltinAction, CommandKind, CommandTable};

/// Delay before the input line comes back after a command.
pub const INPUT_SETTLE: Duration = Duration::from_millis(200);

/// Delay before a redirect opens its link.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The `exit` action ran
    Exited,
    /// The input channel was closed
    InputClosed,
}

/// Whether to keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct CommandLoop {
    player: Arc<MessagePlayer>,
    table: CommandTable,
    visuals: Visuals,
    links: Links,
}

impl CommandLoop {
    pub fn new(
        player: Arc<MessagePlayer>,
        table: CommandTable,
        visuals: Visuals,
        links: Links,
    ) -> Self {
        Self {
            player,
            table,
            visuals,
            links,
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Handle input until `exit` runs or the input channel closes.
    pub async fn run(&self, input: &mut InputEvents) -> Result<LoopExit, Cancelled> {
        loop {
            let Some(event) = self.player.pacer().guard(input.recv()).await? else {
                return Ok(LoopExit::InputClosed);
            };
            self.player.sound().activate();

            let line = {
                let mut screen = self.player.screen().lock();
                if !screen.input_visible() {
                    continue;
                }
                match event {
                    InputEvent::Char(c) => {
                        screen.input.buffer.push(c);
                        None
                    }
                    InputEvent::Backspace => {
                        screen.input.buffer.pop();
                        None
                    }
                    InputEvent::Enter => Some(screen.take_input()),
                    InputEvent::OtherKey | InputEvent::Click => None,
                }
            };

            match line {
                Some(line) => {
                    if self.submit(&line).await? == Flow::Exit {
                        return Ok(LoopExit::Exited);
                    }
                    // Anything typed while the input line was hidden is dropped
                    while input.try_recv().is_ok() {}
                }
                None if matches!(event, InputEvent::Char(_) | InputEvent::Backspace) => {
                    self.player.sound().try_keystroke();
                }
                None => {}
            }
        }
    }

    /// Run one submitted line.
    ///
    /// The input line is hidden while the echo and the output are revealed
    /// and shown again 200ms after the last reveal, unless the command was
    /// `exit`.
    pub async fn submit(&self, line: &str) -> Result<Flow, Cancelled> {
        self.player.sound().try_confirm();
        let command = line.trim().to_lowercase();
        if command.is_empty() {
            return Ok(Flow::Continue);
        }

        let echo = {
            let mut screen = self.player.screen().lock();
            screen.hide_input();
            format!("{}{}", screen.prompt, command)
        };
        self.player
            .play_all(MessageQueue::single(Message::prompt(echo)))
            .await?;

        let flow = self.execute(&command).await?;
        if flow == Flow::Exit {
            self.player.screen().lock().terminated = true;
            tracing::info!("session terminated by exit");
            return Ok(Flow::Exit);
        }

        self.player.pacer().wait(INPUT_SETTLE).await?;
        let mut screen = self.player.screen().lock();
        screen.input.buffer.clear();
        screen.show_input();
        Ok(Flow::Continue)
    }

    async fn execute(&self, command: &str) -> Result<Flow, Cancelled> {
        let Some(found) = self.table.get(command) else {
            tracing::info!("command not found: {}", command);
            self.play([
                Message::error(format!("Command not found: {}", command)),
                Message::info("Type \"help\" to see available commands"),
            ])
            .await?;
            return Ok(Flow::Continue);
        };
        tracing::info!("running command '{}'", found.name);

        match &found.kind {
            CommandKind::Static(text) => {
                if !text.is_empty() {
                    self.play([Message::success(text.as_str())]).await?;
                }
            }
            CommandKind::Redirect { message, url } => {
                self.schedule_open(url.clone());
                self.play([
                    Message::info(message.as_str()),
                    Message::success(found.description.as_str()),
                ])
                .await?;
            }
            CommandKind::Builtin(action) => return self.run_builtin(*action).await,
        }
        Ok(Flow::Continue)
    }

    async fn run_builtin(&self, action: BuiltinAction) -> Result<Flow, Cancelled> {
        match action {
            BuiltinAction::Clear => {
                self.player.screen().lock().clear();
            }
            BuiltinAction::Help => {
                self.play([Message::success(self.table.help_text())]).await?;
            }
            BuiltinAction::ToggleSound => {
                let enabled = self.player.sound().toggle();
                self.play([Message::success(format!(
                    "Typewriter sound {}",
                    on_off(enabled)
                ))])
                .await?;
            }
            BuiltinAction::ToggleVisualEffect => {
                let active = self.visuals.toggle();
                if active {
                    self.visuals.try_reset();
                }
                self.play([Message::success(format!(
                    "Matrix rain effect {}",
                    on_off(active)
                ))])
                .await?;
            }
            BuiltinAction::Exit => {
                self.play([
                    Message::info("Logging out..."),
                    Message::success("Goodbye, hacker!"),
                ])
                .await?;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    async fn play<const N: usize>(&self, messages: [Message; N]) -> Result<usize, Cancelled> {
        self.player
            .play_all(messages.into_iter().collect())
            .await
    }

    /// Open `url` after the redirect delay, without blocking the loop.
    fn schedule_open(&self, url: String) {
        let links = self.links.clone();
        let pacer = self.player.pacer().clone();
        tokio::spawn(async move {
            if pacer.wait(REDIRECT_DELAY).await.is_ok() {
                links.try_open(&url);
            }
        });
    }
}

impl std::fmt::Debug for CommandLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLoop")
            .field("commands", &self.table.len())
            .finish()
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}
