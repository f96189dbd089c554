//! Async runtime
//!
//! Owns the terminal and drives everything that is not the session itself:
//! crossterm events are translated and forwarded to the session over a
//! channel, the rain advances every frame of its own, bells are flushed and
//! the screen is redrawn at a fixed rate. The session future runs inside the
//! same `select!` loop, so the whole program lives on one thread.

use std::io::{self, stdout, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::{interval, Instant, MissedTickBehavior};

use super::ui::{self, View};
use crate::config::Config;
use crate::effects::{
    BellSound, Links, RainEffect, Sound, SystemBrowser, VisualEffect, Visuals, RAIN_FRAME,
};
use crate::input::{self, InputAction};
use crate::player::{Pacer, Shutdown};
use crate::screen::{Screen, SharedScreen};
use crate::session::{BootTimings, Collaborators, LoopExit, Session};
use crate::shell::load_or_fallback;
use crate::theme::Theme;

/// Redraw interval (~30 fps).
pub const FRAME: Duration = Duration::from_millis(33);

/// Half period of the "press any key" blink.
const BLINK: Duration = Duration::from_millis(500);

/// Raw mode, alternate screen and mouse capture for as long as it lives.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(out))?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Run the terminal until the user quits.
///
/// Ctrl-C (or Ctrl-D) quits at any time. After `exit` the goodbye stays on
/// screen until the next key.
#[cfg(not(tarpaulin_include))]
pub async fn run(config: Config) -> Result<()> {
    let mut guard = TerminalGuard::new().context("Failed to set up the terminal")?;
    let size = guard.terminal().size()?;
    let theme = config.theme();

    let screen = Screen::new(config.terminal.prompt.clone(), config.terminal.max_entries).shared();
    let bell = Arc::new(BellSound::new(config.sound.enabled, config.sound.volume as f32));
    let sound = Sound::new(bell.clone());
    let rain = Arc::new(RainEffect::new(size.width, size.height));
    let visuals = if config.effects.rain {
        Visuals::new(rain.clone())
    } else {
        Visuals::none()
    };

    let shutdown = Shutdown::new();
    let session = Session::new(
        screen.clone(),
        load_or_fallback(&config.terminal.commands),
        Collaborators {
            sound: sound.clone(),
            visuals,
            links: Links::new(Arc::new(SystemBrowser::new())),
        },
        Pacer::new(shutdown.clone()),
        BootTimings::default(),
    );

    let (tx, mut rx) = input::channel();
    let session_run = session.run(&mut rx);
    tokio::pin!(session_run);
    let mut session_done = false;

    let mut events = EventStream::new();
    let mut rain_tick = interval(RAIN_FRAME);
    rain_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame_tick = interval(FRAME);
    frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let started = Instant::now();

    loop {
        tokio::select! {
            biased;

            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(event)) => match input::translate(&event) {
                        InputAction::Quit => break,
                        InputAction::Resize(cols, rows) => rain.resize(cols, rows),
                        InputAction::Forward(key) => {
                            if session_done || screen.lock().terminated {
                                break;
                            }
                            if tx.send(key).is_err() {
                                tracing::debug!("session no longer reads input");
                            }
                        }
                        InputAction::Ignore => {}
                    },
                    Some(Err(e)) => return Err(e).context("Failed to read terminal events"),
                    None => break,
                }
            }

            result = &mut session_run, if !session_done => {
                session_done = true;
                match result {
                    Ok(LoopExit::Exited) => tracing::info!("session exited"),
                    Ok(LoopExit::InputClosed) => tracing::info!("session input closed"),
                    Err(_) => tracing::debug!("session cancelled"),
                }
            }

            _ = rain_tick.tick() => rain.tick(),

            _ = frame_tick.tick() => {
                draw(&mut guard, &screen, &rain, &sound, &theme, started.elapsed())?;
                if bell.take_pending() > 0 {
                    let backend = guard.terminal().backend_mut();
                    backend.write_all(b"\x07")?;
                    backend.flush()?;
                }
            }
        }
    }

    shutdown.trigger();
    tracing::info!("hackterm exiting after {:?}", started.elapsed());
    Ok(())
}

#[cfg(not(tarpaulin_include))]
fn draw(
    guard: &mut TerminalGuard,
    screen: &SharedScreen,
    rain: &RainEffect,
    sound: &Sound,
    theme: &Theme,
    stay: Duration,
) -> Result<()> {
    let snapshot = screen.lock().clone();
    let field = rain.field();
    let view = View {
        screen: &snapshot,
        rain: rain.is_active().then_some(&*field),
        theme,
        clock: chrono::Local::now(),
        stay,
        sound_on: sound.is_enabled(),
        blink_on: (stay.as_millis() / BLINK.as_millis()) % 2 == 0,
    };
    guard.terminal().draw(|frame| ui::render(frame, &view))?;
    Ok(())
}
