//! Typewriter reveal of a single string.
//!
//! The reveal mode is derived from the text itself:
//!
//! - `Lines`: text with line breaks is shown one more line per line tick
//!   (three base ticks), all earlier lines staying visible
//! - `Ellipsis`: text ending in `...` shows everything before the dots at
//!   once, then types the three dots one per tick
//! - `Char`: everything else appears one character per tick
//!
//! The tick lengths are fixed presentation constants.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::pace::{Cancelled, Pacer};

/// Base reveal tick.
pub const TICK: Duration = Duration::from_millis(50);

/// Pause between two lines in `Lines` mode.
pub const LINE_TICK: Duration = Duration::from_millis(150);

/// Pause between the instant base text and the first dot in `Ellipsis` mode.
pub const ELLIPSIS_LEAD: Duration = Duration::from_millis(100);

const ELLIPSIS: &str = "...";

/// Anything a reveal can write into.
///
/// `show` replaces the whole displayed content; the typewriter always
/// passes the full prefix revealed so far.
pub trait RevealTarget: Send + Sync {
    fn show(&self, text: &str);
}

/// How a text is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    Char,
    Ellipsis,
    Lines,
}

impl RevealMode {
    /// Pick the mode for `text`. Line breaks win over a trailing ellipsis.
    pub fn for_text(text: &str) -> Self {
        if text.contains('\n') {
            Self::Lines
        } else if text.ends_with(ELLIPSIS) {
            Self::Ellipsis
        } else {
            Self::Char
        }
    }

    /// Number of visible steps a reveal of `text` in this mode takes.
    pub fn step_count(&self, text: &str) -> usize {
        match self {
            Self::Char => text.chars().count(),
            Self::Ellipsis => 1 + ELLIPSIS.len(),
            Self::Lines => text.split('\n').count(),
        }
    }
}

/// Progress cursor of the reveal currently running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    pub source: String,
    pub mode: RevealMode,
    /// Steps shown so far
    pub position: usize,
}

/// Single-flight text revealer.
///
/// Holds the `RevealState` of the one reveal in progress; callers are
/// responsible for not starting a second reveal concurrently (the
/// sequential player serializes them).
#[derive(Debug)]
pub struct Typewriter {
    pacer: Pacer,
    state: Mutex<Option<RevealState>>,
}

impl Typewriter {
    pub fn new(pacer: Pacer) -> Self {
        Self {
            pacer,
            state: Mutex::new(None),
        }
    }

    /// True when no reveal is in progress.
    pub fn is_idle(&self) -> bool {
        self.lock_state().is_none()
    }

    /// Snapshot of the running reveal, if any.
    pub fn current(&self) -> Option<RevealState> {
        self.lock_state().clone()
    }

    /// Reveal `text` into `target`, resolving once the last step has
    /// been shown and its tick has elapsed.
    pub async fn reveal<T>(&self, target: &T, text: &str) -> Result<RevealMode, Cancelled>
    where
        T: RevealTarget + ?Sized,
    {
        let mode = RevealMode::for_text(text);
        if text.is_empty() {
            target.show("");
            return Ok(mode);
        }

        *self.lock_state() = Some(RevealState {
            source: text.to_string(),
            mode,
            position: 0,
        });
        let _clear = ClearOnDrop(&self.state);

        match mode {
            RevealMode::Char => self.reveal_chars(target, text).await?,
            RevealMode::Ellipsis => self.reveal_ellipsis(target, text).await?,
            RevealMode::Lines => self.reveal_lines(target, text).await?,
        }
        Ok(mode)
    }

    async fn reveal_chars<T>(&self, target: &T, text: &str) -> Result<(), Cancelled>
    where
        T: RevealTarget + ?Sized,
    {
        let ends = text
            .char_indices()
            .map(|(idx, ch)| idx + ch.len_utf8());
        for end in ends {
            target.show(&text[..end]);
            self.advance();
            self.pacer.wait(TICK).await?;
        }
        Ok(())
    }

    async fn reveal_ellipsis<T>(&self, target: &T, text: &str) -> Result<(), Cancelled>
    where
        T: RevealTarget + ?Sized,
    {
        let base = text.strip_suffix(ELLIPSIS).unwrap_or(text);
        target.show(base);
        self.advance();
        self.pacer.wait(ELLIPSIS_LEAD).await?;

        for dots in 1..=ELLIPSIS.len() {
            target.show(&format!("{}{}", base, &ELLIPSIS[..dots]));
            self.advance();
            self.pacer.wait(TICK).await?;
        }
        Ok(())
    }

    async fn reveal_lines<T>(&self, target: &T, text: &str) -> Result<(), Cancelled>
    where
        T: RevealTarget + ?Sized,
    {
        let lines: Vec<&str> = text.split('\n').collect();
        for shown in 1..=lines.len() {
            target.show(&lines[..shown].join("\n"));
            self.advance();
            self.pacer.wait(LINE_TICK).await?;
        }
        Ok(())
    }

    fn advance(&self) {
        if let Some(state) = self.lock_state().as_mut() {
            state.position += 1;
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<RevealState>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the reveal state when a reveal finishes or is dropped mid-flight.
struct ClearOnDrop<'a>(&'a Mutex<Option<RevealState>>);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *state = None;
    }
}
