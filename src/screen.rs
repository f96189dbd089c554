//! Display surface shared by the scheduler and the renderer.
//!
//! The session task mutates the screen (entries, input line, boot panel)
//! while the renderer only reads it once per frame. Both sides take the lock
//! for short synchronous sections and never hold it across an await.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::player::{MessageStyle, RevealTarget};

/// Default display limit for output entries.
pub const DEFAULT_MAX_ENTRIES: usize = 200;

/// Stable identifier of an output entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

/// One rendered output entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub style: MessageStyle,
    pub text: String,
}

/// The prompt line the user types into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    pub visible: bool,
    pub buffer: String,
}

/// The boot overlay shown before the terminal becomes interactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootPanel {
    pub visible: bool,
    /// Waiting for the first key press; the progress bar is hidden
    pub waiting: bool,
    /// Fade-out in progress
    pub fading: bool,
    /// Progress in percent (0..=100)
    pub progress: u16,
    pub status: String,
}

impl Default for BootPanel {
    fn default() -> Self {
        Self {
            visible: true,
            waiting: false,
            fading: false,
            progress: 0,
            status: String::new(),
        }
    }
}

/// Header texts derived from the site name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub subtitle: String,
    pub logo: String,
}

impl Banner {
    pub const SUBTITLE: &'static str = "SYSTEM ACCESS GRANTED - WELCOME TO THE MATRIX";

    pub fn for_site(site: &str) -> Self {
        let upper = site.to_uppercase();
        Self {
            title: format!("WELCOME TO {}", upper),
            subtitle: Self::SUBTITLE.to_string(),
            logo: upper,
        }
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::for_site("hacker-system")
    }
}

/// Complete state of what is on screen.
#[derive(Debug, Clone)]
pub struct Screen {
    entries: VecDeque<Entry>,
    next_id: u64,
    max_entries: usize,
    pub input: InputLine,
    pub boot: BootPanel,
    pub banner: Banner,
    pub prompt: String,
    /// Set once the session has ended (after `exit`)
    pub terminated: bool,
}

impl Screen {
    pub fn new(prompt: impl Into<String>, max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 0,
            max_entries,
            input: InputLine::default(),
            boot: BootPanel::default(),
            banner: Banner::default(),
            prompt: prompt.into(),
            terminated: false,
        }
    }

    /// Wrap into the shared handle used by the session and renderer.
    pub fn shared(self) -> SharedScreen {
        SharedScreen(Arc::new(Mutex::new(self)))
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Append an empty entry.
    ///
    /// With `prune` set, the oldest entries are dropped so that at most
    /// `max_entries` remain. Callers pass `prune = false` while the startup
    /// narrative is still playing.
    pub fn push_entry(&mut self, style: MessageStyle, prune: bool) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push_back(Entry {
            id,
            style,
            text: String::new(),
        });
        if prune {
            self.prune();
        }
        id
    }

    /// Append an entry that is shown in full at once.
    pub fn push_text(&mut self, style: MessageStyle, text: &str, prune: bool) -> EntryId {
        let id = self.push_entry(style, prune);
        self.set_text(id, text);
        id
    }

    /// Replace the text of an entry. Returns false if it no longer exists.
    pub fn set_text(&mut self, id: EntryId, text: &str) -> bool {
        match self.entries.iter_mut().rev().find(|e| e.id == id) {
            Some(entry) => {
                entry.text.clear();
                entry.text.push_str(text);
                true
            }
            None => false,
        }
    }

    /// Remove every output entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn prune(&mut self) {
        let excess = self.entries.len().saturating_sub(self.max_entries);
        if excess > 0 {
            self.entries.drain(..excess);
        }
    }

    // === Input line ===

    pub fn show_input(&mut self) {
        self.input.visible = true;
    }

    pub fn hide_input(&mut self) {
        self.input.visible = false;
    }

    pub fn input_visible(&self) -> bool {
        self.input.visible
    }

    /// Take the typed line, leaving the buffer empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input.buffer)
    }

    // === Boot panel ===

    pub fn boot_waiting(&mut self, status: &str) {
        self.boot.visible = true;
        self.boot.waiting = true;
        self.boot.status = status.to_string();
    }

    pub fn boot_progress(&mut self, percent: u16, status: &str) {
        self.boot.waiting = false;
        self.boot.progress = percent.min(100);
        self.boot.status = status.to_string();
    }

    pub fn hide_boot(&mut self) {
        self.boot.visible = false;
        self.boot.waiting = false;
        self.boot.fading = false;
    }
}

/// Cloneable, lock-protected screen handle.
#[derive(Debug, Clone)]
pub struct SharedScreen(Arc<Mutex<Screen>>);

impl SharedScreen {
    /// Lock the screen. A poisoned lock is recovered: the screen holds
    /// plain data that stays consistent between calls.
    pub fn lock(&self) -> MutexGuard<'_, Screen> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reveal target writing into entry `id`.
    pub fn entry_target(&self, id: EntryId) -> EntryTarget {
        EntryTarget {
            screen: self.clone(),
            id,
        }
    }
}

/// Reveal target bound to one output entry.
///
/// Showing text on an entry that has been cleared away is a no-op.
#[derive(Debug, Clone)]
pub struct EntryTarget {
    screen: SharedScreen,
    id: EntryId,
}

impl EntryTarget {
    pub fn id(&self) -> EntryId {
        self.id
    }
}

impl RevealTarget for EntryTarget {
    fn show(&self, text: &str) {
        self.screen.lock().set_text(self.id, text);
    }
}
