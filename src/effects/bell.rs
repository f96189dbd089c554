//! Terminal bell sound engine.
//!
//! Keystroke and confirm sounds are queued here and flushed by the renderer
//! as a single BEL per frame, so the bell never lands in the middle of an
//! escape sequence written by the terminal backend. The engine stays
//! suspended until the first user interaction, like a browser audio
//! context.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use super::{EffectError, SoundEngine};

/// Sound engine backed by the terminal bell.
#[derive(Debug)]
pub struct BellSound {
    enabled: AtomicBool,
    ready: AtomicBool,
    /// f32 bits
    volume: AtomicU32,
    pending: AtomicUsize,
}

impl BellSound {
    pub fn new(enabled: bool, volume: f32) -> Self {
        let bell = Self {
            enabled: AtomicBool::new(enabled),
            ready: AtomicBool::new(false),
            volume: AtomicU32::new(0),
            pending: AtomicUsize::new(0),
        };
        bell.set_volume(volume);
        bell
    }

    pub fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }

    /// Take the number of bells queued since the last call.
    pub fn take_pending(&self) -> usize {
        self.pending.swap(0, Ordering::AcqRel)
    }

    fn ring(&self) -> Result<(), EffectError> {
        if !self.ready.load(Ordering::Acquire) {
            return Err(EffectError::Unavailable("terminal bell"));
        }
        // Volume zero is a mute, not an error
        if self.volume() > 0.0 {
            self.pending.fetch_add(1, Ordering::AcqRel);
        }
        Ok(())
    }
}

impl Default for BellSound {
    fn default() -> Self {
        Self::new(true, 0.1)
    }
}

impl SoundEngine for BellSound {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    fn activate(&self) {
        if !self.ready.swap(true, Ordering::AcqRel) {
            tracing::debug!("terminal bell activated by user input");
        }
    }

    fn play_keystroke(&self) -> Result<(), EffectError> {
        self.ring()
    }

    fn play_confirm(&self) -> Result<(), EffectError> {
        self.ring()
    }

    fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::AcqRel);
        tracing::info!(
            "typewriter sound {}",
            if enabled { "enabled" } else { "disabled" }
        );
        enabled
    }

    fn set_volume(&self, volume: f32) {
        let clamped = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.volume.store(clamped.to_bits(), Ordering::Relaxed);
    }
}
