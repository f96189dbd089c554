//! Sound, visual and link collaborators.
//!
//! The scheduler never talks to an engine directly. It goes through the
//! [`Sound`], [`Visuals`] and [`Links`] wrappers, which turn a missing,
//! disabled, unready or failing collaborator into a silent no-op so that
//! message playback behaves the same with or without them.

mod bell;
mod link;
mod rain;

pub use bell::BellSound;
pub use link::{LinkError, LinkOpener, SystemBrowser};
pub use rain::{RainEffect, RainField, RAIN_FRAME, RAIN_GLYPHS, RAIN_SETTLE};

use std::sync::Arc;
use std::time::Duration;

use crate::player::{Cancelled, Pacer};

/// Errors a collaborator may report. Never propagated past the wrappers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    #[error("{0} is not available")]
    Unavailable(&'static str),

    #[error("{effect} failed: {message}")]
    Failed {
        effect: &'static str,
        message: String,
    },
}

/// A synthesized sound source.
pub trait SoundEngine: Send + Sync {
    /// Engine created and running (not suspended).
    fn is_ready(&self) -> bool;

    /// Whether the user has sound switched on.
    fn is_enabled(&self) -> bool;

    /// Resume the engine after the first user interaction.
    fn activate(&self);

    fn play_keystroke(&self) -> Result<(), EffectError>;

    fn play_confirm(&self) -> Result<(), EffectError>;

    /// Flip the enabled state, returning the new state.
    fn toggle(&self) -> bool;

    /// Set the volume; values are clamped to `0.0..=1.0`.
    fn set_volume(&self, volume: f32);
}

/// A decorative background animation.
pub trait VisualEffect: Send + Sync {
    fn start(&self);

    fn stop(&self);

    fn is_active(&self) -> bool;

    /// Flip the running state, returning the new state.
    fn toggle(&self) -> bool;

    /// Restart the animation from the top and run it.
    ///
    /// Returns how long the effect wants to be shown on its own before
    /// anything else happens.
    fn reset_to_top_and_play(&self) -> Result<Duration, EffectError>;
}

/// Safe front for an optional sound engine.
#[derive(Clone, Default)]
pub struct Sound {
    engine: Option<Arc<dyn SoundEngine>>,
}

impl Sound {
    pub fn new(engine: Arc<dyn SoundEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// No engine at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.playable().is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.is_enabled())
    }

    pub fn activate(&self) {
        if let Some(engine) = &self.engine {
            engine.activate();
        }
    }

    /// Keystroke click, if the engine is present, enabled and ready.
    pub fn try_keystroke(&self) {
        if let Some(engine) = self.playable() {
            if let Err(e) = engine.play_keystroke() {
                tracing::debug!("keystroke sound skipped: {}", e);
            }
        }
    }

    /// Confirmation tone, if the engine is present, enabled and ready.
    pub fn try_confirm(&self) {
        if let Some(engine) = self.playable() {
            if let Err(e) = engine.play_confirm() {
                tracing::debug!("confirm sound skipped: {}", e);
            }
        }
    }

    /// Toggle sound. Without an engine sound stays off.
    pub fn toggle(&self) -> bool {
        self.engine.as_ref().is_some_and(|e| e.toggle())
    }

    fn playable(&self) -> Option<&Arc<dyn SoundEngine>> {
        self.engine
            .as_ref()
            .filter(|e| e.is_enabled() && e.is_ready())
    }
}

impl std::fmt::Debug for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sound")
            .field("present", &self.engine.is_some())
            .finish()
    }
}

/// Safe front for an optional visual effect.
#[derive(Clone, Default)]
pub struct Visuals {
    effect: Option<Arc<dyn VisualEffect>>,
}

impl Visuals {
    pub fn new(effect: Arc<dyn VisualEffect>) -> Self {
        Self {
            effect: Some(effect),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.effect.as_ref().is_some_and(|e| e.is_active())
    }

    /// Toggle the effect. Without an effect it stays off.
    pub fn toggle(&self) -> bool {
        self.effect.as_ref().is_some_and(|e| e.toggle())
    }

    /// Restart from the top without waiting for it to settle.
    pub fn try_reset(&self) {
        if let Some(effect) = &self.effect {
            if let Err(e) = effect.reset_to_top_and_play() {
                tracing::debug!("visual reset skipped: {}", e);
            }
        }
    }

    /// Restart from the top and wait for the effect's settle delay.
    ///
    /// An absent or failing effect returns at once.
    pub async fn try_reset_and_settle(&self, pacer: &Pacer) -> Result<(), Cancelled> {
        let Some(effect) = &self.effect else {
            return Ok(());
        };
        match effect.reset_to_top_and_play() {
            Ok(settle) => pacer.wait(settle).await,
            Err(e) => {
                tracing::debug!("visual reset skipped: {}", e);
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for Visuals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visuals")
            .field("present", &self.effect.is_some())
            .finish()
    }
}

/// Safe front for an optional link opener.
#[derive(Clone, Default)]
pub struct Links {
    opener: Option<Arc<dyn LinkOpener>>,
}

impl Links {
    pub fn new(opener: Arc<dyn LinkOpener>) -> Self {
        Self {
            opener: Some(opener),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Open `url`, logging instead of failing.
    pub fn try_open(&self, url: &str) {
        let Some(opener) = &self.opener else {
            tracing::debug!("no link opener, not opening {}", url);
            return;
        };
        match opener.open(url) {
            Ok(()) => tracing::info!("opened {}", url),
            Err(e) => tracing::warn!("could not open {}: {}", url, e),
        }
    }
}

impl std::fmt::Debug for Links {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Links")
            .field("present", &self.opener.is_some())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Sound engine that counts calls.
    #[derive(Default)]
    pub(crate) struct CountingSound {
        pub ready: AtomicBool,
        pub disabled: AtomicBool,
        pub failing: AtomicBool,
        pub keystrokes: AtomicUsize,
        pub confirms: AtomicUsize,
    }

    impl CountingSound {
        pub(crate) fn ready() -> Arc<Self> {
            let sound = Self::default();
            sound.ready.store(true, Ordering::SeqCst);
            Arc::new(sound)
        }

        pub(crate) fn keystrokes(&self) -> usize {
            self.keystrokes.load(Ordering::SeqCst)
        }

        pub(crate) fn confirms(&self) -> usize {
            self.confirms.load(Ordering::SeqCst)
        }
    }

    impl SoundEngine for CountingSound {
        fn is_ready(&self) -> bool {
            self.ready.load(Ordering::SeqCst)
        }

        fn is_enabled(&self) -> bool {
            !self.disabled.load(Ordering::SeqCst)
        }

        fn activate(&self) {
            self.ready.store(true, Ordering::SeqCst);
        }

        fn play_keystroke(&self) -> Result<(), EffectError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(EffectError::Unavailable("counting sound"));
            }
            self.keystrokes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn play_confirm(&self) -> Result<(), EffectError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(EffectError::Unavailable("counting sound"));
            }
            self.confirms.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn toggle(&self) -> bool {
            // Previously disabled means enabled now
            self.disabled.fetch_xor(true, Ordering::SeqCst)
        }

        fn set_volume(&self, _volume: f32) {}
    }

    /// Visual effect that records resets.
    #[derive(Default)]
    pub(crate) struct RecordingVisual {
        pub active: AtomicBool,
        pub resets: AtomicUsize,
        pub settle: Mutex<Duration>,
        pub failing: AtomicBool,
    }

    impl RecordingVisual {
        pub(crate) fn with_settle(settle: Duration) -> Arc<Self> {
            let visual = Self::default();
            *visual.settle.lock().unwrap() = settle;
            Arc::new(visual)
        }

        pub(crate) fn resets(&self) -> usize {
            self.resets.load(Ordering::SeqCst)
        }
    }

    impl VisualEffect for RecordingVisual {
        fn start(&self) {
            self.active.store(true, Ordering::SeqCst);
        }

        fn stop(&self) {
            self.active.store(false, Ordering::SeqCst);
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }

        fn toggle(&self) -> bool {
            !self.active.fetch_xor(true, Ordering::SeqCst)
        }

        fn reset_to_top_and_play(&self) -> Result<Duration, EffectError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(EffectError::Failed {
                    effect: "recording visual",
                    message: "boom".to_string(),
                });
            }
            self.resets.fetch_add(1, Ordering::SeqCst);
            self.active.store(true, Ordering::SeqCst);
            Ok(*self.settle.lock().unwrap())
        }
    }

    /// Link opener that remembers what it was asked to open.
    #[derive(Default)]
    pub(crate) struct RecordingLinks {
        pub opened: Mutex<Vec<String>>,
    }

    impl LinkOpener for RecordingLinks {
        fn open(&self, url: &str) -> Result<(), LinkError> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn sound_none_is_silent_noop() {
        let sound = Sound::none();
        sound.try_keystroke();
        sound.try_confirm();
        sound.activate();
        assert!(!sound.is_ready());
        assert!(!sound.toggle());
    }

    #[test]
    fn unready_engine_is_skipped() {
        let engine = Arc::new(CountingSound::default());
        let sound = Sound::new(engine.clone());

        sound.try_keystroke();
        assert_eq!(engine.keystrokes(), 0);

        sound.activate();
        sound.try_keystroke();
        assert_eq!(engine.keystrokes(), 1);
    }

    #[test]
    fn disabled_engine_is_skipped() {
        let engine = CountingSound::ready();
        let sound = Sound::new(engine.clone());

        assert!(!sound.toggle());
        sound.try_confirm();
        assert_eq!(engine.confirms(), 0);

        assert!(sound.toggle());
        sound.try_confirm();
        assert_eq!(engine.confirms(), 1);
    }

    #[test]
    fn failing_engine_is_swallowed() {
        let engine = CountingSound::ready();
        engine.failing.store(true, Ordering::SeqCst);
        let sound = Sound::new(engine.clone());

        sound.try_keystroke();
        sound.try_confirm();

        assert_eq!(engine.keystrokes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_and_settle_waits_for_effect() {
        let visual = RecordingVisual::with_settle(Duration::from_millis(1500));
        let visuals = Visuals::new(visual.clone());
        let start = tokio::time::Instant::now();

        visuals
            .try_reset_and_settle(&Pacer::default())
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::from_millis(1500));
        assert_eq!(visual.resets(), 1);
        assert!(visuals.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn failing_or_missing_effect_does_not_wait() {
        let visual = RecordingVisual::with_settle(Duration::from_secs(3));
        visual.failing.store(true, Ordering::SeqCst);
        let start = tokio::time::Instant::now();

        Visuals::new(visual)
            .try_reset_and_settle(&Pacer::default())
            .await
            .unwrap();
        Visuals::none()
            .try_reset_and_settle(&Pacer::default())
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn links_none_does_not_panic() {
        Links::none().try_open("https://example.com");
    }

    #[test]
    fn links_forward_to_opener() {
        let opener = Arc::new(RecordingLinks::default());
        Links::new(opener.clone()).try_open("https://example.com");
        assert_eq!(*opener.opened.lock().unwrap(), vec!["https://example.com"]);
    }
}
