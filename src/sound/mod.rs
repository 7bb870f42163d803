//! Audio cues for phase completion.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   SoundPlayer    │ ← trait used by the presenter
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │   SoundSource    │────▶│  System Sounds   │
//! │                  │     │  (/System/...)   │
//! │                  │     ├──────────────────┤
//! │                  │────▶│ Synthesized chime│
//! └──────────────────┘     │  (fallback)      │
//!                          └──────────────────┘
//! ```

mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{
    chime_for, completion_sound, find_system_sound, SoundSource, BREAK_DONE_FREQUENCY_HZ,
    WORK_DONE_FREQUENCY_HZ,
};

/// Trait for sound playback implementations.
pub trait SoundPlayer {
    /// Plays a cue without blocking.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns true if sound playback is disabled.
    fn is_disabled(&self) -> bool;

    /// Enables sound playback.
    fn enable(&self);

    /// Disables sound playback.
    fn disable(&self);
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn is_disabled(&self) -> bool {
        RodioSoundPlayer::is_disabled(self)
    }

    fn enable(&self) {
        RodioSoundPlayer::enable(self)
    }

    fn disable(&self) {
        RodioSoundPlayer::disable(self)
    }
}

/// Mock sound player for testing.
#[derive(Debug)]
pub struct MockSoundPlayer {
    play_calls: Mutex<Vec<SoundSource>>,
    disabled: AtomicBool,
    should_fail: AtomicBool,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_calls: Mutex::new(Vec::new()),
            disabled: AtomicBool::new(false),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.calls().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.calls().clone()
    }

    pub fn clear_calls(&self) {
        self.calls().clear();
    }

    fn calls(&self) -> MutexGuard<'_, Vec<SoundSource>> {
        self.play_calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        if self.disabled.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.calls().push(source.clone());
        Ok(())
    }

    fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.disabled.store(false, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls() {
        let player = MockSoundPlayer::new();
        let source = SoundSource::chime("test", 440);

        player.play(&source).unwrap();
        player.play(&source).unwrap();

        assert_eq!(player.play_count(), 2);
        assert_eq!(player.get_play_calls()[0], source);

        player.clear_calls();
        assert_eq!(player.play_count(), 0);
    }

    #[test]
    fn test_mock_disabled_is_silent() {
        let player = MockSoundPlayer::new();
        player.disable();

        assert!(player.is_disabled());
        player.play(&SoundSource::chime("test", 440)).unwrap();
        assert_eq!(player.play_count(), 0);

        player.enable();
        assert!(!player.is_disabled());
    }

    #[test]
    fn test_mock_failure() {
        let player = MockSoundPlayer::new();
        player.set_should_fail(true);

        let result = player.play(&SoundSource::chime("test", 440));
        assert!(matches!(result, Err(SoundError::PlaybackError(_))));
    }
}
