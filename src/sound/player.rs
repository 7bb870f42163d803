//! Sound player implementation using rodio.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;

/// Length of each chime note.
const CHIME_NOTE: Duration = Duration::from_millis(180);

/// Chime volume.
const CHIME_AMPLITUDE: f32 = 0.2;

/// A sound player backed by the default audio output device.
///
/// Playback is non-blocking; sounds continue in the background. The output
/// stream is not `Send`, so the player lives on the thread that created it.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Whether sound playback is disabled.
    disabled: AtomicBool,
}

impl RodioSoundPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Plays a cue.
    ///
    /// A file that cannot be opened or decoded falls back to a chime.
    ///
    /// # Errors
    ///
    /// Returns an error if no sink can be created.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }

        match source {
            SoundSource::File {
                name,
                path,
                fallback_hz,
            } => match self.play_file(path) {
                Err(e) if e.should_fallback_to_chime() => {
                    warn!("Failed to play '{}': {}, falling back to chime", name, e);
                    self.play_chime(*fallback_hz)
                }
                other => other,
            },
            SoundSource::Chime { frequency_hz, .. } => self.play_chime(*frequency_hz),
        }
    }

    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }

    /// Two rising notes, the second a fifth above the first.
    fn play_chime(&self, frequency_hz: u32) -> Result<(), SoundError> {
        let first = frequency_hz as f32;
        let second = first * 1.5;

        let sink = self.sink()?;
        for pitch in [first, second] {
            sink.append(
                SineWave::new(pitch)
                    .take_duration(CHIME_NOTE)
                    .amplify(CHIME_AMPLITUDE),
            );
        }
        sink.detach();
        Ok(())
    }

    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    /// Returns true if sound playback is currently disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Enables sound playback.
    pub fn enable(&self) {
        self.disabled.store(false, Ordering::Relaxed);
    }

    /// Disables sound playback.
    pub fn disable(&self) {
        self.disabled.store(true, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("disabled", &self.disabled.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Opens a sound player, returning None if audio is unavailable.
#[must_use]
pub fn try_create_player(disabled: bool) -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new(disabled) {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Containers usually have no audio device; those tests return early.

    #[test]
    fn test_disabled_player_skips_playback() {
        let Ok(player) = RodioSoundPlayer::new(true) else {
            return;
        };

        assert!(player.is_disabled());
        assert!(player.play(&SoundSource::chime("test", 440)).is_ok());
    }

    #[test]
    fn test_enable_disable() {
        let Ok(player) = RodioSoundPlayer::new(true) else {
            return;
        };

        player.enable();
        assert!(!player.is_disabled());

        player.disable();
        assert!(player.is_disabled());
    }

    #[test]
    fn test_missing_file_falls_back_to_chime() {
        let Ok(player) = RodioSoundPlayer::new(false) else {
            return;
        };

        let source = SoundSource::file("Missing", "/nonexistent/path/to/sound.wav");
        assert!(player.play(&source).is_ok());
    }

    #[test]
    fn test_try_create_player_does_not_panic() {
        let _ = try_create_player(true);
    }
}
