//! Sound system error types.
//!
//! Every sound failure is recoverable: the presenter logs it and the timer
//! keeps running.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio output device is available.
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The sound file could not be opened.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// The sound file could not be decoded.
    #[error("failed to decode sound file: {0}")]
    DecodeError(String),

    /// The output sink could not be created.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Any other playback failure.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns true if playback should retry with the synthesized chime.
    #[must_use]
    pub fn should_fallback_to_chime(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::DecodeError(_))
    }
}
