//! Completion cue selection.
//!
//! A cue is either a sound file shipped with the OS or a short synthesized
//! chime. The chime is always available, so a missing system sound never
//! silences a phase completion.

use std::path::{Path, PathBuf};

use crate::types::PhaseKind;

/// Directories searched for system sounds, in order of priority.
const SYSTEM_SOUND_DIRS: &[&str] = &["/System/Library/Sounds", "/Library/Sounds"];

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "mp3", "flac"];

/// Chime pitch after a work phase.
pub const WORK_DONE_FREQUENCY_HZ: u32 = 880;

/// Chime pitch after a break.
pub const BREAK_DONE_FREQUENCY_HZ: u32 = 660;

/// The source of a cue to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sound file on disk.
    File {
        /// Display name (e.g. "Glass")
        name: String,
        /// Full path to the file
        path: PathBuf,
        /// Chime pitch used when the file cannot be played
        fallback_hz: u32,
    },
    /// A synthesized sine chime.
    Chime {
        /// Display name
        name: String,
        /// Pitch of the first note
        frequency_hz: u32,
    },
}

impl SoundSource {
    /// Creates a file source that falls back to the work-done chime.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
            fallback_hz: WORK_DONE_FREQUENCY_HZ,
        }
    }

    /// Creates a chime source.
    #[must_use]
    pub fn chime(name: impl Into<String>, frequency_hz: u32) -> Self {
        Self::Chime {
            name: name.into(),
            frequency_hz,
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Chime { name, .. } => name,
        }
    }

    /// Returns true for a synthesized chime.
    #[must_use]
    pub fn is_chime(&self) -> bool {
        matches!(self, Self::Chime { .. })
    }

    /// Sets the fallback chime pitch of a file source.
    #[must_use]
    pub fn with_fallback_hz(self, hz: u32) -> Self {
        match self {
            Self::File { name, path, .. } => Self::File {
                name,
                path,
                fallback_hz: hz,
            },
            chime @ Self::Chime { .. } => chime,
        }
    }

    /// Returns the pitch of the chime this source plays or falls back to.
    #[must_use]
    pub fn chime_hz(&self) -> u32 {
        match self {
            Self::File { fallback_hz, .. } => *fallback_hz,
            Self::Chime { frequency_hz, .. } => *frequency_hz,
        }
    }

    /// Returns the file path for file sources.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Chime { .. } => None,
        }
    }
}

/// Returns the chime played when `finished` completes.
#[must_use]
pub fn chime_for(finished: PhaseKind) -> SoundSource {
    match finished {
        PhaseKind::Work => SoundSource::chime("work-done", WORK_DONE_FREQUENCY_HZ),
        PhaseKind::ShortBreak | PhaseKind::LongBreak => {
            SoundSource::chime("break-done", BREAK_DONE_FREQUENCY_HZ)
        }
    }
}

/// Finds a system sound by name (case-insensitive, any supported extension).
#[must_use]
pub fn find_system_sound(name: &str) -> Option<SoundSource> {
    find_sound_in(SYSTEM_SOUND_DIRS.iter().map(Path::new), name)
}

fn find_sound_in<'a>(
    dirs: impl IntoIterator<Item = &'a Path>,
    name: &str,
) -> Option<SoundSource> {
    for dir in dirs {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let supported = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
            let matches = path
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case(name));
            if supported && matches {
                return Some(SoundSource::file(name, path));
            }
        }
    }
    None
}

/// Returns the cue for the completion of `finished`.
///
/// Prefers the macOS "Glass" sound after work and "Ping" after a break,
/// falling back to the synthesized chime.
#[must_use]
pub fn completion_sound(finished: PhaseKind) -> SoundSource {
    completion_sound_in(SYSTEM_SOUND_DIRS.iter().map(Path::new), finished)
}

fn completion_sound_in<'a>(
    dirs: impl IntoIterator<Item = &'a Path>,
    finished: PhaseKind,
) -> SoundSource {
    let preferred = if finished.is_break() { "Ping" } else { "Glass" };
    let chime = chime_for(finished);
    match find_sound_in(dirs, preferred) {
        Some(file) => file.with_fallback_hz(chime.chime_hz()),
        None => chime,
    }
}
