//! Persisted timer configuration.
//!
//! The settings file is a JSON document holding the six [`Configuration`]
//! fields. Loading never fails startup: a missing, unreadable, malformed or
//! invalid file falls back to the defaults. Saving is best-effort for callers;
//! errors are returned so they can be logged.

mod error;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::types::Configuration;

pub use error::SettingsError;

/// Application directory under the platform config directory.
pub const SETTINGS_DIR_NAME: &str = "pomotimer";

/// Settings file name.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Returns `<config dir>/pomotimer/settings.json`.
///
/// # Errors
///
/// Returns [`SettingsError::NoConfigDir`] if the platform has no config directory.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
        .ok_or(SettingsError::NoConfigDir)
}

/// Reads and writes the settings file at a fixed path.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at [`default_settings_path`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoConfigDir`] if the platform has no config directory.
    pub fn at_default_location() -> Result<Self, SettingsError> {
        default_settings_path().map(Self::new)
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// Returns `Ok(None)` if the file does not exist. Missing fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds an invalid configuration.
    pub fn try_load(&self) -> Result<Option<Configuration>, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let config: Configuration =
            serde_json::from_str(&content).map_err(|source| SettingsError::Malformed {
                path: self.path.clone(),
                source,
            })?;

        config.validate().map_err(|source| SettingsError::Invalid {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(config))
    }

    /// Loads the configuration, falling back to defaults on any failure.
    pub fn load_or_default(&self) -> Configuration {
        match self.try_load() {
            Ok(Some(config)) => {
                debug!(path = %self.path.display(), "Loaded settings");
                config
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                Configuration::default()
            }
            Err(err) => {
                warn!("Using default settings: {}", err);
                Configuration::default()
            }
        }
    }

    /// Writes the configuration as pretty-printed JSON, creating the parent
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, config: &Configuration) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(config).map_err(SettingsError::Serialize)?;
        fs::write(&self.path, json).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }
}
