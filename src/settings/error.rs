//! Settings persistence error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::ConfigurationError;

/// Errors that can occur while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform has no per-user configuration directory.
    #[error("could not determine the user configuration directory")]
    NoConfigDir,

    /// Reading or writing the file failed.
    #[error("settings file {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid settings document.
    #[error("settings file {path} is malformed: {source}")]
    Malformed {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but holds an invalid configuration.
    #[error("settings file {path} is invalid: {source}")]
    Invalid {
        /// File involved
        path: PathBuf,
        /// Validation failure
        #[source]
        source: ConfigurationError,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}
