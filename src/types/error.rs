//! Configuration validation errors.
//!
//! This is the only error kind that originates in the timer engine. It is
//! raised at construction and reload boundaries; every other engine operation
//! is total.

use thiserror::Error;

/// Rejection of a [`Configuration`](super::Configuration) value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A phase duration was zero.
    #[error("{field} must be a positive number of minutes")]
    NonPositiveDuration {
        /// Name of the offending field
        field: &'static str,
    },

    /// `long_break_every` was zero.
    #[error("long_break_every must be a positive number of work phases")]
    NonPositiveCadence,
}

impl ConfigurationError {
    /// Returns the name of the configuration field that was rejected.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveDuration { field } => field,
            Self::NonPositiveCadence => "long_break_every",
        }
    }
}
