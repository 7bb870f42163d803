//! Notification system error types.
//!
//! None of these reach the timer. The presenter logs them and moves on.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Requesting authorization from the system failed.
    #[error("failed to request notification authorization: {0}")]
    AuthorizationFailed(String),

    /// Delivering a notification failed.
    #[error("failed to send notification: {0}")]
    SendFailed(String),

    /// The user denied notification permission.
    #[error("notification permission denied")]
    PermissionDenied,

    /// The notification system could not be set up.
    #[error("failed to initialize notifications: {0}")]
    InitializationFailed(String),

    /// Delivery did not finish in time.
    #[error("notification delivery timed out after {0}s")]
    Timeout(u64),

    /// No notification backend on this platform.
    #[error("notification center not available")]
    NotAvailable,
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "Allow notifications for the terminal in System Settings > Notifications"
            }
            Self::SendFailed(_) | Self::Timeout(_) => "Check the notification center",
            Self::InitializationFailed(_) => {
                "Sign the binary: codesign --force --deep --sign - target/release/pomotimer"
            }
            Self::NotAvailable => "Notifications are logged instead on this platform",
        }
    }
}
