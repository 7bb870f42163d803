//! Desktop notifications for phase completion.
//!
//! The presenter talks to a [`NotificationSender`]. On macOS the native
//! backend is [`NotificationManager`] (`objc2-user-notifications`), which also
//! reports "Start"/"Skip" button clicks. Everywhere else, or when the native
//! backend cannot be initialized, [`LogNotifier`] writes the toast to the log.
//!
//! # Requirements (macOS)
//!
//! The binary must be code-signed for notifications to be delivered:
//! ```bash
//! codesign --force --deep --sign - target/release/pomotimer
//! ```

mod actions;
mod content;
pub mod error;

#[cfg(target_os = "macos")]
mod center;
#[cfg(target_os = "macos")]
mod delegate;
#[cfg(target_os = "macos")]
mod request;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tracing::info;

pub use self::actions::{action_ids, category_ids, NotificationActionEvent};
pub use self::content::{CompletionMessage, APP_TITLE};
pub use self::error::NotificationError;

#[cfg(target_os = "macos")]
pub use self::delegate::NotificationDelegate;

/// Upper bound on a single notification delivery.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Trait for notification backends.
#[allow(async_fn_in_trait)]
pub trait NotificationSender {
    /// Delivers a toast.
    async fn send(&self, message: &CompletionMessage) -> Result<(), NotificationError>;

    /// Returns the next pending action button click, if any.
    fn try_recv_action(&self) -> Option<NotificationActionEvent>;

    /// Removes delivered notifications.
    fn clear_all(&self);
}

/// Delivers a toast, giving up after `limit`.
///
/// # Errors
///
/// Returns the backend error, or [`NotificationError::Timeout`].
pub async fn deliver<N: NotificationSender>(
    sender: &N,
    message: &CompletionMessage,
    limit: Duration,
) -> Result<(), NotificationError> {
    tokio::time::timeout(limit, sender.send(message))
        .await
        .map_err(|_| NotificationError::Timeout(limit.as_secs()))?
}

// ============================================================================
// NotificationManager (macOS)
// ============================================================================

/// Native macOS notification backend.
#[cfg(target_os = "macos")]
pub struct NotificationManager {
    /// Receiver for action events from the delegate.
    action_receiver: std::sync::mpsc::Receiver<NotificationActionEvent>,
    /// Retained delegate to keep it alive.
    _delegate: objc2::rc::Retained<NotificationDelegate>,
}

#[cfg(target_os = "macos")]
impl NotificationManager {
    /// Requests authorization, installs the delegate and registers the
    /// action categories.
    ///
    /// # Errors
    ///
    /// Returns an error if not on the main thread, if authorization is denied,
    /// or if the notification center is unavailable.
    pub async fn new() -> Result<Self, NotificationError> {
        use objc2::MainThreadMarker;

        let mtm = MainThreadMarker::new().ok_or_else(|| {
            NotificationError::InitializationFailed(
                "notifications must be initialized on the main thread".to_string(),
            )
        })?;

        let granted = center::NotificationCenter::request_authorization().await?;
        if !granted {
            return Err(NotificationError::PermissionDenied);
        }

        let (sender, receiver) = std::sync::mpsc::channel();
        let delegate = NotificationDelegate::new(mtm, sender);
        center::NotificationCenter::set_delegate(&NotificationDelegate::as_protocol(&delegate));
        center::NotificationCenter::set_notification_categories(&actions::create_categories());

        Ok(Self {
            action_receiver: receiver,
            _delegate: delegate,
        })
    }
}

#[cfg(target_os = "macos")]
impl NotificationSender for NotificationManager {
    async fn send(&self, message: &CompletionMessage) -> Result<(), NotificationError> {
        let content = content::create_content(message, false);
        let request = request::create_notification_request(&content);
        center::NotificationCenter::add_notification_request(&request).await
    }

    fn try_recv_action(&self) -> Option<NotificationActionEvent> {
        self.action_receiver.try_recv().ok()
    }

    fn clear_all(&self) {
        center::NotificationCenter::remove_all_delivered_notifications();
    }
}

// ============================================================================
// LogNotifier
// ============================================================================

/// Fallback backend that writes toasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSender for LogNotifier {
    async fn send(&self, message: &CompletionMessage) -> Result<(), NotificationError> {
        info!(title = %message.title, "{}", message.body);
        Ok(())
    }

    fn try_recv_action(&self) -> Option<NotificationActionEvent> {
        None
    }

    fn clear_all(&self) {}
}

// ============================================================================
// DesktopNotifier
// ============================================================================

/// The backend the daemon actually uses: native when possible, log otherwise.
pub enum DesktopNotifier {
    /// Native macOS notifications
    #[cfg(target_os = "macos")]
    Native(NotificationManager),
    /// Log-only fallback
    Log(LogNotifier),
}

impl DesktopNotifier {
    /// Initializes the native backend, falling back to the log on failure.
    pub async fn new_with_fallback() -> Self {
        #[cfg(target_os = "macos")]
        {
            match NotificationManager::new().await {
                Ok(manager) => return Self::Native(manager),
                Err(e) => {
                    tracing::warn!("Notifications disabled: {} ({})", e, e.suggestion());
                }
            }
        }
        Self::Log(LogNotifier)
    }
}

impl NotificationSender for DesktopNotifier {
    async fn send(&self, message: &CompletionMessage) -> Result<(), NotificationError> {
        match self {
            #[cfg(target_os = "macos")]
            Self::Native(manager) => manager.send(message).await,
            Self::Log(log) => log.send(message).await,
        }
    }

    fn try_recv_action(&self) -> Option<NotificationActionEvent> {
        match self {
            #[cfg(target_os = "macos")]
            Self::Native(manager) => manager.try_recv_action(),
            Self::Log(log) => log.try_recv_action(),
        }
    }

    fn clear_all(&self) {
        match self {
            #[cfg(target_os = "macos")]
            Self::Native(manager) => manager.clear_all(),
            Self::Log(log) => log.clear_all(),
        }
    }
}

// ============================================================================
// MockNotificationSender
// ============================================================================

/// Mock notification backend for testing.
#[derive(Debug)]
pub struct MockNotificationSender {
    notifications: Mutex<Vec<CompletionMessage>>,
    action_events: Mutex<VecDeque<NotificationActionEvent>>,
    should_fail: AtomicBool,
    clear_count: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockNotificationSender {
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            action_events: Mutex::new(VecDeque::new()),
            should_fail: AtomicBool::new(false),
            clear_count: AtomicUsize::new(0),
            delay: Mutex::new(None),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Makes every `send` wait before recording.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *lock(&self.delay) = delay;
    }

    pub fn inject_action_event(&self, event: NotificationActionEvent) {
        lock(&self.action_events).push_back(event);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<CompletionMessage> {
        lock(&self.notifications).clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        lock(&self.notifications).len()
    }

    /// Returns how many times `clear_all` was called.
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clear_count.load(Ordering::SeqCst)
    }

    pub fn clear_recorded(&self) {
        lock(&self.notifications).clear();
    }
}

impl NotificationSender for MockNotificationSender {
    async fn send(&self, message: &CompletionMessage) -> Result<(), NotificationError> {
        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        lock(&self.notifications).push(message.clone());
        Ok(())
    }

    fn try_recv_action(&self) -> Option<NotificationActionEvent> {
        lock(&self.action_events).pop_front()
    }

    fn clear_all(&self) {
        self.clear_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> CompletionMessage {
        CompletionMessage {
            title: APP_TITLE.to_string(),
            body: "Work finished, next: Short break".to_string(),
            category: category_ids::RUNNING,
        }
    }

    #[tokio::test]
    async fn test_mock_records_messages() {
        let mock = MockNotificationSender::new();

        mock.send(&message()).await.unwrap();

        assert_eq!(mock.notification_count(), 1);
        assert_eq!(mock.get_notifications()[0], message());

        mock.clear_recorded();
        assert_eq!(mock.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockNotificationSender::new();
        mock.set_should_fail(true);

        assert!(mock.send(&message()).await.is_err());
        assert_eq!(mock.notification_count(), 0);
    }

    #[test]
    fn test_mock_action_events_in_order() {
        let mock = MockNotificationSender::new();
        assert!(mock.try_recv_action().is_none());

        mock.inject_action_event(NotificationActionEvent::StartNext);
        mock.inject_action_event(NotificationActionEvent::Skip);

        assert_eq!(
            mock.try_recv_action(),
            Some(NotificationActionEvent::StartNext)
        );
        assert_eq!(mock.try_recv_action(), Some(NotificationActionEvent::Skip));
        assert!(mock.try_recv_action().is_none());
    }

    #[test]
    fn test_mock_counts_clears() {
        let mock = MockNotificationSender::new();
        assert_eq!(mock.clear_count(), 0);

        mock.clear_all();
        mock.clear_all();
        assert_eq!(mock.clear_count(), 2);
    }

    #[tokio::test]
    async fn test_log_notifier_always_succeeds() {
        let notifier = LogNotifier;
        assert!(notifier.send(&message()).await.is_ok());
        assert!(notifier.try_recv_action().is_none());
    }

    #[tokio::test]
    async fn test_deliver_times_out() {
        let mock = MockNotificationSender::new();
        mock.set_delay(Some(Duration::from_secs(60)));

        let result = deliver(&mock, &message(), Duration::from_millis(20)).await;

        assert!(matches!(result, Err(NotificationError::Timeout(_))));
        assert_eq!(mock.notification_count(), 0);
    }

    #[tokio::test]
    async fn test_deliver_passes_through() {
        let mock = MockNotificationSender::new();

        deliver(&mock, &message(), NOTIFICATION_TIMEOUT).await.unwrap();

        assert_eq!(mock.notification_count(), 1);
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn test_desktop_notifier_falls_back_to_log() {
        let notifier = DesktopNotifier::new_with_fallback().await;
        assert!(matches!(notifier, DesktopNotifier::Log(_)));
        assert!(notifier.send(&message()).await.is_ok());
    }
}
