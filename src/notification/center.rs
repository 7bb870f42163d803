//! UNUserNotificationCenter wrapper.
//!
//! Completion-handler callbacks are bridged to `oneshot` channels so the
//! calls can be awaited.

use std::cell::RefCell;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{Bool, ProtocolObject};
use objc2_foundation::{NSError, NSSet};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNNotificationCategory, UNNotificationRequest,
    UNUserNotificationCenter, UNUserNotificationCenterDelegate,
};
use tokio::sync::oneshot;

use super::error::NotificationError;

pub struct NotificationCenter;

/// Returns the localized description of a possibly-null `NSError`.
fn error_description(error: *mut NSError) -> Option<String> {
    // SAFETY: the system passes either null or a valid NSError.
    unsafe { error.as_ref() }.map(|err| err.localizedDescription().to_string())
}

impl NotificationCenter {
    #[must_use]
    pub fn current() -> Retained<UNUserNotificationCenter> {
        UNUserNotificationCenter::currentNotificationCenter()
    }

    pub async fn request_authorization() -> Result<bool, NotificationError> {
        let (tx, rx) = oneshot::channel::<Result<bool, NotificationError>>();

        let options = UNAuthorizationOptions::Alert | UNAuthorizationOptions::Sound;

        let cb = RefCell::new(Some(tx));
        let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
            if let Some(sender) = cb.borrow_mut().take() {
                let result = match error_description(error) {
                    Some(description) => Err(NotificationError::AuthorizationFailed(description)),
                    None => Ok(granted.as_bool()),
                };
                let _ = sender.send(result);
            }
        });

        Self::current().requestAuthorizationWithOptions_completionHandler(options, &block);

        rx.await
            .map_err(|_| NotificationError::InitializationFailed("Channel closed".to_string()))?
    }

    pub fn set_notification_categories(categories: &[Retained<UNNotificationCategory>]) {
        let refs: Vec<&UNNotificationCategory> = categories.iter().map(|c| c.as_ref()).collect();
        let categories_set: Retained<NSSet<UNNotificationCategory>> = NSSet::from_slice(&refs);

        Self::current().setNotificationCategories(&categories_set);
    }

    pub fn set_delegate(delegate: &ProtocolObject<dyn UNUserNotificationCenterDelegate>) {
        Self::current().setDelegate(Some(delegate));
    }

    pub async fn add_notification_request(
        request: &UNNotificationRequest,
    ) -> Result<(), NotificationError> {
        let (tx, rx) = oneshot::channel::<Result<(), NotificationError>>();

        let cb = RefCell::new(Some(tx));
        let block = RcBlock::new(move |error: *mut NSError| {
            if let Some(sender) = cb.borrow_mut().take() {
                let result = match error_description(error) {
                    Some(description) => Err(NotificationError::SendFailed(description)),
                    None => Ok(()),
                };
                let _ = sender.send(result);
            }
        });

        Self::current().addNotificationRequest_withCompletionHandler(request, Some(&block));

        rx.await
            .map_err(|_| NotificationError::SendFailed("Channel closed".to_string()))?
    }

    pub fn remove_all_delivered_notifications() {
        Self::current().removeAllDeliveredNotifications();
    }
}
