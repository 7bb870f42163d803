//! Notification delegate implementation.
//!
//! Implements `UNUserNotificationCenterDelegate` so toasts show while the
//! daemon is frontmost and action button clicks reach the daemon.

use std::sync::mpsc::Sender;

use block2::Block;
use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2::{define_class, msg_send, DefinedClass, MainThreadMarker, MainThreadOnly};
use objc2_foundation::{NSObject, NSObjectProtocol};
use objc2_user_notifications::{
    UNNotification, UNNotificationPresentationOptions, UNNotificationResponse,
    UNUserNotificationCenter, UNUserNotificationCenterDelegate,
};

use super::actions::NotificationActionEvent;

/// Instance variables for the notification delegate.
pub struct NotificationDelegateIvars {
    /// Channel sender for notification action events.
    action_sender: Sender<NotificationActionEvent>,
}

define_class!(
    /// Delegate that forwards notification interaction to the daemon.
    // SAFETY:
    // - The superclass NSObject does not have any subclassing requirements.
    // - `NotificationDelegate` does not implement `Drop`.
    #[unsafe(super(NSObject))]
    #[ivars = NotificationDelegateIvars]
    #[name = "PomotimerNotificationDelegate"]
    #[thread_kind = MainThreadOnly]
    pub struct NotificationDelegate;

    impl NotificationDelegate {}

    unsafe impl NSObjectProtocol for NotificationDelegate {}

    unsafe impl UNUserNotificationCenterDelegate for NotificationDelegate {
        #[unsafe(method(userNotificationCenter:willPresentNotification:withCompletionHandler:))]
        fn will_present_notification(
            &self,
            _center: &UNUserNotificationCenter,
            _notification: &UNNotification,
            completion_handler: &Block<dyn Fn(UNNotificationPresentationOptions)>,
        ) {
            let options = UNNotificationPresentationOptions::Banner
                | UNNotificationPresentationOptions::Sound;

            completion_handler.call((options,));
        }

        #[unsafe(method(userNotificationCenter:didReceiveNotificationResponse:withCompletionHandler:))]
        fn did_receive_notification_response(
            &self,
            _center: &UNUserNotificationCenter,
            response: &UNNotificationResponse,
            completion_handler: &Block<dyn Fn()>,
        ) {
            let identifier = response.actionIdentifier().to_string();

            if let Some(event) = NotificationActionEvent::from_identifier(&identifier) {
                let _ = self.ivars().action_sender.send(event);
            }

            // Must always be called
            completion_handler.call(());
        }
    }
);

impl NotificationDelegate {
    /// Creates a delegate that forwards action events to `action_sender`.
    #[must_use]
    pub fn new(
        mtm: MainThreadMarker,
        action_sender: Sender<NotificationActionEvent>,
    ) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(NotificationDelegateIvars { action_sender });
        unsafe { msg_send![super(this), init] }
    }

    /// Converts a retained delegate to a protocol object.
    #[must_use]
    pub fn as_protocol(
        delegate: &Retained<Self>,
    ) -> Retained<ProtocolObject<dyn UNUserNotificationCenterDelegate>> {
        ProtocolObject::from_retained(delegate.clone())
    }
}
