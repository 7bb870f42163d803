//! Notification actions and categories.
//!
//! A toast sent while the next phase waits for the user carries "Start" and
//! "Skip" buttons; a toast for a phase that already started only offers "Skip".

use crate::daemon::runner::Command;

#[cfg(target_os = "macos")]
use objc2::rc::Retained;
#[cfg(target_os = "macos")]
use objc2_foundation::{NSArray, NSString};
#[cfg(target_os = "macos")]
use objc2_user_notifications::{
    UNNotificationAction, UNNotificationActionOptions, UNNotificationCategory,
    UNNotificationCategoryOptions,
};

/// Notification action identifiers.
pub mod action_ids {
    /// Start the phase that is waiting.
    pub const START: &str = "START_ACTION";
    /// Skip the new phase.
    pub const SKIP: &str = "SKIP_ACTION";
    /// System identifier for clicking the notification body.
    pub const DEFAULT: &str = "com.apple.UNNotificationDefaultActionIdentifier";
    /// System identifier for dismissing the notification.
    pub const DISMISS: &str = "com.apple.UNNotificationDismissActionIdentifier";
}

/// Notification category identifiers.
pub mod category_ids {
    /// Next phase is waiting for the user.
    pub const AWAITING_START: &str = "PHASE_AWAITING_START";
    /// Next phase is already counting.
    pub const RUNNING: &str = "PHASE_RUNNING";
}

/// Events triggered by notification interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationActionEvent {
    /// User clicked "Start".
    StartNext,
    /// User clicked "Skip".
    Skip,
    /// User clicked the notification itself.
    Default,
    /// User dismissed the notification.
    Dismiss,
}

impl NotificationActionEvent {
    /// Maps an action identifier to an event.
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            action_ids::START => Some(Self::StartNext),
            action_ids::SKIP => Some(Self::Skip),
            action_ids::DEFAULT => Some(Self::Default),
            action_ids::DISMISS => Some(Self::Dismiss),
            _ => None,
        }
    }

    /// Returns the timer command this event requests, if any.
    #[must_use]
    pub fn to_command(self) -> Option<Command> {
        match self {
            Self::StartNext => Some(Command::Start),
            Self::Skip => Some(Command::Skip),
            Self::Default | Self::Dismiss => None,
        }
    }
}

#[cfg(target_os = "macos")]
fn create_action(
    identifier: &str,
    title: &str,
    options: UNNotificationActionOptions,
) -> Retained<UNNotificationAction> {
    let identifier = NSString::from_str(identifier);
    let title = NSString::from_str(title);

    unsafe { UNNotificationAction::actionWithIdentifier_title_options(&identifier, &title, options) }
}

#[cfg(target_os = "macos")]
fn create_category(
    identifier: &str,
    actions: &[Retained<UNNotificationAction>],
) -> Retained<UNNotificationCategory> {
    let identifier = NSString::from_str(identifier);

    let actions_array: Retained<NSArray<UNNotificationAction>> = unsafe {
        let refs: Vec<&UNNotificationAction> = actions.iter().map(|a| a.as_ref()).collect();
        NSArray::from_slice(&refs)
    };
    let intent_identifiers: Retained<NSArray<NSString>> =
        unsafe { NSArray::from_slice(&[] as &[&NSString]) };

    unsafe {
        UNNotificationCategory::categoryWithIdentifier_actions_intentIdentifiers_options(
            &identifier,
            &actions_array,
            &intent_identifiers,
            UNNotificationCategoryOptions::empty(),
        )
    }
}

/// Creates both notification categories.
#[cfg(target_os = "macos")]
#[must_use]
pub fn create_categories() -> Vec<Retained<UNNotificationCategory>> {
    let start = create_action(
        action_ids::START,
        "Start",
        UNNotificationActionOptions::empty(),
    );
    let skip = create_action(
        action_ids::SKIP,
        "Skip",
        UNNotificationActionOptions::Destructive,
    );

    vec![
        create_category(category_ids::AWAITING_START, &[start, skip.clone()]),
        create_category(category_ids::RUNNING, &[skip]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_identifier() {
        assert_eq!(
            NotificationActionEvent::from_identifier(action_ids::START),
            Some(NotificationActionEvent::StartNext)
        );
        assert_eq!(
            NotificationActionEvent::from_identifier(action_ids::SKIP),
            Some(NotificationActionEvent::Skip)
        );
        assert_eq!(
            NotificationActionEvent::from_identifier(action_ids::DISMISS),
            Some(NotificationActionEvent::Dismiss)
        );
        assert_eq!(NotificationActionEvent::from_identifier("OTHER"), None);
    }

    #[test]
    fn test_to_command() {
        assert_eq!(
            NotificationActionEvent::StartNext.to_command(),
            Some(Command::Start)
        );
        assert_eq!(NotificationActionEvent::Skip.to_command(), Some(Command::Skip));
        assert_eq!(NotificationActionEvent::Default.to_command(), None);
        assert_eq!(NotificationActionEvent::Dismiss.to_command(), None);
    }
}
