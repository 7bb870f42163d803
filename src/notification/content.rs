//! Notification content.
//!
//! [`CompletionMessage`] is the platform-independent toast text. On macOS it
//! is turned into a `UNMutableNotificationContent` through
//! [`NotificationContentBuilder`].

use crate::types::{PhaseKind, PhaseTransition};

use super::actions::category_ids;

#[cfg(target_os = "macos")]
use objc2::rc::Retained;
#[cfg(target_os = "macos")]
use objc2_foundation::NSString;
#[cfg(target_os = "macos")]
use objc2_user_notifications::{UNMutableNotificationContent, UNNotificationSound};

/// Application title shown on every toast.
pub const APP_TITLE: &str = "Pomodoro Timer";

/// Text and action set of a phase-completion toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionMessage {
    /// Toast title
    pub title: String,
    /// Toast body
    pub body: String,
    /// Category identifier selecting the action buttons
    pub category: &'static str,
}

impl CompletionMessage {
    /// Builds the toast for a natural phase completion.
    ///
    /// `awaiting_start` is true when the new phase waits for the user, in
    /// which case the toast offers a "Start" action.
    #[must_use]
    pub fn for_transition(transition: &PhaseTransition, awaiting_start: bool) -> Self {
        let finished = if transition.previous_phase.is_break() {
            "Break"
        } else {
            "Work"
        };
        let icon = match transition.new_phase {
            PhaseKind::Work => "🍅",
            PhaseKind::ShortBreak => "☕",
            PhaseKind::LongBreak => "🌴",
        };

        let mut body = format!(
            "{} finished, next: {}",
            finished,
            transition.new_phase.label()
        );
        if awaiting_start {
            body.push_str("\n\nStart the next phase?");
        }

        Self {
            title: format!("{} {}", icon, APP_TITLE),
            body,
            category: if awaiting_start {
                category_ids::AWAITING_START
            } else {
                category_ids::RUNNING
            },
        }
    }
}

/// Builder for constructing notification content.
#[cfg(target_os = "macos")]
pub struct NotificationContentBuilder {
    content: Retained<UNMutableNotificationContent>,
}

#[cfg(target_os = "macos")]
impl NotificationContentBuilder {
    /// Creates a new notification content builder.
    #[must_use]
    pub fn new() -> Self {
        let content = unsafe { UNMutableNotificationContent::new() };
        Self { content }
    }

    /// Sets the notification title.
    #[must_use]
    pub fn title(self, title: &str) -> Self {
        let title = NSString::from_str(title);
        unsafe {
            self.content.setTitle(&title);
        }
        self
    }

    /// Sets the notification body text.
    #[must_use]
    pub fn body(self, body: &str) -> Self {
        let body = NSString::from_str(body);
        unsafe {
            self.content.setBody(&body);
        }
        self
    }

    /// Sets the category identifier for action buttons.
    #[must_use]
    pub fn category_identifier(self, category_id: &str) -> Self {
        let category_id = NSString::from_str(category_id);
        unsafe {
            self.content.setCategoryIdentifier(&category_id);
        }
        self
    }

    /// Uses the default system sound.
    #[must_use]
    pub fn default_sound(self) -> Self {
        let sound = unsafe { UNNotificationSound::defaultSound() };
        unsafe {
            self.content.setSound(Some(&sound));
        }
        self
    }

    /// Builds and returns the notification content.
    #[must_use]
    pub fn build(self) -> Retained<UNMutableNotificationContent> {
        self.content
    }
}

#[cfg(target_os = "macos")]
impl Default for NotificationContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a completion message into native content.
///
/// The cue is played by the sound module, so the toast itself is silent
/// unless `with_sound` is set.
#[cfg(target_os = "macos")]
#[must_use]
pub fn create_content(
    message: &CompletionMessage,
    with_sound: bool,
) -> Retained<UNMutableNotificationContent> {
    let builder = NotificationContentBuilder::new()
        .title(&message.title)
        .body(&message.body)
        .category_identifier(message.category);

    if with_sound {
        builder.default_sound().build()
    } else {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition(previous: PhaseKind, next: PhaseKind) -> PhaseTransition {
        PhaseTransition {
            previous_phase: previous,
            new_phase: next,
            completed_naturally: true,
            completed_work_count: 1,
            cycle_position: 1,
        }
    }

    #[test]
    fn test_work_finished_message() {
        let message = CompletionMessage::for_transition(
            &transition(PhaseKind::Work, PhaseKind::ShortBreak),
            false,
        );

        assert_eq!(message.body, "Work finished, next: Short break");
        assert!(message.title.contains(APP_TITLE));
        assert!(message.title.starts_with('☕'));
        assert_eq!(message.category, category_ids::RUNNING);
    }

    #[test]
    fn test_break_finished_message() {
        let message = CompletionMessage::for_transition(
            &transition(PhaseKind::LongBreak, PhaseKind::Work),
            false,
        );

        assert_eq!(message.body, "Break finished, next: Work");
        assert!(message.title.starts_with('🍅'));
    }

    #[test]
    fn test_awaiting_start_offers_confirmation() {
        let message = CompletionMessage::for_transition(
            &transition(PhaseKind::Work, PhaseKind::LongBreak),
            true,
        );

        assert!(message.body.starts_with("Work finished, next: Long break"));
        assert!(message.body.contains("Start the next phase?"));
        assert_eq!(message.category, category_ids::AWAITING_START);
    }
}
