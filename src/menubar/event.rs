//! Event handling for menu bar interactions.
//!
//! Menu item identifiers, the actions they trigger, and the update messages
//! the presenter sends to the tray. All of it is platform-independent.

use std::fmt;

use crate::daemon::runner::Command;
use crate::types::TimerState;

// ============================================================================
// MenuAction
// ============================================================================

/// Actions that can be triggered from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Start or resume counting
    Start,
    /// Pause counting
    Pause,
    /// Skip the current phase
    Skip,
    /// Re-arm the current phase
    Reset,
    /// Reset the whole session
    ResetAll,
    /// Quit the daemon
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuAction::Start => "start",
            MenuAction::Pause => "pause",
            MenuAction::Skip => "skip",
            MenuAction::Reset => "reset",
            MenuAction::ResetAll => "reset_all",
            MenuAction::Quit => "quit",
        })
    }
}

impl MenuAction {
    /// Returns the timer command for this action, `None` for [`MenuAction::Quit`].
    pub fn to_command(self) -> Option<Command> {
        match self {
            MenuAction::Start => Some(Command::Start),
            MenuAction::Pause => Some(Command::Pause),
            MenuAction::Skip => Some(Command::Skip),
            MenuAction::Reset => Some(Command::ResetCurrent),
            MenuAction::ResetAll => Some(Command::ResetAll),
            MenuAction::Quit => None,
        }
    }
}

// ============================================================================
// MenuItemId
// ============================================================================

/// Identifiers for clickable menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    Start,
    Pause,
    Skip,
    Reset,
    ResetAll,
    Quit,
    /// Unknown or non-clickable item
    Unknown,
}

impl MenuItemId {
    /// All clickable items.
    pub const ALL: [MenuItemId; 6] = [
        MenuItemId::Start,
        MenuItemId::Pause,
        MenuItemId::Skip,
        MenuItemId::Reset,
        MenuItemId::ResetAll,
        MenuItemId::Quit,
    ];

    /// Returns the string identifier registered with the native menu.
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuItemId::Start => "pomotimer.start",
            MenuItemId::Pause => "pomotimer.pause",
            MenuItemId::Skip => "pomotimer.skip",
            MenuItemId::Reset => "pomotimer.reset",
            MenuItemId::ResetAll => "pomotimer.reset_all",
            MenuItemId::Quit => "pomotimer.quit",
            MenuItemId::Unknown => "pomotimer.unknown",
        }
    }

    /// Parses a native menu identifier.
    pub fn from_id(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|item| item.as_str() == id)
            .unwrap_or(MenuItemId::Unknown)
    }

    /// Converts a menu item ID to the corresponding action.
    pub fn to_action(&self) -> Option<MenuAction> {
        match self {
            MenuItemId::Start => Some(MenuAction::Start),
            MenuItemId::Pause => Some(MenuAction::Pause),
            MenuItemId::Skip => Some(MenuAction::Skip),
            MenuItemId::Reset => Some(MenuAction::Reset),
            MenuItemId::ResetAll => Some(MenuAction::ResetAll),
            MenuItemId::Quit => Some(MenuAction::Quit),
            MenuItemId::Unknown => None,
        }
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Converts menu clicks to actions.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Returns the action for a clicked item, or `None` for inert items.
    pub fn handle_click(&self, item_id: MenuItemId) -> Option<MenuAction> {
        let action = item_id.to_action();
        if let Some(action) = action {
            tracing::debug!(action = %action, "Menu bar action received");
        }
        action
    }
}

// ============================================================================
// TrayUpdate
// ============================================================================

/// Messages sent from the presenter to the tray.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayUpdate {
    /// Redraw title and menu for this state
    Refresh {
        /// Latest timer state
        state: TimerState,
        /// Active long break cadence, for the cycle line
        long_break_every: u32,
    },
    /// Remove the tray icon
    Shutdown,
}
