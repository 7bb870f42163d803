//! Menu model for the menu bar.
//!
//! The menu layout is fixed; only texts and enabled flags follow the timer
//! state. Native menu creation with tray-icon happens in the parent module.

use crate::types::{format_mmss, TimerState};

use super::event::MenuItemId;

/// Number of status lines in the menu.
pub const STATUS_LINE_COUNT: usize = 5;

/// Configuration for a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemConfig {
    /// Display text
    pub text: String,
    /// Whether the item is clickable
    pub enabled: bool,
}

impl MenuItemConfig {
    pub fn new(text: impl Into<String>, enabled: bool) -> Self {
        Self {
            text: text.into(),
            enabled,
        }
    }
}

/// Complete menu configuration for a timer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Title item (disabled)
    pub title: MenuItemConfig,
    /// Status lines (disabled)
    pub status_items: Vec<MenuItemConfig>,
    pub start: MenuItemConfig,
    pub pause: MenuItemConfig,
    pub skip: MenuItemConfig,
    pub reset: MenuItemConfig,
    pub reset_all: MenuItemConfig,
    pub quit: MenuItemConfig,
}

impl MenuConfig {
    /// Returns the clickable items paired with their identifiers, in menu order.
    pub fn actions(&self) -> [(MenuItemId, &MenuItemConfig); 6] {
        [
            (MenuItemId::Start, &self.start),
            (MenuItemId::Pause, &self.pause),
            (MenuItemId::Skip, &self.skip),
            (MenuItemId::Reset, &self.reset),
            (MenuItemId::ResetAll, &self.reset_all),
            (MenuItemId::Quit, &self.quit),
        ]
    }
}

/// Builds menu configuration from timer state.
#[derive(Debug, Default)]
pub struct MenuBuilder;

impl MenuBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the menu for `state`. `long_break_every` is shown in the cycle line.
    pub fn build(&self, state: &TimerState, long_break_every: u32) -> MenuConfig {
        let start_label = if state.is_awaiting_start() {
            "▶ Start"
        } else {
            "▶ Resume"
        };

        MenuConfig {
            title: MenuItemConfig::new("Pomodoro Timer", false),
            status_items: self.build_status_items(state, long_break_every),
            start: MenuItemConfig::new(start_label, Self::is_start_enabled(state)),
            pause: MenuItemConfig::new("⏸ Pause", Self::is_pause_enabled(state)),
            skip: MenuItemConfig::new("⏭ Skip", true),
            reset: MenuItemConfig::new("↺ Reset", Self::is_reset_enabled(state)),
            reset_all: MenuItemConfig::new("⟲ Reset all", true),
            quit: MenuItemConfig::new("Quit", true),
        }
    }

    fn build_status_items(&self, state: &TimerState, long_break_every: u32) -> Vec<MenuItemConfig> {
        let permille = state.progress_permille();
        vec![
            MenuItemConfig::new(format!("Phase: {}", state.phase.label()), false),
            MenuItemConfig::new(
                format!("Remaining: {}", format_mmss(state.remaining_seconds)),
                false,
            ),
            MenuItemConfig::new(
                format!("Progress: {}.{}%", permille / 10, permille % 10),
                false,
            ),
            MenuItemConfig::new(
                format!("Completed: {}", state.completed_work_count),
                false,
            ),
            MenuItemConfig::new(
                format!("Cycle: {}/{}", state.cycle_position, long_break_every),
                false,
            ),
        ]
    }

    /// Start is offered whenever the countdown is stopped.
    pub fn is_start_enabled(state: &TimerState) -> bool {
        !state.running && state.remaining_seconds > 0
    }

    /// Pause is offered while counting.
    pub fn is_pause_enabled(state: &TimerState) -> bool {
        state.running
    }

    /// Reset is offered once time has been consumed or while counting.
    pub fn is_reset_enabled(state: &TimerState) -> bool {
        !state.is_awaiting_start()
    }
}
