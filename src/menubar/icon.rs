//! Title generation for the menu bar.
//!
//! Format: phase emoji and remaining time (e.g. "🍅 15:30"), with a "⏸"
//! prefix while the countdown is not running.

use crate::types::{format_mmss, PhaseKind, TimerState};

/// Emoji for work
const WORK_EMOJI: &str = "🍅";

/// Emoji for a short break
const SHORT_BREAK_EMOJI: &str = "☕";

/// Emoji for a long break
const LONG_BREAK_EMOJI: &str = "🌴";

/// Prefix while not counting
const PAUSED_PREFIX: &str = "⏸";

/// Generates menu bar titles.
#[derive(Debug, Default)]
pub struct IconManager {
    /// Last phase seen by [`IconManager::phase_changed`]
    last_phase: Option<PhaseKind>,
}

impl IconManager {
    pub fn new() -> Self {
        Self { last_phase: None }
    }

    /// Generates the title text for display in the menu bar.
    pub fn generate_title(&self, state: &TimerState) -> String {
        let title = format!(
            "{} {}",
            Self::emoji(state.phase),
            format_mmss(state.remaining_seconds)
        );
        if state.running {
            title
        } else {
            format!("{} {}", PAUSED_PREFIX, title)
        }
    }

    /// Returns the emoji for a phase.
    pub fn emoji(phase: PhaseKind) -> &'static str {
        match phase {
            PhaseKind::Work => WORK_EMOJI,
            PhaseKind::ShortBreak => SHORT_BREAK_EMOJI,
            PhaseKind::LongBreak => LONG_BREAK_EMOJI,
        }
    }

    /// Returns true the first time a new phase is seen.
    pub fn phase_changed(&mut self, phase: PhaseKind) -> bool {
        let changed = self.last_phase != Some(phase);
        if changed {
            self.last_phase = Some(phase);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Configuration;

    fn state_with(phase: PhaseKind, remaining: u32, running: bool) -> TimerState {
        let mut state = TimerState::initial(&Configuration::default());
        state.phase = phase;
        state.remaining_seconds = remaining;
        state.running = running;
        state
    }

    #[test]
    fn test_title_work_running() {
        let manager = IconManager::new();
        assert_eq!(
            manager.generate_title(&state_with(PhaseKind::Work, 930, true)),
            "🍅 15:30"
        );
    }

    #[test]
    fn test_title_breaks() {
        let manager = IconManager::new();
        assert_eq!(
            manager.generate_title(&state_with(PhaseKind::ShortBreak, 300, true)),
            "☕ 05:00"
        );
        assert_eq!(
            manager.generate_title(&state_with(PhaseKind::LongBreak, 61, true)),
            "🌴 01:01"
        );
    }

    #[test]
    fn test_title_not_running() {
        let manager = IconManager::new();
        let state = TimerState::initial(&Configuration::default());
        assert_eq!(manager.generate_title(&state), "⏸ 🍅 25:00");
    }

    #[test]
    fn test_phase_changed() {
        let mut manager = IconManager::new();
        assert!(manager.phase_changed(PhaseKind::Work));
        assert!(!manager.phase_changed(PhaseKind::Work));
        assert!(manager.phase_changed(PhaseKind::ShortBreak));
    }
}
