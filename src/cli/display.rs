//! Terminal output for the pomotimer CLI.
//!
//! `render_*` functions build the text so it can be tested; `show_*`
//! functions print it.

use crate::types::{format_mmss, Configuration, IpcResponse, ResponseData, TimerState};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Prints the daemon's message followed by a one-line state summary.
    pub fn show_action(response: &IpcResponse) {
        println!("{}", Self::render_action(response));
    }

    /// Prints the full status block.
    pub fn show_status(response: &IpcResponse) {
        match &response.data {
            Some(data) => println!("{}", Self::render_status(data)),
            None => println!("No status available"),
        }
    }

    /// Prints a configuration.
    pub fn show_config(config: &Configuration) {
        println!("{}", Self::render_config(config));
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    pub fn render_action(response: &IpcResponse) -> String {
        match &response.data {
            Some(data) => format!("{}\n  {}", response.message, Self::summary(&data.state)),
            None => response.message.clone(),
        }
    }

    pub fn render_status(data: &ResponseData) -> String {
        let state = &data.state;
        let permille = state.progress_permille();
        [
            "Pomodoro Timer".to_string(),
            "─────────────────────────────".to_string(),
            format!("Phase:      {}", state.phase.label()),
            format!("State:      {}", Self::run_label(state)),
            format!(
                "Remaining:  {} / {}",
                format_mmss(state.remaining_seconds),
                format_mmss(state.total_seconds)
            ),
            format!("Progress:   {}", Self::progress_bar(permille)),
            format!("Completed:  {}", state.completed_work_count),
            format!(
                "Cycle:      {}/{}",
                state.cycle_position, data.config.long_break_every
            ),
        ]
        .join("\n")
    }

    pub fn render_config(config: &Configuration) -> String {
        [
            format!("work:        {} min", config.work_minutes),
            format!("short break: {} min", config.short_break_minutes),
            format!("long break:  {} min", config.long_break_minutes),
            format!("every:       {} work phases", config.long_break_every),
            format!("auto start:  {}", Self::on_off(config.auto_start_next)),
            format!("sound:       {}", Self::on_off(config.sound_on)),
        ]
        .join("\n")
    }

    /// "Work 24:59 (running)"
    fn summary(state: &TimerState) -> String {
        format!(
            "{} {} ({})",
            state.phase.label(),
            format_mmss(state.remaining_seconds),
            Self::run_label(state)
        )
    }

    fn run_label(state: &TimerState) -> &'static str {
        if state.running {
            "running"
        } else if state.is_awaiting_start() {
            "waiting to start"
        } else {
            "paused"
        }
    }

    fn on_off(value: bool) -> &'static str {
        if value {
            "on"
        } else {
            "off"
        }
    }

    /// Renders a 20-cell bar with a percentage, e.g. `[#####...............] 25%`.
    fn progress_bar(permille: u32) -> String {
        const WIDTH: usize = 20;
        let filled = (permille.min(1000) as usize * WIDTH) / 1000;
        format!(
            "[{}{}] {}%",
            "#".repeat(filled),
            ".".repeat(WIDTH - filled),
            permille / 10
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
