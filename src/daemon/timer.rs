//! Timer engine for the Pomodoro timer.
//!
//! This module provides the phase state machine:
//! - Work → ShortBreak/LongBreak → Work sequencing
//! - Countdown driven by caller-supplied elapsed seconds
//! - Start/pause/skip/reset semantics and the auto-advance policy
//! - Configuration reload with clamping
//!
//! The engine never reads a clock and never performs I/O. Every operation
//! except construction and reload is total: invalid call sequences are no-ops.

use tracing::{info, trace, warn};

use crate::types::{Configuration, ConfigurationError, PhaseKind, PhaseTransition, TimerState};

// ============================================================================
// TimerEngine
// ============================================================================

/// Pomodoro phase state machine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    /// Active, validated configuration
    config: Configuration,
    /// Current timer state
    state: TimerState,
}

impl TimerEngine {
    /// Creates a new engine in the initial AwaitingStart Work phase.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the configuration has a zero duration
    /// or a zero long break cadence.
    pub fn new(config: Configuration) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let state = TimerState::initial(&config);
        Ok(Self { config, state })
    }

    /// Starts or resumes counting.
    ///
    /// Returns true if the state changed.
    pub fn start(&mut self) -> bool {
        if self.state.running || self.state.remaining_seconds == 0 {
            return false;
        }
        self.state.running = true;
        true
    }

    /// Freezes the countdown.
    ///
    /// Returns true if the state changed.
    pub fn pause(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.running = false;
        true
    }

    /// Consumes `elapsed_seconds` of the running phase.
    ///
    /// The countdown is floored at zero. Reaching zero completes the phase
    /// naturally and advances exactly once, no matter how large the elapsed
    /// value was. No time carries over into the next phase.
    pub fn tick(&mut self, elapsed_seconds: u32) -> Option<PhaseTransition> {
        if !self.state.running {
            return None;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(elapsed_seconds);
        trace!(
            phase = self.state.phase.as_str(),
            remaining = self.state.remaining_seconds,
            "tick"
        );

        if self.state.remaining_seconds == 0 {
            Some(self.advance_phase(true))
        } else {
            None
        }
    }

    /// Abandons the current phase and moves to the next one.
    ///
    /// A skipped Work phase never counts toward the cycle.
    pub fn skip(&mut self) -> PhaseTransition {
        self.advance_phase(false)
    }

    /// Re-arms the current phase with its full duration and stops counting.
    pub fn reset_current(&mut self) {
        self.state.remaining_seconds = self.state.total_seconds;
        self.state.running = false;
    }

    /// Returns to the initial session state.
    pub fn reset_all(&mut self) {
        self.state = TimerState::initial(&self.config);
    }

    /// Replaces the configuration.
    ///
    /// Session counts are kept. `cycle_position` is clamped below the new
    /// cadence. An AwaitingStart phase is re-armed with the new duration;
    /// otherwise `remaining_seconds` is clamped to the new total.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the new configuration is invalid. The
    /// previous configuration and state are retained untouched.
    pub fn reload(&mut self, config: Configuration) -> Result<(), ConfigurationError> {
        if let Err(err) = config.validate() {
            warn!(field = err.field(), "Rejected configuration reload: {}", err);
            return Err(err);
        }

        let awaiting_start = self.state.is_awaiting_start();
        let total_seconds = config.seconds_for(self.state.phase);

        self.state.total_seconds = total_seconds;
        self.state.remaining_seconds = if awaiting_start {
            total_seconds
        } else {
            self.state.remaining_seconds.min(total_seconds)
        };
        if self.state.cycle_position >= config.long_break_every {
            self.state.cycle_position = config.long_break_every - 1;
        }

        self.config = config;
        info!(
            phase = self.state.phase.as_str(),
            total = self.state.total_seconds,
            remaining = self.state.remaining_seconds,
            "Configuration reloaded"
        );
        Ok(())
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> TimerState {
        self.state.clone()
    }

    /// Returns a reference to the current state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    fn advance_phase(&mut self, completed_naturally: bool) -> PhaseTransition {
        let previous_phase = self.state.phase;

        let next_phase = match previous_phase {
            PhaseKind::Work => {
                if completed_naturally {
                    self.state.completed_work_count += 1;
                    self.state.cycle_position += 1;
                }
                if self.state.cycle_position >= self.config.long_break_every {
                    self.state.cycle_position = 0;
                    PhaseKind::LongBreak
                } else {
                    PhaseKind::ShortBreak
                }
            }
            PhaseKind::ShortBreak | PhaseKind::LongBreak => PhaseKind::Work,
        };

        let total_seconds = self.config.seconds_for(next_phase);
        self.state.phase = next_phase;
        self.state.total_seconds = total_seconds;
        self.state.remaining_seconds = total_seconds;
        self.state.running = self.config.auto_start_next;

        info!(
            from = previous_phase.as_str(),
            to = next_phase.as_str(),
            completed_naturally,
            completed_work_count = self.state.completed_work_count,
            cycle_position = self.state.cycle_position,
            "Phase transition"
        );

        PhaseTransition {
            previous_phase,
            new_phase: next_phase,
            completed_naturally,
            completed_work_count: self.state.completed_work_count,
            cycle_position: self.state.cycle_position,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
