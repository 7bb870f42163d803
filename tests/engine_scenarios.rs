//! Phase scenarios driven through the runner with synthetic clock readings.
//!
//! These exercise the engine the way the daemon does: elapsed time comes
//! from `Instant` deltas polled at a sub-second cadence, and commands go
//! through `TimerRunner::apply`.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use pomotimer::daemon::runner::{Command, TimerEvent, TimerRunner};
use pomotimer::daemon::timer::TimerEngine;
use pomotimer::types::{Configuration, PhaseKind, PhaseTransition};

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    runner: TimerRunner,
    events: mpsc::UnboundedReceiver<TimerEvent>,
    now: Instant,
}

impl Harness {
    fn new(config: Configuration) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(config).unwrap();
        Self {
            runner: TimerRunner::new(engine, tx),
            events,
            now: Instant::now(),
        }
    }

    fn command(&mut self, command: Command) {
        self.runner.apply(command, self.now).unwrap();
    }

    /// Advances the clock in `step` increments, polling after each one.
    fn run_for(&mut self, total: Duration, step: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            self.now += step;
            elapsed += step;
            self.runner.on_tick(self.now);
        }
    }

    fn transitions(&mut self) -> Vec<PhaseTransition> {
        let mut transitions = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if let TimerEvent::PhaseChanged(t) = event {
                transitions.push(t);
            }
        }
        transitions
    }
}

const POLL: Duration = Duration::from_millis(200);

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_a_work_completes_into_short_break() {
    let mut h = Harness::new(Configuration::default());

    h.command(Command::Start);
    h.run_for(Duration::from_secs(1500), POLL);

    let state = h.runner.engine().state();
    assert_eq!(state.phase, PhaseKind::ShortBreak);
    assert_eq!(state.remaining_seconds, 300);
    assert_eq!(state.completed_work_count, 1);
    assert_eq!(state.cycle_position, 1);
    assert!(state.running);

    let transitions = h.transitions();
    assert_eq!(transitions.len(), 1);
    assert!(transitions[0].completed_naturally);
}

#[test]
fn test_scenario_b_fourth_work_inserts_long_break() {
    let mut h = Harness::new(Configuration::default());

    h.command(Command::Start);
    // Four work phases and three short breaks
    h.run_for(Duration::from_secs(4 * 1500 + 3 * 300), Duration::from_secs(1));

    let state = h.runner.engine().state();
    assert_eq!(state.phase, PhaseKind::LongBreak);
    assert_eq!(state.remaining_seconds, 900);
    assert_eq!(state.completed_work_count, 4);
    assert_eq!(state.cycle_position, 0);

    let long_breaks = h
        .transitions()
        .iter()
        .filter(|t| t.new_phase == PhaseKind::LongBreak)
        .count();
    assert_eq!(long_breaks, 1);
}

#[test]
fn test_scenario_c_manual_start_waits() {
    let mut h = Harness::new(Configuration::default().with_auto_start_next(false));

    h.command(Command::Start);
    h.run_for(Duration::from_secs(1500), POLL);
    h.run_for(Duration::from_secs(120), POLL);

    let state = h.runner.engine().state();
    assert_eq!(state.phase, PhaseKind::ShortBreak);
    assert!(!state.running);
    assert!(state.is_awaiting_start());

    h.command(Command::Start);
    h.run_for(Duration::from_secs(10), POLL);
    assert_eq!(h.runner.engine().state().remaining_seconds, 290);
}

#[test]
fn test_scenario_d_skip_mid_work_does_not_count() {
    let mut h = Harness::new(Configuration::default());

    h.command(Command::Start);
    h.run_for(Duration::from_secs(900), POLL);
    assert_eq!(h.runner.engine().state().remaining_seconds, 600);

    h.command(Command::Skip);

    let state = h.runner.engine().state();
    assert_eq!(state.phase, PhaseKind::ShortBreak);
    assert_eq!(state.completed_work_count, 0);
    assert_eq!(state.cycle_position, 0);
    let transitions = h.transitions();
    assert_eq!(transitions.len(), 1);
    assert!(!transitions[0].completed_naturally);
}

#[test]
fn test_sleep_gap_advances_exactly_once() {
    let mut h = Harness::new(Configuration::default());

    h.command(Command::Start);
    h.run_for(Duration::from_secs(1500 + 1000), Duration::from_secs(1500 + 1000));

    let state = h.runner.engine().state();
    assert_eq!(state.phase, PhaseKind::ShortBreak);
    assert_eq!(state.remaining_seconds, 300);
    assert_eq!(h.transitions().len(), 1);
}

#[test]
fn test_pause_keeps_elapsed_seconds_and_stops_counting() {
    let mut h = Harness::new(Configuration::default());

    h.command(Command::Start);
    h.run_for(Duration::from_millis(3400), POLL);
    h.command(Command::Pause);
    h.command(Command::Pause);
    h.run_for(Duration::from_secs(60), POLL);

    let state = h.runner.engine().state();
    assert!(!state.running);
    assert_eq!(state.remaining_seconds, 1497);
}

#[test]
fn test_reload_mid_phase_clamps_remaining() {
    let mut h = Harness::new(Configuration::default());

    h.command(Command::Start);
    h.run_for(Duration::from_secs(60), POLL);
    h.command(Command::Reload(
        Configuration::default().with_work_minutes(10),
    ));

    let state = h.runner.engine().state();
    assert_eq!(state.total_seconds, 600);
    assert_eq!(state.remaining_seconds, 600);
    assert!(state.running);
}

#[test]
fn test_invariants_hold_over_mixed_usage() {
    let config = Configuration::default()
        .with_work_minutes(2)
        .with_short_break_minutes(1)
        .with_long_break_minutes(3)
        .with_long_break_every(3);
    let mut h = Harness::new(config.clone());
    let script = [
        Command::Start,
        Command::Skip,
        Command::Pause,
        Command::Start,
        Command::ResetCurrent,
        Command::Start,
        Command::Reload(config.clone().with_long_break_every(2)),
        Command::Skip,
        Command::Start,
    ];

    for command in script.iter().cycle().take(60) {
        h.command(command.clone());
        h.run_for(Duration::from_secs(97), POLL);

        let state = h.runner.engine().state();
        let every = h.runner.engine().config().long_break_every;
        assert!(state.remaining_seconds <= state.total_seconds);
        assert!(state.cycle_position < every);
    }
}
