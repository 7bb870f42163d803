//! Command queue and the single consumer that owns the timer engine.
//!
//! IPC connections, tray menu clicks and notification actions never touch the
//! engine directly. They enqueue a [`Command`]; the [`TimerRunner`] applies
//! commands one at a time in arrival order, feeds the engine elapsed seconds
//! from an [`ElapsedClock`], and publishes [`TimerEvent`]s for the presenter.

use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::clock::ElapsedClock;
use super::timer::TimerEngine;
use crate::types::{Configuration, ConfigurationError, PhaseKind, PhaseTransition, TimerState};

/// Capacity of the command queue.
pub const COMMAND_QUEUE_CAPACITY: usize = 64;

// ============================================================================
// Command
// ============================================================================

/// A request to mutate or inspect the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start or resume counting
    Start,
    /// Freeze the countdown
    Pause,
    /// Abandon the current phase
    Skip,
    /// Re-arm the current phase
    ResetCurrent,
    /// Return to the initial session state
    ResetAll,
    /// Replace the configuration
    Reload(Configuration),
    /// Read-only snapshot query
    Snapshot,
}

impl Command {
    /// Returns a short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Skip => "skip",
            Command::ResetCurrent => "reset",
            Command::ResetAll => "reset_all",
            Command::Reload(_) => "reload",
            Command::Snapshot => "status",
        }
    }
}

/// State and configuration after a command was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Timer snapshot
    pub state: TimerState,
    /// Active configuration
    pub config: Configuration,
}

/// Result of a single command.
pub type CommandReply = Result<CommandOutcome, ConfigurationError>;

/// A queued command with an optional reply channel.
#[derive(Debug)]
pub struct CommandEnvelope {
    /// The command to apply
    pub command: Command,
    /// Where to send the outcome, `None` for fire-and-forget producers
    pub reply: Option<oneshot::Sender<CommandReply>>,
}

/// Producer handle for the command queue.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<CommandEnvelope>,
}

/// Creates the command queue.
pub fn command_queue() -> (CommandSender, mpsc::Receiver<CommandEnvelope>) {
    let (tx, rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    (CommandSender { tx }, rx)
}

impl CommandSender {
    /// Enqueues a command and waits for its outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the runner has shut down. A rejected configuration
    /// is reported through the inner [`CommandReply`].
    pub async fn request(&self, command: Command) -> Result<CommandReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(CommandEnvelope {
                command,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| anyhow!("Timer runner is not running"))?;

        reply_rx.await.context("Timer runner dropped the reply")
    }

    /// Enqueues a command without waiting.
    ///
    /// Returns false if the queue is full or closed.
    pub fn dispatch(&self, command: Command) -> bool {
        let name = command.name();
        match self.tx.try_send(CommandEnvelope {
            command,
            reply: None,
        }) {
            Ok(()) => true,
            Err(err) => {
                warn!(command = name, "Failed to enqueue command: {}", err);
                false
            }
        }
    }
}

// ============================================================================
// TimerEvent
// ============================================================================

/// State changes published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Remaining time changed
    Tick {
        /// Current phase
        phase: PhaseKind,
        /// Seconds left
        remaining_seconds: u32,
        /// Full phase duration
        total_seconds: u32,
    },
    /// A phase ended, naturally or by skip
    PhaseChanged(PhaseTransition),
    /// Counting started or resumed
    Started,
    /// Counting paused
    Paused,
    /// Current phase re-armed
    Reset {
        /// Phase that was re-armed
        phase: PhaseKind,
    },
    /// Session returned to its initial state
    SessionReset,
    /// A new configuration was accepted
    ConfigurationReloaded(Configuration),
}

// ============================================================================
// TimerRunner
// ============================================================================

/// Single consumer of the command queue.
pub struct TimerRunner {
    engine: TimerEngine,
    clock: ElapsedClock,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerRunner {
    /// Creates a runner around an engine.
    pub fn new(engine: TimerEngine, event_tx: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            engine,
            clock: ElapsedClock::new(),
            event_tx,
        }
    }

    /// Returns the owned engine.
    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    /// Applies a queued command and sends its reply.
    pub fn handle(&mut self, envelope: CommandEnvelope, now: Instant) {
        let reply = self.apply(envelope.command, now);
        if let Some(reply_tx) = envelope.reply {
            // The requester may have given up waiting
            let _ = reply_tx.send(reply);
        }
    }

    /// Applies a command to the engine.
    pub fn apply(&mut self, command: Command, now: Instant) -> CommandReply {
        debug!(command = command.name(), "Applying command");

        match command {
            Command::Start => {
                if self.engine.start() {
                    self.clock.resume(now);
                    self.emit(TimerEvent::Started);
                    self.emit_tick();
                }
            }
            Command::Pause => {
                // Whole seconds already elapsed still count
                self.on_tick(now);
                if self.engine.pause() {
                    self.clock.halt();
                    self.emit(TimerEvent::Paused);
                    self.emit_tick();
                }
            }
            Command::Skip => {
                let transition = self.engine.skip();
                self.after_transition(transition, now);
            }
            Command::ResetCurrent => {
                self.engine.reset_current();
                self.clock.halt();
                self.emit(TimerEvent::Reset {
                    phase: self.engine.state().phase,
                });
                self.emit_tick();
            }
            Command::ResetAll => {
                self.engine.reset_all();
                self.clock.halt();
                self.emit(TimerEvent::SessionReset);
                self.emit_tick();
            }
            Command::Reload(config) => {
                self.engine.reload(config.clone())?;
                self.emit(TimerEvent::ConfigurationReloaded(config));
                self.emit_tick();
            }
            Command::Snapshot => {}
        }

        Ok(self.outcome())
    }

    /// Feeds elapsed whole seconds to the engine.
    pub fn on_tick(&mut self, now: Instant) {
        if !self.engine.state().running {
            self.clock.halt();
            return;
        }

        self.clock.resume(now);
        let elapsed = self.clock.advance(now);
        if elapsed == 0 {
            return;
        }

        match self.engine.tick(elapsed) {
            Some(transition) => self.after_transition(transition, now),
            None => self.emit_tick(),
        }
    }

    /// Returns the current state and configuration.
    pub fn outcome(&self) -> CommandOutcome {
        CommandOutcome {
            state: self.engine.snapshot(),
            config: self.engine.config().clone(),
        }
    }

    fn after_transition(&mut self, transition: PhaseTransition, now: Instant) {
        if self.engine.state().running {
            self.clock.restart(now);
        } else {
            self.clock.halt();
        }
        self.emit(TimerEvent::PhaseChanged(transition));
        self.emit_tick();
    }

    fn emit_tick(&self) {
        let state = self.engine.state();
        self.emit(TimerEvent::Tick {
            phase: state.phase,
            remaining_seconds: state.remaining_seconds,
            total_seconds: state.total_seconds,
        });
    }

    fn emit(&self, event: TimerEvent) {
        // A closed presenter never affects the timer
        let _ = self.event_tx.send(event);
    }
}

// ============================================================================
// Tests
// ============================================================================
