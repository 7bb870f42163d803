//! Presentation side of the daemon: sound, toasts and the menu bar.
//!
//! The presenter consumes [`TimerEvent`]s and keeps a mirror of the timer
//! state built only from those events. Sound and toast fire on natural
//! completion only; a skip just refreshes the menu bar. Peripheral failures
//! are logged and never reach the timer.
//!
//! Handling an event never waits on a peripheral. Toasts are queued for a
//! [`Courier`], which the daemon polls next to its command queue.

use std::rc::Rc;

use crossbeam_channel::Sender;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::menubar::TrayUpdate;
use crate::notification::{deliver, CompletionMessage, NotificationSender, NOTIFICATION_TIMEOUT};
use crate::sound::{completion_sound, SoundPlayer};
use crate::types::{Configuration, PhaseTransition, TimerState};

use super::runner::{Command, TimerEvent};

/// Sink for timer events.
pub struct Presenter<P, N> {
    /// Audio output, `None` when no device is available
    sound: Option<P>,
    notifier: Rc<N>,
    /// Toasts waiting for the courier
    outbox: mpsc::UnboundedSender<CompletionMessage>,
    /// Menu bar updates, `None` when running headless
    tray_tx: Option<Sender<TrayUpdate>>,
    config: Configuration,
    state: TimerState,
}

impl<P: SoundPlayer, N: NotificationSender> Presenter<P, N> {
    /// Creates a presenter mirroring `state` under `config`, and the courier
    /// that delivers its toasts.
    pub fn new(
        config: Configuration,
        state: TimerState,
        sound: Option<P>,
        notifier: N,
        tray_tx: Option<Sender<TrayUpdate>>,
    ) -> (Self, Courier<N>) {
        if let Some(ref player) = sound {
            sync_sound_switch(player, config.sound_on);
        }
        let notifier = Rc::new(notifier);
        let (outbox, inbox) = mpsc::unbounded_channel();
        let courier = Courier {
            notifier: Rc::clone(&notifier),
            inbox,
        };
        let presenter = Self {
            sound,
            notifier,
            outbox,
            tray_tx,
            config,
            state,
        };
        (presenter, courier)
    }

    /// Returns the mirrored timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns the mirrored configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn sound_player(&self) -> Option<&P> {
        self.sound.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Handles one timer event.
    pub fn present(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick {
                phase,
                remaining_seconds,
                total_seconds,
            } => {
                self.state.phase = phase;
                self.state.remaining_seconds = remaining_seconds;
                self.state.total_seconds = total_seconds;
                self.refresh_tray();
            }
            TimerEvent::Started => self.state.running = true,
            TimerEvent::Paused => self.state.running = false,
            TimerEvent::Reset { phase } => {
                self.state.phase = phase;
                self.state.running = false;
            }
            TimerEvent::SessionReset => {
                self.state = TimerState::initial(&self.config);
                self.notifier.clear_all();
            }
            TimerEvent::ConfigurationReloaded(config) => {
                if self.state.cycle_position >= config.long_break_every {
                    self.state.cycle_position = config.long_break_every - 1;
                }
                if let Some(ref player) = self.sound {
                    sync_sound_switch(player, config.sound_on);
                }
                self.config = config;
            }
            TimerEvent::PhaseChanged(transition) => {
                self.state.phase = transition.new_phase;
                self.state.completed_work_count = transition.completed_work_count;
                self.state.cycle_position = transition.cycle_position;
                self.state.running = self.config.auto_start_next;

                if transition.completed_naturally {
                    self.announce(&transition);
                } else {
                    debug!(phase = %transition.previous_phase, "Phase skipped");
                }
            }
        }
    }

    /// Returns commands requested through notification action buttons.
    pub fn pending_commands(&self) -> Vec<Command> {
        std::iter::from_fn(|| self.notifier.try_recv_action())
            .filter_map(|action| action.to_command())
            .collect()
    }

    /// Removes the menu bar item.
    pub fn shutdown(&self) {
        if let Some(ref tx) = self.tray_tx {
            let _ = tx.send(TrayUpdate::Shutdown);
        }
    }

    fn announce(&self, transition: &PhaseTransition) {
        if self.config.sound_on {
            if let Some(ref player) = self.sound {
                if let Err(e) = player.play(&completion_sound(transition.previous_phase)) {
                    warn!("Failed to play completion sound: {}", e);
                }
            }
        }

        let message = CompletionMessage::for_transition(transition, !self.config.auto_start_next);
        if self.outbox.send(message).is_err() {
            debug!("Courier gone, toast dropped");
        }
    }

    fn refresh_tray(&self) {
        if let Some(ref tx) = self.tray_tx {
            // The menu bar may already be gone during shutdown
            let _ = tx.send(TrayUpdate::Refresh {
                state: self.state.clone(),
                long_break_every: self.config.long_break_every,
            });
        }
    }
}

/// Delivers the presenter's toasts, one at a time, each bounded by
/// [`NOTIFICATION_TIMEOUT`].
pub struct Courier<N> {
    notifier: Rc<N>,
    inbox: mpsc::UnboundedReceiver<CompletionMessage>,
}

impl<N: NotificationSender> Courier<N> {
    /// Delivers toasts as they are queued until the presenter is dropped.
    pub async fn run(&mut self) {
        while let Some(message) = self.inbox.recv().await {
            self.send_one(&message).await;
        }
    }

    /// Delivers every toast queued so far.
    pub async fn flush(&mut self) {
        while let Ok(message) = self.inbox.try_recv() {
            self.send_one(&message).await;
        }
    }

    async fn send_one(&self, message: &CompletionMessage) {
        if let Err(e) = deliver(self.notifier.as_ref(), message, NOTIFICATION_TIMEOUT).await {
            warn!("Failed to deliver notification: {}", e);
        }
    }
}

fn sync_sound_switch<P: SoundPlayer>(player: &P, sound_on: bool) {
    if sound_on {
        player.enable();
    } else {
        player.disable();
    }
}
