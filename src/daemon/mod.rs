//! Daemon host for the timer engine.
//!
//! The daemon runs on a single thread. One `select!` loop owns the
//! [`TimerRunner`] and the [`Presenter`], polls the clock every 200 ms and
//! drains the command queue fed by the IPC server, the menu bar and
//! notification action buttons. Toast delivery runs as a separate branch
//! of the same loop, so a slow notification center never delays a command.

pub mod clock;
pub mod ipc;
pub mod presenter;
pub mod runner;
pub mod timer;

pub use clock::ElapsedClock;
pub use ipc::{default_socket_path, IpcServer, RequestHandler};
pub use presenter::{Courier, Presenter};
pub use runner::{command_queue, Command, CommandSender, TimerEvent, TimerRunner};
pub use timer::TimerEngine;

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::menubar::TrayIconManager;
use crate::notification::DesktopNotifier;
use crate::settings::SettingsStore;
use crate::sound::try_create_player;

/// Clock polling cadence.
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Options for [`Daemon`].
#[derive(Debug, Clone, Default)]
pub struct DaemonOptions {
    /// Settings file, defaults to the platform config directory
    pub settings_path: Option<PathBuf>,
    /// Socket path, defaults to [`default_socket_path`]
    pub socket_path: Option<PathBuf>,
    /// Show the menu bar item
    pub tray: bool,
}

/// The timer daemon.
#[derive(Debug)]
pub struct Daemon {
    options: DaemonOptions,
}

impl Daemon {
    pub fn new(options: DaemonOptions) -> Self {
        Self { options }
    }

    /// Runs until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings location or socket cannot be set up.
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Runs until `shutdown` completes or "Quit" is chosen in the menu bar.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings location or socket cannot be set up.
    pub async fn run_until<F: Future<Output = ()>>(self, shutdown: F) -> Result<()> {
        let store = match self.options.settings_path {
            Some(path) => SettingsStore::new(path),
            None => SettingsStore::at_default_location()?,
        };
        let config = store.load_or_default();
        let engine =
            TimerEngine::new(config.clone()).context("Loaded configuration is invalid")?;
        let initial_state = engine.snapshot();

        let (commands, mut command_rx) = command_queue();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut runner = TimerRunner::new(engine, event_tx);

        let socket_path = match self.options.socket_path {
            Some(path) => path,
            None => default_socket_path()?,
        };
        let server = IpcServer::new(&socket_path)?;
        info!(socket = %socket_path.display(), settings = %store.path().display(), "Daemon started");
        let ipc_task = tokio::spawn(server.run(RequestHandler::new(commands.clone())));

        let (mut tray, tray_tx) = if self.options.tray {
            let (tray_tx, tray_rx) = crossbeam_channel::unbounded();
            let mut tray =
                TrayIconManager::new(initial_state.clone(), config.long_break_every, tray_rx);
            if let Err(e) = tray.initialize() {
                warn!("Menu bar unavailable: {:#}", e);
            }
            (Some(tray), Some(tray_tx))
        } else {
            (None, None)
        };

        let sound = try_create_player(!config.sound_on);
        let notifier = DesktopNotifier::new_with_fallback().await;
        let (mut presenter, mut courier) =
            Presenter::new(config, initial_state, sound, notifier, tray_tx);

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        {
            let delivery = courier.run();
            tokio::pin!(delivery);
            let mut delivering = true;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        runner.on_tick(Instant::now());

                        for command in presenter.pending_commands() {
                            commands.dispatch(command);
                        }

                        if let Some(ref mut tray) = tray {
                            tray.process_pending_updates();
                            let mut quit = false;
                            for action in tray.poll_clicks() {
                                match action.to_command() {
                                    Some(command) => {
                                        commands.dispatch(command);
                                    }
                                    None => quit = true,
                                }
                            }
                            if quit {
                                info!("Quit chosen from the menu bar");
                                break;
                            }
                        }
                    }
                    Some(envelope) = command_rx.recv() => {
                        runner.handle(envelope, Instant::now());
                    }
                    Some(event) = event_rx.recv() => {
                        if let TimerEvent::ConfigurationReloaded(ref config) = event {
                            save_settings(&store, config);
                        }
                        presenter.present(event);
                    }
                    () = &mut delivery, if delivering => {
                        delivering = false;
                    }
                    _ = &mut shutdown => {
                        info!("Shutdown requested");
                        break;
                    }
                }
            }
        }

        ipc_task.abort();
        let _ = ipc_task.await;

        presenter.shutdown();
        if let Some(ref mut tray) = tray {
            tray.process_pending_updates();
        }
        courier.flush().await;

        save_settings(&store, runner.engine().config());
        info!("Daemon stopped");
        Ok(())
    }
}

fn save_settings(store: &SettingsStore, config: &crate::types::Configuration) {
    if let Err(e) = store.save(config) {
        warn!("Failed to save settings: {}", e);
    }
}

/// Completes on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
