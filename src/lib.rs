//! pomotimer library
//!
//! - [`daemon::timer`]: the phase engine, a pure state machine with no clock
//! - [`daemon`]: the host loop, command queue, IPC server and presenter
//! - [`settings`]: persisted configuration
//! - [`sound`], [`notification`], [`menubar`]: completion cues and UI
//! - [`cli`]: command surface, IPC client and terminal output
//! - [`types`]: configuration, state and wire types

pub mod cli;
pub mod daemon;
pub mod menubar;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;

pub use types::{
    format_mmss, Configuration, ConfigurationError, IpcRequest, IpcResponse, PhaseKind,
    PhaseTransition, ResponseData, TimerState,
};

pub use daemon::{Command, Daemon, DaemonOptions, TimerEngine, TimerEvent};

pub use notification::{
    CompletionMessage, DesktopNotifier, LogNotifier, MockNotificationSender,
    NotificationActionEvent, NotificationError, NotificationSender,
};

pub use menubar::{MenuAction, MenuItemId, TrayIconManager, TrayUpdate};

pub use settings::{SettingsError, SettingsStore};

pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};
