//! Command-line interface.
//!
//! - `commands`: clap command definitions
//! - `client`: IPC client for the daemon
//! - `display`: terminal output

pub mod client;
pub mod commands;
pub mod display;

pub use client::IpcClient;
pub use commands::{Cli, Commands, ConfigCommand, ConfigSetArgs, DaemonArgs};
pub use display::Display;
