//! Command definitions for the pomotimer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::Configuration;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro timer daemon and client
#[derive(Parser, Debug)]
#[command(
    name = "pomotimer",
    version,
    about = "Pomodoro timer daemon and client",
    long_about = "A Pomodoro timer. `pomotimer daemon` runs the timer; every other\n\
                  command talks to the running daemon over a Unix socket.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Daemon socket path (default: ~/.pomotimer/pomotimer.sock)
    #[arg(long, global = true, value_name = "PATH")]
    pub socket: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start or resume the countdown
    Start,

    /// Pause the countdown
    Pause,

    /// Skip the current phase
    Skip,

    /// Re-arm the current phase with its full duration
    Reset,

    /// Reset the whole session
    ResetAll,

    /// Show current timer status
    Status,

    /// Show or change the daemon's configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Run the timer daemon in the foreground
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// `config` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the active configuration
    Show,

    /// Change configuration values
    Set(ConfigSetArgs),
}

// ============================================================================
// Config Arguments
// ============================================================================

/// Arguments for `config set`. Unset options keep their current value.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSetArgs {
    /// Work duration in minutes
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u32).range(1..))]
    pub work: Option<u32>,

    /// Short break duration in minutes
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u32).range(1..))]
    pub short_break: Option<u32>,

    /// Long break duration in minutes
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u32).range(1..))]
    pub long_break: Option<u32>,

    /// Work phases per long break
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub every: Option<u32>,

    /// Start the next phase automatically
    #[arg(long, value_name = "BOOL")]
    pub auto_start: Option<bool>,

    /// Play a sound when a phase completes
    #[arg(long, value_name = "BOOL")]
    pub sound: Option<bool>,
}

impl ConfigSetArgs {
    /// Returns true if no option was given.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the given options on top of `base`.
    pub fn merge(&self, base: Configuration) -> Configuration {
        Configuration {
            work_minutes: self.work.unwrap_or(base.work_minutes),
            short_break_minutes: self.short_break.unwrap_or(base.short_break_minutes),
            long_break_minutes: self.long_break.unwrap_or(base.long_break_minutes),
            long_break_every: self.every.unwrap_or(base.long_break_every),
            auto_start_next: self.auto_start.unwrap_or(base.auto_start_next),
            sound_on: self.sound.unwrap_or(base.sound_on),
        }
    }
}

// ============================================================================
// Daemon Arguments
// ============================================================================

/// Arguments for the daemon command
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// Settings file (default: <config dir>/pomotimer/settings.json)
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Show the menu bar item (macOS)
    #[arg(long)]
    pub tray: bool,
}

// ============================================================================
// Tests
// ============================================================================
