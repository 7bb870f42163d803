//! pomotimer - a Pomodoro timer daemon and client
//!
//! `pomotimer daemon` runs the timer; every other command talks to it:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - a 15 minute long break after every 4 work phases

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pomotimer::cli::{Cli, Commands, ConfigCommand, Display, IpcClient};
use pomotimer::daemon::{Daemon, DaemonOptions};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let client = || -> Result<IpcClient> {
        match cli.socket.clone() {
            Some(path) => Ok(IpcClient::with_socket_path(path)),
            None => IpcClient::new(),
        }
    };

    match cli.command {
        Some(Commands::Start) => Display::show_action(&client()?.start().await?),
        Some(Commands::Pause) => Display::show_action(&client()?.pause().await?),
        Some(Commands::Skip) => Display::show_action(&client()?.skip().await?),
        Some(Commands::Reset) => Display::show_action(&client()?.reset().await?),
        Some(Commands::ResetAll) => Display::show_action(&client()?.reset_all().await?),
        Some(Commands::Status) => Display::show_status(&client()?.status().await?),
        Some(Commands::Config(ConfigCommand::Show)) => {
            let response = client()?.status().await?;
            let data = response
                .data
                .ok_or_else(|| anyhow::anyhow!("The daemon sent no configuration"))?;
            Display::show_config(&data.config);
        }
        Some(Commands::Config(ConfigCommand::Set(args))) => {
            if args.is_empty() {
                anyhow::bail!("Nothing to change; see 'pomotimer config set --help'");
            }
            let client = client()?;
            let current = client
                .status()
                .await?
                .data
                .ok_or_else(|| anyhow::anyhow!("The daemon sent no configuration"))?
                .config;
            let response = client.reload(args.merge(current)).await?;
            println!("{}", response.message);
            if let Some(data) = response.data {
                Display::show_config(&data.config);
            }
        }
        Some(Commands::Daemon(args)) => {
            Daemon::new(DaemonOptions {
                settings_path: args.settings,
                socket_path: cli.socket.clone(),
                tray: args.tray,
            })
            .run()
            .await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
