// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! zapsend - bulk WhatsApp messaging through an Evolution API gateway.
//!
//! This is the binary entry point.

mod presenter;
mod send;
mod sessions;
mod setup;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use zapsend_config::{ConfigError, ZapsendConfig};
use zapsend_core::ZapsendError;

use crate::send::SendArgs;
use crate::sessions::SessionsAction;

/// zapsend - send templated WhatsApp messages to a contact list.
#[derive(Parser, Debug)]
#[command(name = "zapsend", version, about, long_about = None)]
struct Cli {
    /// Use this config file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect the session and send a message to every contact in a CSV or .xlsx file.
    Send(SendArgs),
    /// Create and pair the session without sending anything.
    Connect,
    /// Manage gateway sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            zapsend_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);
    let cancel = shutdown::install_signal_handler();

    let result = match cli.command {
        Commands::Send(args) => send::run_send(&config, args, cancel).await,
        Commands::Connect => setup::run_connect(&config, cancel).await,
        Commands::Sessions { action } => sessions::run_sessions(&config, action).await,
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(exit_code(&e));
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<ZapsendConfig, Vec<ConfigError>> {
    match path {
        Some(path) => zapsend_config::load_and_validate_path(path),
        None => zapsend_config::load_and_validate(),
    }
}

/// 130 mirrors the shell convention for SIGINT.
fn exit_code(error: &ZapsendError) -> i32 {
    match error {
        ZapsendError::Cancelled => 130,
        _ => 1,
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zapsend={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
