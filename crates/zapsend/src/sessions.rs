// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `zapsend sessions` subcommands.

use clap::Subcommand;
use colored::Colorize;
use zapsend_config::ZapsendConfig;
use zapsend_core::{Gateway, ZapsendError};

use crate::setup::build_gateway;

#[derive(Subcommand, Debug)]
pub enum SessionsAction {
    /// List sessions known to the gateway.
    List,
    /// Delete a session.
    Delete { name: String },
    /// Unlink the WhatsApp account from a session, keeping the session.
    Logout { name: String },
    /// Restart a session's connection.
    Restart { name: String },
}

pub async fn run_sessions(
    config: &ZapsendConfig,
    action: SessionsAction,
) -> Result<(), ZapsendError> {
    let gateway = build_gateway(config)?;
    execute(gateway.as_ref(), action).await
}

async fn execute(gateway: &dyn Gateway, action: SessionsAction) -> Result<(), ZapsendError> {
    match action {
        SessionsAction::List => {
            let sessions = gateway.list_sessions().await?;
            if sessions.is_empty() {
                println!("No sessions.");
            }
            for session in sessions {
                let state = session
                    .state
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let state = if session.state.is_some_and(|s| s.is_connected()) {
                    state.green()
                } else {
                    state.yellow()
                };
                println!("{:<24} {}", session.name, state);
            }
        }
        SessionsAction::Delete { name } => {
            gateway.delete_session(&name).await?;
            println!("{} deleted {}", "✓".green(), name.bold());
        }
        SessionsAction::Logout { name } => {
            gateway.logout_session(&name).await?;
            println!("{} logged out {}", "✓".green(), name.bold());
        }
        SessionsAction::Restart { name } => {
            gateway.restart_session(&name).await?;
            println!("{} restarted {}", "✓".green(), name.bold());
        }
    }
    Ok(())
}
