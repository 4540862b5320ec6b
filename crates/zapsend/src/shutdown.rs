// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal-driven cancellation.
//!
//! SIGINT (Ctrl+C) and SIGTERM cancel the returned token. Pairing waits and
//! the inter-send delay observe it and stop at the next boundary.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers and returns the token they cancel.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), cancelling"),
                        _ = sigterm.recv() => info!("received SIGTERM, cancelling"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, only Ctrl+C will cancel");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), cancelling");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, cancelling");
        }

        trigger.cancel();
        debug!("signal handler completed");
    });

    token
}
