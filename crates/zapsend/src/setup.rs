// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway construction and session setup shared by the commands.

use std::sync::Arc;

use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use zapsend_config::ZapsendConfig;
use zapsend_core::{Gateway, PairingPresenter, ZapsendError};
use zapsend_evolution::EvolutionClient;
use zapsend_session::{SessionManager, SessionPolicy, SessionReport};

use crate::presenter::{TerminalPresenter, desktop_opener};

/// Builds the HTTP gateway client from configuration.
pub fn build_gateway(config: &ZapsendConfig) -> Result<Arc<dyn Gateway>, ZapsendError> {
    let client = EvolutionClient::new(&config.gateway, &config.dispatch.country_code)?;
    info!(base_url = %client.base_url(), "gateway client ready");
    Ok(Arc::new(client))
}

/// Runs session setup with the terminal presenter.
pub async fn connect_session(
    config: &ZapsendConfig,
    gateway: Arc<dyn Gateway>,
    cancel: CancellationToken,
) -> Result<SessionReport, ZapsendError> {
    let mut presenter = TerminalPresenter::new(config.session.qr_image_path());
    if config.session.open_pairing {
        presenter = presenter.with_opener(desktop_opener());
    }
    let presenter: Arc<dyn PairingPresenter> = Arc::new(presenter);
    let manager = SessionManager::new(
        gateway,
        presenter,
        SessionPolicy::from_config(&config.session),
        cancel,
    )
    .with_manager_hint(config.gateway.manager_url());

    println!(
        "Connecting session {} at {}",
        config.session.name.bold(),
        config.gateway.base_url
    );
    let report = manager.ensure_session(&config.session.name).await?;
    println!(
        "{} session {} is connected",
        "✓".green(),
        report.session.bold()
    );
    Ok(report)
}

/// `zapsend connect`: setup only.
pub async fn run_connect(
    config: &ZapsendConfig,
    cancel: CancellationToken,
) -> Result<(), ZapsendError> {
    let gateway = build_gateway(config)?;
    connect_session(config, gateway, cancel).await.map(drop)
}
