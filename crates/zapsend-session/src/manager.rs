// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session setup state machine.
//!
//! A session moves `NonExistent -> Created -> PairingPending -> Connected`.
//! The gateway owns the state; the manager only observes it and drives the
//! transitions it is allowed to request (create, fetch pairing artifact).
//!
//! Setup runs in three phases:
//! - **Ensure exists**: list sessions, create the session if it is missing.
//!   A duplicate-name rejection counts as success.
//! - **Pair**: unless the session already reports connected, fetch a pairing
//!   artifact with bounded retries and hand it to the presenter.
//! - **Wait**: poll the connection state until it is connected or the
//!   connect timeout passes.
//!
//! The connect timeout is one wall-clock budget for the whole call. Pairing
//! retries spend from it, so polling only gets what is left.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zapsend_config::model::SessionConfig;
use zapsend_core::pacing::{self, PollOutcome};
use zapsend_core::{Gateway, PairingArtifact, PairingPresenter, SessionState, ZapsendError};

/// Bounds on pairing retries and connection polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Wall-clock budget for [`SessionManager::ensure_session`], measured
    /// from the call and shared by pairing retries and polling.
    pub connect_timeout: Duration,
    /// Interval between connection-state polls.
    pub poll_interval: Duration,
    /// Pairing artifact requests before giving up. At least one is made.
    pub pairing_attempts: u32,
    /// Delay between pairing artifact requests.
    pub pairing_retry_delay: Duration,
}

impl SessionPolicy {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            poll_interval: config.poll_interval(),
            pairing_attempts: config.pairing_attempts,
            pairing_retry_delay: config.pairing_retry_delay(),
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

/// Result of a successful [`SessionManager::ensure_session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub session: String,
    /// Final observed state. Always `Connected` on success.
    pub state: SessionState,
    /// True when this call created the session.
    pub created: bool,
    /// True when a pairing artifact had to be presented.
    pub paired: bool,
}

/// Drives a gateway session to the connected state.
pub struct SessionManager {
    gateway: Arc<dyn Gateway>,
    presenter: Arc<dyn PairingPresenter>,
    policy: SessionPolicy,
    cancel: CancellationToken,
    manager_hint: Option<String>,
}

impl SessionManager {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        presenter: Arc<dyn PairingPresenter>,
        policy: SessionPolicy,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            gateway,
            presenter,
            policy,
            cancel,
            manager_hint: None,
        }
    }

    /// Where the user can pair by hand if no artifact can be obtained.
    pub fn with_manager_hint(mut self, hint: impl Into<String>) -> Self {
        self.manager_hint = Some(hint.into());
        self
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Ensures `name` exists on the gateway and is connected.
    ///
    /// Returns [`ZapsendError::Setup`] when creation fails, no pairing
    /// artifact can be obtained, or the session does not connect in time.
    /// Returns [`ZapsendError::Cancelled`] when the token fires at any wait.
    pub async fn ensure_session(&self, name: &str) -> Result<SessionReport, ZapsendError> {
        if self.cancel.is_cancelled() {
            return Err(ZapsendError::Cancelled);
        }

        let started = Instant::now();
        let created = self.ensure_exists(name).await?;

        if self.current_state(name).await.is_connected() {
            info!(session = %name, "session already connected");
            return Ok(SessionReport {
                session: name.to_string(),
                state: SessionState::Connected,
                created,
                paired: false,
            });
        }

        self.pair(name).await?;
        let remaining = self
            .policy
            .connect_timeout
            .saturating_sub(started.elapsed());
        self.wait_for_connection(name, remaining).await?;

        Ok(SessionReport {
            session: name.to_string(),
            state: SessionState::Connected,
            created,
            paired: true,
        })
    }

    /// Returns true when this call created the session.
    async fn ensure_exists(&self, name: &str) -> Result<bool, ZapsendError> {
        match self.gateway.list_sessions().await {
            Ok(sessions) if sessions.iter().any(|s| s.name == name) => {
                debug!(session = %name, "session already exists");
                return Ok(false);
            }
            Ok(sessions) => debug!(
                session = %name,
                known = sessions.len(),
                "session not listed, creating"
            ),
            Err(e) => warn!(
                session = %name,
                error = %e,
                "failed to list sessions, attempting create"
            ),
        }

        match self.gateway.create_session(name).await {
            Ok(()) => {
                info!(session = %name, "session created");
                Ok(true)
            }
            Err(e) if e.is_already_exists() => {
                debug!(session = %name, "session already exists on gateway");
                Ok(false)
            }
            Err(e) => Err(ZapsendError::setup(
                name,
                format!("failed to create session: {}", e.detail()),
            )),
        }
    }

    /// Reads the connection state; a failed read counts as disconnected.
    async fn current_state(&self, name: &str) -> SessionState {
        match self.gateway.connection_state(name).await {
            Ok(state) => {
                debug!(session = %name, %state, "connection state");
                state
            }
            Err(e) => {
                warn!(session = %name, error = %e, "failed to read connection state");
                SessionState::Disconnected
            }
        }
    }

    async fn pair(&self, name: &str) -> Result<(), ZapsendError> {
        let attempts = self.policy.pairing_attempts.max(1);
        let artifact = self.fetch_artifact(name, attempts).await?;

        let Some(artifact) = artifact else {
            warn!(session = %name, attempts, "pairing artifact unavailable");
            self.presenter.unavailable(name, self.manager_hint.as_deref());
            return Err(ZapsendError::setup(
                name,
                format!("no pairing artifact after {attempts} attempts"),
            ));
        };

        info!(
            session = %name,
            has_code = artifact.pairing_code.is_some(),
            has_image = artifact.image.is_some(),
            "presenting pairing artifact"
        );
        if let Err(e) = self.presenter.present(name, &artifact) {
            // The user can still pair through the manager while we poll.
            warn!(session = %name, error = %e, "failed to present pairing artifact");
            self.presenter.unavailable(name, self.manager_hint.as_deref());
        }
        Ok(())
    }

    async fn fetch_artifact(
        &self,
        name: &str,
        attempts: u32,
    ) -> Result<Option<PairingArtifact>, ZapsendError> {
        for attempt in 1..=attempts {
            match self.gateway.fetch_pairing_artifact(name).await {
                Ok(artifact) if !artifact.is_empty() => return Ok(Some(artifact)),
                Ok(_) => debug!(session = %name, attempt, "pairing artifact not ready"),
                Err(e) => warn!(
                    session = %name,
                    attempt,
                    error = %e,
                    "pairing artifact request failed"
                ),
            }
            if attempt < attempts {
                pacing::pause(self.policy.pairing_retry_delay, &self.cancel).await?;
            }
        }
        Ok(None)
    }

    async fn wait_for_connection(
        &self,
        name: &str,
        remaining: Duration,
    ) -> Result<(), ZapsendError> {
        info!(
            session = %name,
            remaining_secs = remaining.as_secs(),
            "waiting for session to connect"
        );

        let gateway = Arc::clone(&self.gateway);
        let session = name.to_string();
        let outcome = pacing::poll_until(
            self.policy.poll_interval,
            remaining,
            &self.cancel,
            move || {
                let gateway = Arc::clone(&gateway);
                let session = session.clone();
                async move {
                    match gateway.connection_state(&session).await {
                        Ok(state) => {
                            debug!(session = %session, %state, "polled connection state");
                            state.is_connected()
                        }
                        Err(e) => {
                            debug!(session = %session, error = %e, "connection poll failed");
                            false
                        }
                    }
                }
            },
        )
        .await;

        match outcome {
            PollOutcome::Ready => {
                info!(session = %name, "session connected");
                Ok(())
            }
            PollOutcome::Cancelled => Err(ZapsendError::Cancelled),
            PollOutcome::TimedOut => Err(ZapsendError::setup(
                name,
                format!(
                    "session did not connect within {}s",
                    self.policy.connect_timeout.as_secs()
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_follows_config() {
        let config = SessionConfig {
            connect_timeout_secs: 60,
            poll_interval_secs: 3,
            pairing_attempts: 7,
            pairing_retry_delay_secs: 1,
            ..Default::default()
        };
        let policy = SessionPolicy::from_config(&config);
        assert_eq!(policy.connect_timeout, Duration::from_secs(60));
        assert_eq!(policy.poll_interval, Duration::from_secs(3));
        assert_eq!(policy.pairing_attempts, 7);
        assert_eq!(policy.pairing_retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn default_policy_matches_default_config() {
        let policy = SessionPolicy::default();
        assert_eq!(policy.connect_timeout, Duration::from_secs(180));
        assert_eq!(policy.pairing_attempts, 5);
    }
}
