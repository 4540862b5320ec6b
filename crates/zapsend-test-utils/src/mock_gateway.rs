// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted gateway for deterministic testing.
//!
//! `MockGateway` implements `Gateway` with queued connection states and
//! pairing artifacts, per-phone reachability and failures, and captures
//! every call for assertion in tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::time::Instant;

use zapsend_core::{
    Gateway, GatewayError, GatewayResponse, MediaKind, PairingArtifact, SessionInfo,
    SessionState,
};

/// A single call captured by [`MockGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateSession(String),
    ListSessions,
    DeleteSession(String),
    LogoutSession(String),
    RestartSession(String),
    FetchPairingArtifact(String),
    ConnectionState(String),
    SendText {
        session: String,
        phone: String,
        text: String,
    },
    SendMedia {
        session: String,
        phone: String,
        url: String,
        kind: MediaKind,
        caption: String,
    },
    ValidateRecipient {
        session: String,
        phone: String,
    },
}

impl GatewayCall {
    /// True for `SendText` and `SendMedia`.
    pub fn is_send(&self) -> bool {
        matches!(self, Self::SendText { .. } | Self::SendMedia { .. })
    }
}

#[derive(Default)]
struct Script {
    states: VecDeque<SessionState>,
    last_state: Option<SessionState>,
    create_error: Option<GatewayError>,
    list_error: Option<GatewayError>,
    artifacts: VecDeque<GatewayResponse<PairingArtifact>>,
    sessions: Vec<SessionInfo>,
    unreachable: HashSet<String>,
    failing: HashMap<String, GatewayError>,
}

/// A mock messaging gateway for testing.
///
/// The script lives behind a `std` mutex that is never held across an
/// await, so builders apply synchronously and calls never block.
///
/// - **connection states** are consumed in order; the last one repeats.
///   With no script the session reports `Connected`.
/// - **pairing artifacts** are consumed in order; once exhausted every
///   request yields an empty artifact.
/// - **recipients** are reachable unless marked otherwise.
/// - **calls** are captured with the (virtual) instant they were made.
#[derive(Clone, Default)]
pub struct MockGateway {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<(Instant, GatewayCall)>>>,
}

impl MockGateway {
    /// Create a mock with an already connected session and no failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue connection states returned by successive `connection_state` calls.
    pub fn with_states(self, states: impl IntoIterator<Item = SessionState>) -> Self {
        self.script_mut(|s| s.states.extend(states));
        self
    }

    /// Make `create_session` fail with `error`.
    pub fn with_create_error(self, error: GatewayError) -> Self {
        self.script_mut(|s| s.create_error = Some(error));
        self
    }

    /// Make `list_sessions` fail with `error`.
    pub fn with_list_error(self, error: GatewayError) -> Self {
        self.script_mut(|s| s.list_error = Some(error));
        self
    }

    /// Queue a pairing artifact.
    pub fn with_artifact(self, artifact: PairingArtifact) -> Self {
        self.script_mut(|s| s.artifacts.push_back(Ok(artifact)));
        self
    }

    /// Queue a failed pairing artifact request.
    pub fn with_artifact_error(self, error: GatewayError) -> Self {
        self.script_mut(|s| s.artifacts.push_back(Err(error)));
        self
    }

    /// Sessions returned by `list_sessions`.
    pub fn with_sessions(self, sessions: impl IntoIterator<Item = SessionInfo>) -> Self {
        self.script_mut(|s| s.sessions.extend(sessions));
        self
    }

    /// Report `phone` as unable to receive messages.
    pub fn with_unreachable(self, phone: impl Into<String>) -> Self {
        self.script_mut(|s| {
            s.unreachable.insert(phone.into());
        });
        self
    }

    /// Make every send to `phone` fail with `error`.
    pub fn with_send_failure(self, phone: impl Into<String>, error: GatewayError) -> Self {
        self.script_mut(|s| {
            s.failing.insert(phone.into(), error);
        });
        self
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn script_mut(&self, f: impl FnOnce(&mut Script)) {
        f(&mut self.script());
    }

    fn captured(&self) -> MutexGuard<'_, Vec<(Instant, GatewayCall)>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, call: GatewayCall) {
        self.captured().push((Instant::now(), call));
    }

    /// Get every captured call in order.
    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.captured().iter().map(|(_, c)| c.clone()).collect()
    }

    /// Get the instants at which sends were issued.
    pub async fn send_instants(&self) -> Vec<Instant> {
        self.captured()
            .iter()
            .filter(|(_, c)| c.is_send())
            .map(|(at, _)| *at)
            .collect()
    }

    /// Get the captured send calls.
    pub async fn sends(&self) -> Vec<GatewayCall> {
        self.captured()
            .iter()
            .filter(|(_, c)| c.is_send())
            .map(|(_, c)| c.clone())
            .collect()
    }

    /// Count captured calls matching `predicate`.
    pub async fn count(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.captured().iter().filter(|(_, c)| predicate(c)).count()
    }

    async fn send_outcome(&self, phone: &str) -> GatewayResponse<()> {
        match self.script().failing.get(phone) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn create_session(&self, name: &str) -> GatewayResponse<()> {
        self.record(GatewayCall::CreateSession(name.to_string())).await;
        match self.script().create_error.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_sessions(&self) -> GatewayResponse<Vec<SessionInfo>> {
        self.record(GatewayCall::ListSessions).await;
        let script = self.script();
        match &script.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(script.sessions.clone()),
        }
    }

    async fn delete_session(&self, name: &str) -> GatewayResponse<()> {
        self.record(GatewayCall::DeleteSession(name.to_string())).await;
        Ok(())
    }

    async fn logout_session(&self, name: &str) -> GatewayResponse<()> {
        self.record(GatewayCall::LogoutSession(name.to_string())).await;
        Ok(())
    }

    async fn restart_session(&self, name: &str) -> GatewayResponse<()> {
        self.record(GatewayCall::RestartSession(name.to_string())).await;
        Ok(())
    }

    async fn fetch_pairing_artifact(&self, name: &str) -> GatewayResponse<PairingArtifact> {
        self.record(GatewayCall::FetchPairingArtifact(name.to_string()))
            .await;
        self.script()
            .artifacts
            .pop_front()
            .unwrap_or_else(|| Ok(PairingArtifact::default()))
    }

    async fn connection_state(&self, name: &str) -> GatewayResponse<SessionState> {
        self.record(GatewayCall::ConnectionState(name.to_string()))
            .await;
        let mut script = self.script();
        let state = match script.states.pop_front() {
            Some(state) => {
                script.last_state = Some(state);
                state
            }
            None => script.last_state.unwrap_or(SessionState::Connected),
        };
        Ok(state)
    }

    async fn send_text(&self, name: &str, phone: &str, text: &str) -> GatewayResponse<()> {
        self.record(GatewayCall::SendText {
            session: name.to_string(),
            phone: phone.to_string(),
            text: text.to_string(),
        })
        .await;
        self.send_outcome(phone).await
    }

    async fn send_media(
        &self,
        name: &str,
        phone: &str,
        url: &str,
        kind: MediaKind,
        caption: &str,
    ) -> GatewayResponse<()> {
        self.record(GatewayCall::SendMedia {
            session: name.to_string(),
            phone: phone.to_string(),
            url: url.to_string(),
            kind,
            caption: caption.to_string(),
        })
        .await;
        self.send_outcome(phone).await
    }

    async fn validate_recipient(&self, name: &str, phone: &str) -> bool {
        self.record(GatewayCall::ValidateRecipient {
            session: name.to_string(),
            phone: phone.to_string(),
        })
        .await;
        !self.script().unreachable.contains(phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn states_are_consumed_then_last_repeats() {
        let gateway = MockGateway::new().with_states([
            SessionState::NonExistent,
            SessionState::PairingPending,
        ]);
        assert_eq!(
            gateway.connection_state("s").await.unwrap(),
            SessionState::NonExistent
        );
        assert_eq!(
            gateway.connection_state("s").await.unwrap(),
            SessionState::PairingPending
        );
        assert_eq!(
            gateway.connection_state("s").await.unwrap(),
            SessionState::PairingPending
        );
    }

    #[tokio::test]
    async fn unscripted_session_is_connected() {
        let gateway = MockGateway::new();
        assert!(gateway.connection_state("s").await.unwrap().is_connected());
    }

    #[tokio::test]
    async fn artifacts_run_out_to_empty() {
        let gateway = MockGateway::new().with_artifact(PairingArtifact {
            pairing_code: Some("ABCD".into()),
            ..Default::default()
        });
        assert!(!gateway.fetch_pairing_artifact("s").await.unwrap().is_empty());
        assert!(gateway.fetch_pairing_artifact("s").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sends_are_captured_and_failures_injected() {
        let gateway = MockGateway::new()
            .with_send_failure("222", GatewayError::status(500, "boom"))
            .with_unreachable("333");

        assert!(gateway.send_text("s", "111", "hi").await.is_ok());
        assert!(gateway.send_text("s", "222", "hi").await.is_err());
        assert!(!gateway.validate_recipient("s", "333").await);
        assert!(gateway.validate_recipient("s", "111").await);

        let sends = gateway.sends().await;
        assert_eq!(sends.len(), 2);
        assert_eq!(
            sends[0],
            GatewayCall::SendText {
                session: "s".into(),
                phone: "111".into(),
                text: "hi".into(),
            }
        );
        assert_eq!(gateway.calls().await.len(), 4);
    }

    #[tokio::test]
    async fn list_error_is_returned() {
        let gateway = MockGateway::new()
            .with_sessions([SessionInfo {
                name: "s".into(),
                state: None,
            }])
            .with_list_error(GatewayError::transport("connection refused"));
        assert!(gateway.list_sessions().await.is_err());
        assert_eq!(gateway.calls().await, vec![GatewayCall::ListSessions]);
    }

    #[tokio::test]
    async fn create_error_is_returned() {
        let gateway =
            MockGateway::new().with_create_error(GatewayError::already_exists("in use"));
        let err = gateway.create_session("s").await.unwrap_err();
        assert!(err.is_already_exists());
    }
}
