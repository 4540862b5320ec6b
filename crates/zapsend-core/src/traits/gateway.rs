// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging gateway RPC surface.

use async_trait::async_trait;

use crate::error::GatewayResponse;
use crate::types::{MediaKind, PairingArtifact, SessionInfo, SessionState};

/// Logical operations exposed by a remote messaging gateway.
///
/// Implementations are stateless apart from connection pooling and must
/// never panic or leak transport errors: every failure is returned in the
/// `Err` arm of [`GatewayResponse`]. Phone arguments are raw; normalizing
/// them is the implementation's job.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Creates a named session. A duplicate name yields
    /// [`GatewayError::AlreadyExists`](crate::GatewayError::AlreadyExists).
    async fn create_session(&self, name: &str) -> GatewayResponse<()>;

    /// Lists every session known to the gateway.
    async fn list_sessions(&self) -> GatewayResponse<Vec<SessionInfo>>;

    /// Deletes a named session.
    async fn delete_session(&self, name: &str) -> GatewayResponse<()>;

    /// Unlinks the messaging account from a session without deleting it.
    async fn logout_session(&self, name: &str) -> GatewayResponse<()>;

    /// Restarts a session's connection on the gateway side.
    async fn restart_session(&self, name: &str) -> GatewayResponse<()>;

    /// Requests the current pairing artifact. An empty artifact means the
    /// gateway has not generated one yet.
    async fn fetch_pairing_artifact(&self, name: &str) -> GatewayResponse<PairingArtifact>;

    /// Reports the session's connection state.
    async fn connection_state(&self, name: &str) -> GatewayResponse<SessionState>;

    /// Sends a text message.
    async fn send_text(&self, name: &str, phone: &str, text: &str) -> GatewayResponse<()>;

    /// Sends a media message referenced by URL.
    async fn send_media(
        &self,
        name: &str,
        phone: &str,
        url: &str,
        kind: MediaKind,
        caption: &str,
    ) -> GatewayResponse<()>;

    /// Returns true only when the gateway confirms `phone` can receive
    /// messages. Unverifiable numbers, including endpoint failures, are
    /// `false`.
    async fn validate_recipient(&self, name: &str, phone: &str) -> bool;
}
