// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the zapsend client.

use thiserror::Error;

/// Maximum number of characters kept in any human-readable error detail.
pub const MAX_DETAIL_CHARS: usize = 200;

/// Uniform result envelope for every gateway operation.
///
/// `Ok` carries the payload, `Err` carries the normalized failure detail.
/// Transport faults, HTTP error statuses and unparseable bodies all land in
/// the `Err` arm, so callers never branch on transport specifics.
pub type GatewayResponse<T> = Result<T, GatewayError>;

/// A failed gateway call, already normalized at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Network failure, connection refusal, or request timeout.
    #[error("transport error: {detail}")]
    Transport { detail: String },

    /// Non-2xx response that does not map to a more specific variant.
    #[error("gateway returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The named resource (usually a session) already exists.
    #[error("already exists: {detail}")]
    AlreadyExists { detail: String },

    /// The named resource does not exist on the gateway.
    #[error("not found: {detail}")]
    NotFound { detail: String },

    /// A 2xx response whose body could not be interpreted.
    #[error("malformed response: {detail}")]
    Malformed { detail: String },
}

impl GatewayError {
    pub fn transport(detail: impl AsRef<str>) -> Self {
        Self::Transport {
            detail: truncate_detail(detail.as_ref()),
        }
    }

    pub fn status(status: u16, detail: impl AsRef<str>) -> Self {
        Self::Status {
            status,
            detail: truncate_detail(detail.as_ref()),
        }
    }

    pub fn already_exists(detail: impl AsRef<str>) -> Self {
        Self::AlreadyExists {
            detail: truncate_detail(detail.as_ref()),
        }
    }

    pub fn not_found(detail: impl AsRef<str>) -> Self {
        Self::NotFound {
            detail: truncate_detail(detail.as_ref()),
        }
    }

    pub fn malformed(detail: impl AsRef<str>) -> Self {
        Self::Malformed {
            detail: truncate_detail(detail.as_ref()),
        }
    }

    /// Returns the human-readable detail without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Transport { detail }
            | Self::Status { detail, .. }
            | Self::AlreadyExists { detail }
            | Self::NotFound { detail }
            | Self::Malformed { detail } => detail,
        }
    }

    /// Returns true when the gateway reported a duplicate resource.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// The primary error type used across the zapsend crates.
#[derive(Debug, Error)]
pub enum ZapsendError {
    /// Configuration errors (missing API key, invalid header values, bad paths).
    #[error("configuration error: {0}")]
    Config(String),

    /// A gateway call failed and the caller could not recover locally.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// The session could not be created or connected.
    #[error("session setup failed for `{session}`: {message}")]
    Setup { session: String, message: String },

    /// No dispatchable contacts were found.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The contact source could not be read.
    #[error("contact source error: {message}")]
    ContactSource {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The pairing presenter failed to show an artifact.
    #[error("presentation error: {0}")]
    Presentation(String),

    /// The operation was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ZapsendError {
    pub fn setup(session: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self::Setup {
            session: session.into(),
            message: truncate_detail(message.as_ref()),
        }
    }
}

/// Truncates `detail` to [`MAX_DETAIL_CHARS`] characters, appending an ellipsis
/// when anything was cut. Never splits a multi-byte character.
pub fn truncate_detail(detail: &str) -> String {
    let trimmed = detail.trim();
    match trimmed.char_indices().nth(MAX_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
