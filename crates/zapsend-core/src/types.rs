// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data model shared by the session manager, dispatcher, and collaborators.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Sentinel phone value emitted by upstream scrapers when no number is known.
pub const UNAVAILABLE_PHONE: &str = "N/A";

/// Lifecycle state of a gateway session.
///
/// The gateway is the single source of truth; this value is only ever
/// observed, never owned locally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NonExistent,
    Created,
    PairingPending,
    Connected,
    Disconnected,
}

impl SessionState {
    pub fn is_connected(self) -> bool {
        self == SessionState::Connected
    }
}

/// A session as reported by the gateway's listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub name: String,
    /// Connection state, when the listing includes one.
    pub state: Option<SessionState>,
}

/// A business contact produced by a [`ContactSource`](crate::ContactSource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    /// Raw phone as found in the source, before normalization.
    pub phone: String,
    pub address: Option<String>,
    pub rating: Option<String>,
    pub website: Option<String>,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: None,
            rating: None,
            website: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// A contact is dispatchable when it has a name and a phone that is not
    /// the "unavailable" sentinel.
    pub fn is_dispatchable(&self) -> bool {
        let phone = self.phone.trim();
        !self.name.trim().is_empty()
            && !phone.is_empty()
            && !phone.eq_ignore_ascii_case(UNAVAILABLE_PHONE)
    }
}

/// One-time artifact used to link a session to a messaging account.
///
/// Valid until the session connects or a new artifact is requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingArtifact {
    /// Text payload encoded in the QR code.
    pub qr_payload: Option<String>,
    /// Short code the user types on the phone instead of scanning.
    pub pairing_code: Option<String>,
    /// Rendered QR image (PNG bytes).
    pub image: Option<Vec<u8>>,
}

impl PairingArtifact {
    /// Returns true when the gateway has not generated anything usable yet.
    pub fn is_empty(&self) -> bool {
        self.qr_payload.as_deref().is_none_or(str::is_empty)
            && self.pairing_code.as_deref().is_none_or(str::is_empty)
            && self.image.as_deref().is_none_or(<[u8]>::is_empty)
    }
}

/// Media category understood by the gateway's media endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
}

/// Media sent with every message of a dispatch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub url: String,
    pub kind: MediaKind,
}

/// Outcome of a single contact's delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum DeliveryResult {
    Sent,
    Failed(String),
    Skipped(String),
}

/// A contact paired with its delivery outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    pub name: String,
    pub phone: String,
    pub result: DeliveryResult,
}

/// Final report of a dispatch run.
///
/// Counts are derived from the records at construction and cannot be
/// changed afterwards, so `sent + failed + skipped == total` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    sent: usize,
    failed: usize,
    skipped: usize,
    cancelled: bool,
    records: Vec<DeliveryRecord>,
}

impl DispatchSummary {
    pub fn from_records(records: Vec<DeliveryRecord>, cancelled: bool) -> Self {
        let mut sent = 0;
        let mut failed = 0;
        let mut skipped = 0;
        for record in &records {
            match record.result {
                DeliveryResult::Sent => sent += 1,
                DeliveryResult::Failed(_) => failed += 1,
                DeliveryResult::Skipped(_) => skipped += 1,
            }
        }
        Self {
            sent,
            failed,
            skipped,
            cancelled,
            records,
        }
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of contacts processed before the run ended.
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// True when the run was interrupted before every contact was processed.
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }
}
