// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the zapsend bulk messaging client.
//!
//! This crate provides the error taxonomy, the data model shared by the
//! session manager and the delivery dispatcher, and the narrow traits that
//! isolate every external collaborator (the messaging gateway, the pairing
//! presenter, and the contact source) so the core logic can be exercised
//! without real I/O.

pub mod error;
pub mod pacing;
pub mod phone;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{GatewayError, GatewayResponse, ZapsendError};
pub use phone::{DEFAULT_COUNTRY_CODE, normalize_phone, normalize_phone_with};
pub use types::{
    Contact, DeliveryRecord, DeliveryResult, DispatchSummary, MediaAttachment, MediaKind,
    PairingArtifact, SessionInfo, SessionState,
};

// Re-export all collaborator traits at crate root.
pub use traits::{ContactSource, Gateway, PairingPresenter};
