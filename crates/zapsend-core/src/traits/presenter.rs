// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sink for pairing artifacts.

use crate::error::ZapsendError;
use crate::types::PairingArtifact;

/// Shows pairing artifacts to the user. The core never renders anything
/// itself; terminal and file output live behind this trait.
pub trait PairingPresenter: Send + Sync {
    /// Presents a freshly obtained, non-empty artifact.
    fn present(&self, session: &str, artifact: &PairingArtifact) -> Result<(), ZapsendError>;

    /// Called when the gateway produced no artifact within the retry bounds.
    /// `manager_hint` points the user at a place to pair manually, if known.
    fn unavailable(&self, session: &str, manager_hint: Option<&str>);
}
