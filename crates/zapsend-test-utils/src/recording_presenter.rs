// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pairing presenter that records instead of rendering.

use std::sync::{Arc, Mutex};

use zapsend_core::{PairingArtifact, PairingPresenter, ZapsendError};

/// Captures every artifact and unavailability notice it receives.
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    presented: Arc<Mutex<Vec<(String, PairingArtifact)>>>,
    unavailable: Arc<Mutex<Vec<(String, Option<String>)>>>,
    fail_with: Option<String>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `present` fail with a presentation error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    /// Artifacts passed to `present`, with their session names.
    pub fn presented(&self) -> Vec<(String, PairingArtifact)> {
        self.presented
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Sessions reported unavailable, with the manager hint given.
    pub fn unavailable_calls(&self) -> Vec<(String, Option<String>)> {
        self.unavailable
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }
}

impl PairingPresenter for RecordingPresenter {
    fn present(&self, session: &str, artifact: &PairingArtifact) -> Result<(), ZapsendError> {
        if let Ok(mut presented) = self.presented.lock() {
            presented.push((session.to_string(), artifact.clone()));
        }
        match &self.fail_with {
            Some(message) => Err(ZapsendError::Presentation(message.clone())),
            None => Ok(()),
        }
    }

    fn unavailable(&self, session: &str, manager_hint: Option<&str>) {
        if let Ok(mut unavailable) = self.unavailable.lock() {
            unavailable.push((session.to_string(), manager_hint.map(str::to_string)));
        }
    }
}
