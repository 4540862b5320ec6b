// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for zapsend integration tests.
//!
//! Provides scripted collaborators so the session manager and dispatcher
//! can be driven deterministically without a real gateway or terminal.
//!
//! # Components
//!
//! - [`MockGateway`] - Scripted gateway with call capture
//! - [`RecordingPresenter`] - Pairing presenter that records what it was shown

pub mod mock_gateway;
pub mod recording_presenter;

pub use mock_gateway::{GatewayCall, MockGateway};
pub use recording_presenter::RecordingPresenter;
