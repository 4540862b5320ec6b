// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Evolution API gateway adapter for zapsend.
//!
//! Implements [`zapsend_core::Gateway`] over HTTP. All wire formats and
//! status-string interpretation are private to this crate.

pub mod client;
pub mod types;

pub use client::EvolutionClient;
