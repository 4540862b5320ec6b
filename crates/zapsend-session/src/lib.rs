// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle management for zapsend.
//!
//! Ensures a named gateway session exists, walks the user through pairing
//! when needed, and waits for the session to connect.

pub mod manager;

pub use manager::{SessionManager, SessionPolicy, SessionReport};
