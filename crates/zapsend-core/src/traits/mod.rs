// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Narrow interfaces for every external collaborator.
//!
//! The gateway trait uses `#[async_trait]` for dynamic dispatch
//! compatibility; the presenter and contact source are synchronous.

pub mod contacts;
pub mod gateway;
pub mod presenter;

pub use contacts::ContactSource;
pub use gateway::Gateway;
pub use presenter::PairingPresenter;
