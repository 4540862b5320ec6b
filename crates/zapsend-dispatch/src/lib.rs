// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message rendering and paced, sequential delivery.

pub mod dispatcher;
pub mod template;

pub use dispatcher::{DeliveryDispatcher, DispatchPlan};
pub use template::render_template;
