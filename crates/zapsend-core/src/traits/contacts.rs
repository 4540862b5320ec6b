// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Producer of contact records.

use crate::error::ZapsendError;
use crate::types::Contact;

/// Yields dispatchable contacts in source order.
///
/// Implementations silently omit rows without a name or phone, or whose
/// phone is the "unavailable" sentinel.
pub trait ContactSource {
    fn load(&self) -> Result<Vec<Contact>, ZapsendError>;
}
