// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Positional row mapping shared by the spreadsheet formats.

use tracing::debug;
use zapsend_core::Contact;

/// Maps cells in column order (name, phone, address, rating, website) to a
/// contact. Cells are trimmed and blank cells count as absent.
pub(crate) fn contact_from_cells<I, S>(cells: I) -> Option<Contact>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut cells = cells.into_iter().map(|cell| {
        let cell = cell.as_ref().trim();
        (!cell.is_empty()).then(|| cell.to_string())
    });
    let mut next = || cells.next().flatten();

    Some(Contact {
        name: next()?,
        phone: next()?,
        address: next(),
        rating: next(),
        website: next(),
    })
}

/// Accumulates dispatchable contacts and counts the rows left out.
#[derive(Debug, Default)]
pub(crate) struct RowCollector {
    contacts: Vec<Contact>,
    omitted: usize,
}

impl RowCollector {
    pub(crate) fn push<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match contact_from_cells(cells) {
            Some(contact) if contact.is_dispatchable() => self.contacts.push(contact),
            _ => self.omitted += 1,
        }
    }

    pub(crate) fn finish(self) -> Vec<Contact> {
        if self.omitted > 0 {
            debug!(
                omitted = self.omitted,
                "omitted rows without a usable name or phone"
            );
        }
        self.contacts
    }
}
