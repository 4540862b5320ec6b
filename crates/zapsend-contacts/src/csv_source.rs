// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV contact source.
//!
//! Columns are positional: name, phone, address, rating, website. The first
//! row is a header and is always skipped. Missing trailing columns are
//! allowed; blank cells are treated as absent.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;
use zapsend_core::{Contact, ContactSource, ZapsendError};

use crate::row::RowCollector;

/// Reads contacts from a CSV file on each [`load`](ContactSource::load).
#[derive(Debug, Clone)]
pub struct CsvContactSource {
    path: PathBuf,
}

impl CsvContactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactSource for CsvContactSource {
    fn load(&self) -> Result<Vec<Contact>, ZapsendError> {
        let file = std::fs::File::open(&self.path).map_err(|e| ZapsendError::ContactSource {
            message: format!("cannot open {}", self.path.display()),
            source: Some(Box::new(e)),
        })?;
        let contacts = parse_contacts(file)?;
        debug!(
            path = %self.path.display(),
            count = contacts.len(),
            "loaded contacts"
        );
        Ok(contacts)
    }
}

/// Parses contacts from any CSV reader, keeping only dispatchable rows in
/// source order.
pub fn parse_contacts<R: Read>(reader: R) -> Result<Vec<Contact>, ZapsendError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = RowCollector::default();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ZapsendError::ContactSource {
            // +2: one for the header, one for 1-based numbering.
            message: format!("invalid CSV at row {}", index + 2),
            source: Some(Box::new(e)),
        })?;

        rows.push(record.iter());
    }
    Ok(rows.finish())
}
