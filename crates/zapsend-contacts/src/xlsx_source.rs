// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Excel workbook contact source.
//!
//! Only the first worksheet is read. Its first used row is the header and is
//! skipped; the remaining rows follow the same positional columns as the CSV
//! source.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, XlsxError};
use tracing::debug;
use zapsend_core::{Contact, ContactSource, ZapsendError};

use crate::row::RowCollector;

/// Reads contacts from the first sheet of an `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct XlsxContactSource {
    path: PathBuf,
}

impl XlsxContactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactSource for XlsxContactSource {
    fn load(&self) -> Result<Vec<Contact>, ZapsendError> {
        let file = File::open(&self.path).map_err(|e| ZapsendError::ContactSource {
            message: format!("cannot open {}", self.path.display()),
            source: Some(Box::new(e)),
        })?;
        let contacts = parse_workbook(BufReader::new(file)).map_err(|e| match e {
            ZapsendError::ContactSource { message, source } => ZapsendError::ContactSource {
                message: format!("{}: {message}", self.path.display()),
                source,
            },
            other => other,
        })?;
        debug!(
            path = %self.path.display(),
            count = contacts.len(),
            "loaded contacts from workbook"
        );
        Ok(contacts)
    }
}

/// Parses contacts from the first worksheet of an `.xlsx` stream.
pub fn parse_workbook<RS: Read + Seek>(reader: RS) -> Result<Vec<Contact>, ZapsendError> {
    let mut workbook = Xlsx::new(reader).map_err(|e| workbook_error("invalid workbook", e))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| workbook_error("unreadable first sheet", e))?,
        None => return Ok(Vec::new()),
    };

    // The used range may start right of column A; pad so positions hold.
    let leading = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows = RowCollector::default();
    for row in range.rows().skip(1) {
        let cells = std::iter::repeat_n(String::new(), leading).chain(row.iter().map(cell_text));
        rows.push(cells);
    }
    Ok(rows.finish())
}

fn workbook_error(message: &str, e: XlsxError) -> ZapsendError {
    ZapsendError::ContactSource {
        message: message.to_string(),
        source: Some(Box::new(e)),
    }
}

/// Renders a cell the way it reads in the sheet. Whole numbers lose the
/// `.0` so phones stored as numbers survive.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(cell_text(&Data::Float(61911111111.0)), "61911111111");
        assert_eq!(cell_text(&Data::Float(4.5)), "4.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn garbage_bytes_are_not_a_workbook() {
        let err = parse_workbook(std::io::Cursor::new(b"name,phone\n".to_vec())).unwrap_err();
        assert!(matches!(
            err,
            ZapsendError::ContactSource { ref message, .. } if message == "invalid workbook"
        ));
    }
}
