// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact loading from spreadsheet exports.

pub mod csv_source;
mod row;
pub mod xlsx_source;

use std::path::Path;

pub use csv_source::{CsvContactSource, parse_contacts};
pub use xlsx_source::{XlsxContactSource, parse_workbook};
use zapsend_core::ContactSource;

/// Picks a source by file extension: `.xlsx` and `.xlsm` are read as
/// workbooks, anything else as CSV.
pub fn source_for_path(path: &Path) -> Box<dyn ContactSource> {
    let is_workbook = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xlsx") || ext.eq_ignore_ascii_case("xlsm"));
    if is_workbook {
        Box::new(XlsxContactSource::new(path))
    } else {
        Box::new(CsvContactSource::new(path))
    }
}
