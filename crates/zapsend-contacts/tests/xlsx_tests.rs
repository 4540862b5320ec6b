// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workbook contact loading.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use zapsend_contacts::{XlsxContactSource, source_for_path};
use zapsend_core::{ContactSource, ZapsendError};

/// Writes a scraper-style workbook: header, then name, phone, address,
/// rating, website. Phones and ratings are stored as numbers.
fn write_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    for (col, header) in ["Nome", "Telefone", "Endereço", "Avaliação", "Website"]
        .into_iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, header).unwrap();
    }
    sheet.write_string(1, 0, "Padaria Central").unwrap();
    sheet.write_number(1, 1, 61911111111.0).unwrap();
    sheet.write_string(1, 2, "Rua A, 10").unwrap();
    sheet.write_number(1, 3, 4.5).unwrap();

    sheet.write_string(2, 0, "Sem Telefone").unwrap();
    sheet.write_string(2, 1, "N/A").unwrap();

    sheet.write_string(3, 0, "Oficina do Zé").unwrap();
    sheet.write_string(3, 1, "(61) 92222-2222").unwrap();
    sheet.write_string(3, 4, "https://oficina.example").unwrap();

    sheet.write_number(4, 1, 61933333333.0).unwrap();

    let other = workbook.add_worksheet();
    other.write_string(0, 0, "ignored").unwrap();
    other.write_string(1, 0, "Second Sheet").unwrap();
    other.write_string(1, 1, "61944444444").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn first_sheet_rows_are_filtered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leads.xlsx");
    write_workbook(&path);

    let contacts = XlsxContactSource::new(&path).load().unwrap();
    let names: Vec<_> = contacts.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Padaria Central", "Oficina do Zé"]);

    assert_eq!(contacts[0].phone, "61911111111");
    assert_eq!(contacts[0].address.as_deref(), Some("Rua A, 10"));
    assert_eq!(contacts[0].rating.as_deref(), Some("4.5"));
    assert!(contacts[0].website.is_none());

    assert_eq!(contacts[1].phone, "(61) 92222-2222");
    assert_eq!(
        contacts[1].website.as_deref(),
        Some("https://oficina.example")
    );
}

#[test]
fn extension_selects_workbook_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("LEADS.XLSX");
    write_workbook(&path);

    let contacts = source_for_path(&path).load().unwrap();
    assert_eq!(contacts.len(), 2);
}

#[test]
fn csv_named_file_is_not_parsed_as_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leads.csv");
    std::fs::write(&path, "name,phone\nPadaria,61911111111\n").unwrap();

    let contacts = source_for_path(&path).load().unwrap();
    assert_eq!(contacts.len(), 1);
}

#[test]
fn csv_content_behind_xlsx_name_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leads.xlsx");
    std::fs::write(&path, "name,phone\nPadaria,61911111111\n").unwrap();

    let err = XlsxContactSource::new(&path).load().unwrap_err();
    match err {
        ZapsendError::ContactSource { message, source } => {
            assert!(message.contains("leads.xlsx"));
            assert!(source.is_some());
        }
        other => panic!("expected contact source error, got {other:?}"),
    }
}
