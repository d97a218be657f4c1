//! Tests for package-level reading: sheet order, lazy access, options.

use std::io::Cursor;

use crate::{sheet_with_rows, Fixture};
use pretty_assertions::assert_eq;
use xlmerge_core::CellValue;
use xlmerge_xlsx::{ReadOptions, XlsxError, XlsxReader};

fn three_sheets() -> Fixture {
    Fixture::new()
        .sheet("First", r#"<sheetData><row r="1"><c r="A1"><v>1</v></c></row></sheetData>"#)
        .sheet("Second", r#"<sheetData><row r="1"><c r="A1"><v>2</v></c></row></sheetData>"#)
        .sheet("Third", r#"<sheetData><row r="1"><c r="A1"><v>3</v></c></row></sheetData>"#)
}

#[test]
fn test_sheet_order_follows_workbook() {
    let workbook = three_sheets().read();
    assert_eq!(workbook.sheet_names(), vec!["First", "Second", "Third"]);
    assert_eq!(workbook.worksheet(2).unwrap().get_value_at(0, 0), CellValue::Number(3.0));
}

#[test]
fn test_open_reads_single_sheet_on_demand() {
    let mut package = XlsxReader::open(Cursor::new(three_sheets().to_bytes())).unwrap();
    assert_eq!(package.sheet_count(), 3);
    assert_eq!(package.sheet_names(), vec!["First", "Second", "Third"]);

    let sheet = package.read_worksheet(1, &ReadOptions::default()).unwrap();
    assert_eq!(sheet.name(), "Second");
    assert_eq!(sheet.get_value_at(0, 0), CellValue::Number(2.0));
}

#[test]
fn test_data_only_reads_cached_results() {
    let fixture = sheet_with_rows(
        r#"<row r="1"><c r="A1"><f>1+1</f><v>2</v></c><c r="B1"><f>NA()</f></c></row>"#,
    );

    let mut package = XlsxReader::open(Cursor::new(fixture.to_bytes())).unwrap();
    let sheet = package
        .read_worksheet(0, &ReadOptions::new().with_data_only(true))
        .unwrap();

    assert_eq!(sheet.get_value_at(0, 0), CellValue::Number(2.0));
    assert!(sheet.cell_at(0, 1).is_none());
}

#[test]
fn test_workbook_without_styles_or_strings() {
    let workbook = sheet_with_rows(r#"<row r="1"><c r="A1" s="3"><v>1</v></c></row>"#).read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.get_value_at(0, 0), CellValue::Number(1.0));
    assert!(sheet.cell_style_at(0, 0).is_none());
}

#[test]
fn test_not_an_xlsx_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "name,amount\nfoo,1\n").unwrap();

    let result = XlsxReader::read_file(file.path());
    assert!(matches!(result, Err(XlsxError::Zip(_))));
}

#[test]
fn test_missing_file() {
    let result = XlsxReader::read_file("/nonexistent/definitely/missing.xlsx");
    assert!(matches!(result, Err(XlsxError::Io(_))));
}
