//! Tests for reading row heights and column widths from XLSX files.

use crate::Fixture;
use pretty_assertions::assert_eq;
use xlmerge_core::ColumnDim;

fn read_sheet(body: &str) -> xlmerge_core::Worksheet {
    let mut workbook = Fixture::new().sheet("Sheet1", body).read();
    workbook.remove_worksheet(0).unwrap()
}

#[test]
fn test_custom_row_height() {
    let sheet = read_sheet(
        r#"<sheetData><row r="1" ht="30" customHeight="1"><c r="A1"><v>1</v></c></row><row r="2"><c r="A2"><v>2</v></c></row></sheetData>"#,
    );

    assert_eq!(sheet.row_height(0), 30.0);
    assert!(sheet.row_dim(1).is_none());
    assert_eq!(sheet.row_height(1), sheet.default_row_height());
}

#[test]
fn test_custom_column_width() {
    let sheet = read_sheet(
        r#"<cols><col min="1" max="1" width="20.7109375" customWidth="1"/><col min="3" max="5" width="4.5" customWidth="1"/></cols><sheetData/>"#,
    );

    assert_eq!(sheet.column_width(0), 20.7109375);
    assert!(sheet.column_dim(1).is_none());
    for col in 2..=4 {
        assert_eq!(sheet.column_width(col), 4.5);
    }
}

#[test]
fn test_hidden_and_grouped() {
    let sheet = read_sheet(
        r#"<cols><col min="2" max="2" width="9.140625" hidden="1" outlineLevel="1"/></cols>
           <sheetData><row r="4" hidden="1" outlineLevel="2"/></sheetData>"#,
    );

    assert_eq!(
        sheet.column_dim(1),
        Some(&ColumnDim::new().with_width(9.140625).with_hidden(true).with_outline_level(1))
    );
    let row = sheet.row_dim(3).unwrap();
    assert!(row.hidden);
    assert_eq!(row.outline_level, 2);
}

#[test]
fn test_sheet_defaults() {
    let sheet = read_sheet(
        r#"<sheetFormatPr baseColWidth="10" defaultRowHeight="16.5" defaultColWidth="12.25"/><sheetData/>"#,
    );
    assert_eq!(sheet.default_row_height(), 16.5);
    assert_eq!(sheet.default_column_width(), 12.25);

    let sheet = read_sheet("<sheetData/>");
    assert_eq!(sheet.default_row_height(), 15.0);
    assert_eq!(sheet.default_column_width(), 8.43);
}
