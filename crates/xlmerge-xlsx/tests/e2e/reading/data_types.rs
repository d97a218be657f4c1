//! Tests for reading cell values of every type.

use crate::sheet_with_rows;
use pretty_assertions::assert_eq;
use xlmerge_core::CellValue;

#[test]
fn test_numbers() {
    let workbook = sheet_with_rows(
        r#"<row r="1"><c r="A1"><v>42</v></c><c r="B1"><v>-3.25</v></c><c r="C1"><v>1.0E-3</v></c><c r="D1"><v>45321.5</v></c></row>"#,
    )
    .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.get_value_at(0, 0), CellValue::Number(42.0));
    assert_eq!(sheet.get_value_at(0, 1), CellValue::Number(-3.25));
    assert_eq!(sheet.get_value_at(0, 2), CellValue::Number(0.001));
    assert_eq!(sheet.get_value_at(0, 3), CellValue::Number(45321.5));
}

#[test]
fn test_shared_strings() {
    let workbook = sheet_with_rows(
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="s"><v>0</v></c></row>"#,
    )
    .shared_strings(&["Hello", "  spaced  "])
    .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("Hello"));
    assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("  spaced  "));
    assert_eq!(sheet.get_value("C1").unwrap(), CellValue::string("Hello"));
}

#[test]
fn test_unicode_text() {
    let workbook = sheet_with_rows(
        r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="inlineStr"><is><t>합계</t></is></c></row>"#,
    )
    .shared_strings(&["매출 보고서 😀"])
    .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("매출 보고서 😀"));
    assert_eq!(sheet.get_value("B1").unwrap(), CellValue::string("합계"));
}

#[test]
fn test_booleans_errors_and_dates() {
    let workbook = sheet_with_rows(
        r#"<row r="1">
            <c r="A1" t="b"><v>1</v></c>
            <c r="B1" t="b"><v>0</v></c>
            <c r="C1" t="e"><v>#N/A</v></c>
            <c r="D1" t="d"><v>2023-12-25T08:30:00</v></c>
        </row>"#,
    )
    .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.get_value_at(0, 0), CellValue::Boolean(true));
    assert_eq!(sheet.get_value_at(0, 1), CellValue::Boolean(false));
    assert_eq!(sheet.get_value_at(0, 2), CellValue::Error("#N/A".into()));
    assert_eq!(
        sheet.get_value_at(0, 3),
        CellValue::Date("2023-12-25T08:30:00".into())
    );
}

#[test]
fn test_formula_keeps_text_and_cached_value() {
    let workbook = sheet_with_rows(
        r#"<row r="1"><c r="A1"><v>2</v></c><c r="B1"><v>3</v></c><c r="C1"><f>A1+B1</f><v>5</v></c><c r="D1" t="str"><f>IF(A1&gt;1,"big","small")</f><v>big</v></c></row>"#,
    )
    .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(
        sheet.get_value("C1").unwrap(),
        CellValue::formula_with_cached("A1+B1", Some(CellValue::Number(5.0)))
    );
    let d1 = sheet.get_value("D1").unwrap();
    assert_eq!(d1.formula_text(), Some("=IF(A1>1,\"big\",\"small\")"));
    assert_eq!(d1.effective_value(), &CellValue::string("big"));
}

#[test]
fn test_formula_without_cached_value() {
    let workbook =
        sheet_with_rows(r#"<row r="1"><c r="A1"><f>NOW()</f></c></row>"#).read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.get_value("A1").unwrap(), CellValue::formula("NOW()"));
}

#[test]
fn test_empty_unstyled_cells_are_not_stored() {
    let workbook = sheet_with_rows(
        r#"<row r="1"><c r="A1"/><c r="B1"><v>1</v></c></row><row r="2"/>"#,
    )
    .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.cell_count(), 1);
    assert!(sheet.cell_at(0, 0).is_none());
}
