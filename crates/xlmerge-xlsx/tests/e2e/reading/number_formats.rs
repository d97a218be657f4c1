//! Tests for reading number formats from XLSX files.

use crate::{sheet_with_rows, StylesBuilder};
use pretty_assertions::assert_eq;
use xlmerge_core::NumberFormat;

#[test]
fn test_builtin_and_custom_formats() {
    let mut styles = StylesBuilder::new();
    let percent = styles.xf(10, 0, 0, 0, "");
    let custom_id = styles.num_fmt(164, "#,##0.00 &quot;원&quot;");
    let custom = styles.xf(custom_id, 0, 0, 0, "");
    let date_id = styles.num_fmt(165, "yyyy-mm-dd;@");
    let date = styles.xf(date_id, 0, 0, 0, "");

    let workbook = sheet_with_rows(&format!(
        r#"<row r="1"><c r="A1" s="{}"><v>0.25</v></c><c r="B1" s="{}"><v>1500</v></c><c r="C1" s="{}"><v>45292</v></c></row>"#,
        percent, custom, date
    ))
    .styles(&styles)
    .read();
    let sheet = workbook.worksheet(0).unwrap();

    let format = |col| sheet.cell_style_at(0, col).unwrap().number_format.clone();
    assert_eq!(format(0), NumberFormat::BuiltIn(10));
    assert_eq!(format(0).format_code(), "0.00%");
    assert_eq!(format(1), NumberFormat::Custom("#,##0.00 \"원\"".into()));
    assert_eq!(format(2), NumberFormat::Custom("yyyy-mm-dd;@".into()));
}

#[test]
fn test_builtin_id_overridden_by_definition() {
    let mut styles = StylesBuilder::new();
    let id = styles.num_fmt(14, "m/d/yyyy");
    let xf = styles.xf(id, 0, 0, 0, "");

    let workbook = sheet_with_rows(&format!(r#"<row r="1"><c r="A1" s="{}"><v>1</v></c></row>"#, xf))
        .styles(&styles)
        .read();
    let style = workbook.worksheet(0).unwrap().cell_style_at(0, 0).unwrap().clone();

    assert_eq!(style.number_format, NumberFormat::Custom("m/d/yyyy".into()));
}
