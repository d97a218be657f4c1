//! Tests for reading merged cells and frozen panes.

use crate::{sheet_with_rows, Fixture, StylesBuilder};
use pretty_assertions::assert_eq;
use xlmerge_core::{CellRange, CellValue, FreezePanes};

#[test]
fn test_merged_regions_present() {
    let workbook = Fixture::new()
        .sheet(
            "Report",
            r#"<sheetData><row r="1"><c r="A1" t="s"><v>0</v></c></row></sheetData>
               <mergeCells count="2"><mergeCell ref="A1:D1"/><mergeCell ref="B3:B6"/></mergeCells>"#,
        )
        .shared_strings(&["Quarterly report"])
        .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(
        sheet.merged_regions(),
        &[
            CellRange::parse("A1:D1").unwrap(),
            CellRange::parse("B3:B6").unwrap()
        ]
    );
    assert_eq!(sheet.get_value_at(0, 0), CellValue::string("Quarterly report"));
    assert!(sheet.merged_region_at(4, 1).is_some());
}

#[test]
fn test_covered_cells_keep_their_style() {
    let mut styles = StylesBuilder::new();
    let border = styles.border(
        r#"<border><left/><right/><top style="thin"/><bottom style="thin"/><diagonal/></border>"#,
    );
    let xf = styles.xf(0, 0, 0, border, "");
    let workbook = Fixture::new()
        .sheet(
            "Sheet1",
            &format!(
                r#"<sheetData><row r="1"><c r="A1" s="{0}"><v>1</v></c><c r="B1" s="{0}"/><c r="C1" s="{0}"/></row></sheetData>
                   <mergeCells count="1"><mergeCell ref="A1:C1"/></mergeCells>"#,
                xf
            ),
        )
        .styles(&styles)
        .read();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.cell_count(), 3);
    assert_eq!(sheet.cell_style_at(0, 2), sheet.cell_style_at(0, 0));
    assert!(sheet.get_value_at(0, 2).is_empty());
}

#[test]
fn test_frozen_header_row() {
    let workbook = Fixture::new()
        .sheet(
            "Sheet1",
            r#"<sheetViews><sheetView tabSelected="1" workbookViewId="0"><pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/><selection pane="bottomLeft" activeCell="A2" sqref="A2"/></sheetView></sheetViews>
               <sheetData/>"#,
        )
        .read();

    assert_eq!(
        workbook.worksheet(0).unwrap().freeze_panes(),
        FreezePanes::new(1, 0).as_ref()
    );
}

#[test]
fn test_frozen_pane_scrolled_past_split() {
    let workbook = Fixture::new()
        .sheet(
            "Sheet1",
            r#"<sheetViews><sheetView workbookViewId="0"><pane xSplit="2" ySplit="3" topLeftCell="F40" activePane="bottomRight" state="frozen"/></sheetView></sheetViews>
               <sheetData/>"#,
        )
        .read();

    let panes = workbook.worksheet(0).unwrap().freeze_panes().copied();
    assert_eq!(panes, FreezePanes::new(3, 2));
    assert_eq!(panes.unwrap().top_left_cell().to_a1_string(), "C4");
}

#[test]
fn test_no_panes() {
    let workbook = sheet_with_rows(r#"<row r="1"><c r="A1"><v>1</v></c></row>"#).read();
    assert!(workbook.worksheet(0).unwrap().freeze_panes().is_none());
}
