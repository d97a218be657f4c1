//! Shared fixtures for merge tests

#![allow(dead_code)]

use std::io::Cursor;

use xlmerge::{
    BorderLineStyle, BorderStyle, CellRange, CellValue, Color, ColumnDim, HorizontalAlignment,
    MergeInput, RowDim, SheetFormat, Style, Workbook, Worksheet, XlsxReader, XlsxWriter,
};

/// Serialize sheets into a document, in order
pub fn document(sheets: Vec<Worksheet>) -> Vec<u8> {
    let mut workbook = Workbook::empty();
    for sheet in sheets {
        workbook.add_existing_worksheet(sheet).unwrap();
    }
    XlsxWriter::to_bytes(&workbook).unwrap()
}

/// A merge input holding one document built from `sheets`
pub fn input(name: &str, sheets: Vec<Worksheet>) -> MergeInput {
    MergeInput::new(name, document(sheets))
}

/// A merge input whose only sheet has `value` in A1
pub fn simple_input(name: &str, value: f64) -> MergeInput {
    let mut sheet = Worksheet::new("Sheet1");
    sheet.set_cell_value("A1", value).unwrap();
    input(name, vec![sheet])
}

/// Parse serialized output back into a workbook
pub fn read_back(bytes: &[u8]) -> Workbook {
    XlsxReader::read(Cursor::new(bytes)).unwrap()
}

/// First sheet of a serialized document, as the reader sees it
pub fn first_sheet(bytes: &[u8]) -> Worksheet {
    read_back(bytes).worksheet(0).unwrap().clone()
}

pub fn header_style() -> Style {
    Style::new()
        .bold(true)
        .font_size(13.0)
        .font_color(Color::WHITE)
        .fill_color(Color::rgb(0x1F, 0x4E, 0x78))
        .horizontal_alignment(HorizontalAlignment::Center)
        .border(BorderStyle::outline(BorderLineStyle::Medium, Color::BLACK))
}

pub fn amount_style() -> Style {
    Style::new()
        .number_format("#,##0.00;[Red]-#,##0.00")
        .font_color(Color::theme(1, -0.25))
}

/// A formatted report sheet: a merged title row, headers, figures,
/// resized columns, a hidden row and a frozen header
pub fn report_sheet() -> Worksheet {
    let mut sheet = Worksheet::new("Report");
    sheet.set_format(SheetFormat {
        default_row_height: 16.5,
        default_column_width: 9.5,
    });

    sheet.set_cell_value("A1", "Quarterly figures").unwrap();
    sheet.set_cell_style("A1", header_style().font_size(16.0)).unwrap();
    sheet.set_cell_style("B1", header_style()).unwrap();
    sheet.set_cell_style("C1", header_style()).unwrap();
    sheet.merge_cells(&CellRange::parse("A1:C1").unwrap()).unwrap();

    for (col, label) in ["Region", "Units", "Revenue"].iter().enumerate() {
        sheet.set_cell_value_at(1, col as u16, *label).unwrap();
        sheet.set_cell_style_at(1, col as u16, header_style()).unwrap();
    }

    let rows = [("North", 120.0, 3400.5), ("South", 80.0, -150.25), ("East", 0.0, 0.0)];
    for (i, (region, units, revenue)) in rows.iter().enumerate() {
        let row = i as u32 + 2;
        sheet.set_cell_value_at(row, 0, *region).unwrap();
        sheet.set_cell_value_at(row, 1, *units).unwrap();
        sheet.set_cell_value_at(row, 2, *revenue).unwrap();
        sheet.set_cell_style_at(row, 2, amount_style()).unwrap();
    }
    sheet
        .set_cell_value_at(5, 2, CellValue::formula_with_cached("SUM(C3:C5)", Some(CellValue::Number(3250.25))))
        .unwrap();
    sheet.set_cell_style_at(5, 2, amount_style().bold(true)).unwrap();
    sheet.set_cell_value_at(5, 3, true).unwrap();

    sheet.set_column_dim(0, ColumnDim::new().with_width(18.0));
    sheet.set_column_dim(2, ColumnDim::new().with_width(14.25).with_best_fit(true));
    sheet.set_column_dim(6, ColumnDim::new().with_hidden(true).with_outline_level(1));
    sheet.set_row_dim(0, RowDim::new().with_height(28.0));
    sheet.set_row_dim(4, RowDim::new().with_hidden(true).with_outline_level(1));
    sheet.set_row_dim(30, RowDim::new().with_height(6.0));
    sheet.set_freeze_panes(2, 1);
    sheet
}
