//! Round trips through the writer and reader.

use std::io::Cursor;

use pretty_assertions::assert_eq;
use xlmerge_core::style::{GradientFill, GradientStop, GradientType, PatternType, Underline};
use xlmerge_core::{
    BorderLineStyle, BorderStyle, CellValue, Color, ColumnDim, FillStyle, HorizontalAlignment,
    Protection, RowDim, Style, VerticalAlignment, Workbook, Worksheet,
};
use xlmerge_xlsx::{XlsxReader, XlsxWriter};

fn round_trip(workbook: &Workbook) -> Workbook {
    let bytes = XlsxWriter::to_bytes(workbook).unwrap();
    XlsxReader::read(Cursor::new(bytes)).unwrap()
}

fn decorated_style() -> Style {
    let mut style = Style::new()
        .bold(true)
        .italic(true)
        .font_name("Arial")
        .font_size(13.0)
        .font_color(Color::theme(5, -0.5))
        .border(BorderStyle::outline(BorderLineStyle::MediumDashed, Color::rgb(1, 2, 3)))
        .number_format("0.000;[Red]-0.000")
        .horizontal_alignment(HorizontalAlignment::CenterContinuous)
        .wrap_text(true)
        .protection(Protection::unlocked());
    style.font.underline = Underline::DoubleAccounting;
    style.alignment.vertical = VerticalAlignment::Distributed;
    style.alignment.rotation = 90;
    style.fill = FillStyle::pattern(PatternType::DarkTrellis, Color::Indexed(12), Color::argb(0x80, 9, 9, 9));
    style
}

#[test]
fn test_styles_survive_write_and_read() {
    let mut sheet = Worksheet::new("Styled");
    sheet.set_cell_value("A1", "styled").unwrap();
    sheet.set_cell_style("A1", decorated_style()).unwrap();
    sheet.set_cell_value("B1", 1.0).unwrap();
    sheet
        .set_cell_style("B1", Style::new().fill_color(Color::rgb(0xFF, 0xC0, 0x00)))
        .unwrap();

    let mut gradient = Style::new();
    gradient.fill = FillStyle::Gradient(GradientFill {
        gradient_type: GradientType::Path,
        left: 0.5,
        right: 0.5,
        top: 0.5,
        bottom: 0.5,
        stops: vec![
            GradientStop::new(0.0, Color::WHITE),
            GradientStop::new(1.0, Color::theme(4, 0.0)),
        ],
        ..GradientFill::default()
    });
    sheet.set_cell_style("C1", gradient.clone()).unwrap();

    let mut workbook = Workbook::empty();
    workbook.add_existing_worksheet(sheet).unwrap();
    let read = round_trip(&workbook);
    let sheet = read.worksheet(0).unwrap();

    assert_eq!(sheet.cell_style_at(0, 0), Some(&decorated_style()));
    assert_eq!(
        sheet.cell_style_at(0, 1).map(|s| &s.fill),
        Some(&FillStyle::solid(Color::rgb(0xFF, 0xC0, 0x00)))
    );
    assert_eq!(sheet.cell_style_at(0, 2), Some(&gradient));
}

#[test]
fn test_values_survive_write_and_read() {
    let values = vec![
        CellValue::Number(0.1 + 0.2),
        CellValue::Number(-1e-300),
        CellValue::Number(123456789012345.0),
        CellValue::string("tab\tnewline\ncr\r"),
        CellValue::string("  leading and trailing  "),
        CellValue::string("<xml> & \"quotes\""),
        CellValue::Boolean(false),
        CellValue::Error("#REF!".into()),
        CellValue::Date("2021-07-01T12:00:00".into()),
        CellValue::formula_with_cached("SUM(A1:A3)", Some(CellValue::Number(7.0))),
        CellValue::formula_with_cached("A4&\"x\"", Some(CellValue::string("tabx"))),
        CellValue::formula_with_cached("1/0", Some(CellValue::Error("#DIV/0!".into()))),
        CellValue::formula_with_cached("TRUE()", Some(CellValue::Boolean(true))),
        CellValue::formula("RAND()"),
    ];

    let mut sheet = Worksheet::new("Values");
    for (row, value) in values.iter().enumerate() {
        sheet.set_cell_value_at(row as u32, 0, value.clone()).unwrap();
    }
    let mut workbook = Workbook::empty();
    workbook.add_existing_worksheet(sheet).unwrap();

    let read = round_trip(&workbook);
    let sheet = read.worksheet(0).unwrap();
    for (row, value) in values.iter().enumerate() {
        assert_eq!(&sheet.get_value_at(row as u32, 0), value, "row {}", row + 1);
    }
}

#[test]
fn test_layout_survives_write_and_read() {
    let mut sheet = Worksheet::new("Layout");
    sheet.set_cell_value("A1", "Header").unwrap();
    sheet.merge_cells(&"A1:C2".parse().unwrap()).unwrap();
    sheet.set_freeze_panes(2, 1);
    sheet.set_column_dim(0, ColumnDim::new().with_width(30.5));
    sheet.set_column_dim(1, ColumnDim::new().with_width(30.5));
    sheet.set_column_dim(7, ColumnDim::new().with_hidden(true).with_outline_level(1));
    sheet.set_row_dim(0, RowDim::new().with_height(40.0));
    sheet.set_row_dim(9, RowDim::new().with_hidden(true));

    let mut workbook = Workbook::empty();
    workbook.add_existing_worksheet(sheet.clone()).unwrap();
    let read = round_trip(&workbook);
    let back = read.worksheet(0).unwrap();

    assert_eq!(back.merged_regions(), sheet.merged_regions());
    assert_eq!(back.freeze_panes(), sheet.freeze_panes());
    assert_eq!(back.column_dim(0), sheet.column_dim(0));
    assert_eq!(back.column_dim(1), sheet.column_dim(1));
    assert_eq!(back.column_dim(7).map(|d| (d.hidden, d.outline_level)), Some((true, 1)));
    assert_eq!(back.row_dim(0), sheet.row_dim(0));
    assert_eq!(back.row_dim(9), sheet.row_dim(9));
}

#[test]
fn test_many_sheets_keep_order_and_titles() {
    let mut workbook = Workbook::empty();
    for name in ["매출", "Q1 & Q2", "it's", "Sheet_1"] {
        let mut sheet = Worksheet::new(name);
        sheet.set_cell_value("A1", name).unwrap();
        workbook.add_existing_worksheet(sheet).unwrap();
    }

    let read = round_trip(&workbook);
    assert_eq!(read.sheet_names(), workbook.sheet_names());
    for sheet in read.worksheets() {
        assert_eq!(sheet.get_value_at(0, 0), CellValue::string(sheet.name()));
    }
}

#[test]
fn test_write_file() {
    let mut workbook = Workbook::empty();
    workbook.add_worksheet_with_name("Only").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    XlsxWriter::write_file(&workbook, &path).unwrap();

    let read = XlsxReader::read_file(&path).unwrap();
    assert_eq!(read.sheet_names(), vec!["Only"]);
}
