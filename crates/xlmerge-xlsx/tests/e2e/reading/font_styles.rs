//! Tests for reading font styles from XLSX files.

use crate::{sheet_with_rows, StylesBuilder};
use pretty_assertions::assert_eq;
use xlmerge_core::style::{FontScheme, FontVerticalAlign, Underline};
use xlmerge_core::{Color, Style, Workbook};

fn read_font(font_xml: &str) -> Workbook {
    let mut styles = StylesBuilder::new();
    let font = styles.font(font_xml);
    let xf = styles.xf(0, font, 0, 0, "");
    sheet_with_rows(&format!(
        r#"<row r="1"><c r="A1" s="{}" t="s"><v>0</v></c></row>"#,
        xf
    ))
    .shared_strings(&["Styled"])
    .styles(&styles)
    .read()
}

fn a1_style(workbook: &Workbook) -> &Style {
    workbook
        .worksheet(0)
        .unwrap()
        .cell_style_at(0, 0)
        .expect("A1 should have style")
}

#[test]
fn test_bold() {
    let workbook = read_font(r#"<font><b/><sz val="11"/><name val="Calibri"/></font>"#);
    assert!(a1_style(&workbook).font.bold, "Font should be bold");
}

#[test]
fn test_toggle_with_false_value() {
    let workbook = read_font(r#"<font><b val="0"/><i val="false"/><sz val="11"/><name val="Calibri"/></font>"#);
    let font = &a1_style(&workbook).font;
    assert!(!font.bold);
    assert!(!font.italic);
}

#[test]
fn test_italic_strike_underline() {
    let workbook = read_font(
        r#"<font><i/><strike/><u val="double"/><sz val="11"/><name val="Calibri"/></font>"#,
    );
    let font = &a1_style(&workbook).font;
    assert!(font.italic);
    assert!(font.strikethrough);
    assert_eq!(font.underline, Underline::Double);
}

#[test]
fn test_plain_underline_element_is_single() {
    let workbook = read_font(r#"<font><u/><sz val="11"/><name val="Calibri"/></font>"#);
    assert_eq!(a1_style(&workbook).font.underline, Underline::Single);
}

#[test]
fn test_superscript_and_subscript() {
    let workbook =
        read_font(r#"<font><vertAlign val="superscript"/><sz val="11"/><name val="Calibri"/></font>"#);
    assert_eq!(
        a1_style(&workbook).font.vertical_align,
        FontVerticalAlign::Superscript
    );

    let workbook =
        read_font(r#"<font><vertAlign val="subscript"/><sz val="11"/><name val="Calibri"/></font>"#);
    assert_eq!(
        a1_style(&workbook).font.vertical_align,
        FontVerticalAlign::Subscript
    );
}

#[test]
fn test_name_size_family_scheme() {
    let workbook = read_font(
        r#"<font><sz val="14.5"/><name val="맑은 고딕"/><family val="3"/><charset val="129"/><scheme val="minor"/></font>"#,
    );
    let font = &a1_style(&workbook).font;
    assert_eq!(font.name, "맑은 고딕");
    assert_eq!(font.size, 14.5);
    assert_eq!(font.family, Some(3));
    assert_eq!(font.charset, Some(129));
    assert_eq!(font.scheme, FontScheme::Minor);
}

#[test]
fn test_font_colors() {
    let workbook =
        read_font(r#"<font><sz val="11"/><color rgb="FFFF0000"/><name val="Calibri"/></font>"#);
    assert_eq!(a1_style(&workbook).font.color, Color::rgb(255, 0, 0));

    let workbook = read_font(
        r#"<font><sz val="11"/><color theme="1" tint="-0.249977111117893"/><name val="Calibri"/></font>"#,
    );
    assert_eq!(
        a1_style(&workbook).font.color,
        Color::theme(1, -0.249977111117893)
    );

    let workbook =
        read_font(r#"<font><sz val="11"/><color indexed="10"/><name val="Calibri"/></font>"#);
    assert_eq!(a1_style(&workbook).font.color, Color::Indexed(10));
}

#[test]
fn test_cells_sharing_an_xf_get_equal_but_separate_styles() {
    let mut styles = StylesBuilder::new();
    let font = styles.font(r#"<font><b/><sz val="11"/><name val="Calibri"/></font>"#);
    let xf = styles.xf(0, font, 0, 0, "");
    let mut workbook = sheet_with_rows(&format!(
        r#"<row r="1"><c r="A1" s="{0}"><v>1</v></c><c r="B1" s="{0}"><v>2</v></c></row>"#,
        xf
    ))
    .styles(&styles)
    .read();

    let sheet = workbook.worksheet_mut(0).unwrap();
    assert_eq!(sheet.cell_style_at(0, 0), sheet.cell_style_at(0, 1));

    sheet.cell_style_at_mut(0, 0).unwrap().font.italic = true;
    assert!(!sheet.cell_style_at(0, 1).unwrap().font.italic);
}
