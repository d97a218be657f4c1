//! Tests for reading border styles from XLSX files.

use crate::{sheet_with_rows, StylesBuilder};
use pretty_assertions::assert_eq;
use xlmerge_core::{BorderEdge, BorderLineStyle, BorderStyle, Color};

fn read_border(border_xml: &str) -> BorderStyle {
    let mut styles = StylesBuilder::new();
    let border = styles.border(border_xml);
    let xf = styles.xf(0, 0, 0, border, "");
    let workbook = sheet_with_rows(&format!(r#"<row r="2"><c r="B2" s="{}"/></row>"#, xf))
        .styles(&styles)
        .read();
    workbook
        .worksheet(0)
        .unwrap()
        .cell_style_at(1, 1)
        .expect("B2 should have style")
        .border
        .clone()
}

#[test]
fn test_thin_outline() {
    let border = read_border(
        r#"<border><left style="thin"><color indexed="64"/></left><right style="thin"><color indexed="64"/></right><top style="thin"><color indexed="64"/></top><bottom style="thin"><color indexed="64"/></bottom><diagonal/></border>"#,
    );
    assert_eq!(border, BorderStyle::outline(BorderLineStyle::Thin, Color::Indexed(64)));
}

#[test]
fn test_mixed_edges() {
    let border = read_border(
        r#"<border><left/><right/><top style="double"><color rgb="FFFF0000"/></top><bottom style="mediumDashDot"><color auto="1"/></bottom><diagonal/></border>"#,
    );

    assert!(border.left.is_none());
    assert!(border.right.is_none());
    assert_eq!(
        border.top,
        Some(BorderEdge::new(BorderLineStyle::Double, Color::rgb(255, 0, 0)))
    );
    assert_eq!(
        border.bottom,
        Some(BorderEdge::new(BorderLineStyle::MediumDashDot, Color::Auto))
    );
}

#[test]
fn test_start_end_edges() {
    let border = read_border(
        r#"<border><start style="thick"/><end style="hair"/><top/><bottom/></border>"#,
    );
    assert_eq!(border.left.map(|e| e.style), Some(BorderLineStyle::Thick));
    assert_eq!(border.right.map(|e| e.style), Some(BorderLineStyle::Hair));
}

#[test]
fn test_diagonal() {
    let border = read_border(
        r#"<border diagonalUp="1"><left/><right/><top/><bottom/><diagonal style="dashed"><color rgb="FF00FF00"/></diagonal></border>"#,
    );
    assert!(border.diagonal_up);
    assert!(!border.diagonal_down);
    assert_eq!(
        border.diagonal,
        Some(BorderEdge::new(BorderLineStyle::Dashed, Color::rgb(0, 255, 0)))
    );
}
