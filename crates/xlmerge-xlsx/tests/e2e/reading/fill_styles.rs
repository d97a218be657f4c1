//! Tests for reading fill styles from XLSX files.

use crate::{sheet_with_rows, StylesBuilder};
use pretty_assertions::assert_eq;
use xlmerge_core::style::{GradientStop, GradientType, PatternType};
use xlmerge_core::{Color, FillStyle};

fn read_fill(fill_xml: &str) -> FillStyle {
    let mut styles = StylesBuilder::new();
    let fill = styles.fill(fill_xml);
    let xf = styles.xf(0, 0, fill, 0, "");
    let workbook = sheet_with_rows(&format!(r#"<row r="1"><c r="A1" s="{}"/></row>"#, xf))
        .styles(&styles)
        .read();
    workbook
        .worksheet(0)
        .unwrap()
        .cell_style_at(0, 0)
        .expect("A1 should have style")
        .fill
        .clone()
}

#[test]
fn test_solid_fill() {
    let fill = read_fill(
        r#"<fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>"#,
    );
    assert_eq!(fill, FillStyle::solid(Color::rgb(255, 255, 0)));
}

#[test]
fn test_solid_fill_with_theme_color() {
    let fill = read_fill(
        r#"<fill><patternFill patternType="solid"><fgColor theme="4" tint="0.79998168889431442"/><bgColor indexed="64"/></patternFill></fill>"#,
    );
    assert_eq!(fill, FillStyle::solid(Color::theme(4, 0.79998168889431442)));
}

#[test]
fn test_pattern_fill_keeps_both_colors() {
    let fill = read_fill(
        r#"<fill><patternFill patternType="lightGrid"><fgColor rgb="FF0000FF"/><bgColor rgb="FFFFFFFF"/></patternFill></fill>"#,
    );
    assert_eq!(
        fill,
        FillStyle::pattern(PatternType::LightGrid, Color::rgb(0, 0, 255), Color::WHITE)
    );
}

#[test]
fn test_gradient_fill() {
    let fill = read_fill(
        r#"<fill><gradientFill degree="90"><stop position="0"><color theme="0"/></stop><stop position="1"><color rgb="FF4472C4"/></stop></gradientFill></fill>"#,
    );
    match fill {
        FillStyle::Gradient(g) => {
            assert_eq!(g.gradient_type, GradientType::Linear);
            assert_eq!(g.degree, 90.0);
            assert_eq!(
                g.stops,
                vec![
                    GradientStop::new(0.0, Color::theme(0, 0.0)),
                    GradientStop::new(1.0, Color::rgb(0x44, 0x72, 0xC4)),
                ]
            );
        }
        other => panic!("expected a gradient, got {:?}", other),
    }
}

#[test]
fn test_no_fill() {
    let fill = read_fill(r#"<fill><patternFill patternType="none"/></fill>"#);
    assert!(fill.is_none());
}
