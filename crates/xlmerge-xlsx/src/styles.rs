//! XLSX styles (styles.xml) read/write helpers

use std::io::{BufReader, Read};

use ahash::AHashMap;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use xlmerge_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontScheme, FontStyle,
    FontVerticalAlign, GradientFill, GradientStop, GradientType, HorizontalAlignment,
    NumberFormat, PatternType, Protection, ReadingOrder, Style, Underline, VerticalAlignment,
};
use xlmerge_core::Workbook;

/// First id available for custom number formats
const FIRST_CUSTOM_NUMFMT_ID: u32 = 164;

// === Writing ===

/// Workbook-wide table of distinct cell styles
///
/// Cells own their styles, so equal styles are only merged here, when the
/// `cellXfs` list is built. Slot 0 is the document default and is used by
/// unstyled cells only; every owned style gets an index of 1 or more.
#[derive(Debug)]
pub(crate) struct XlsxStyleTable<'a> {
    styles: Vec<&'a Style>,
    xf_ids: AHashMap<&'a Style, u32>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

/// Component list that hands out one id per distinct entry
struct Interner<'a, T: Eq + std::hash::Hash> {
    items: Vec<&'a T>,
    ids: AHashMap<&'a T, u32>,
}

impl<'a, T: Eq + std::hash::Hash> Interner<'a, T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: AHashMap::new(),
        }
    }

    fn intern(&mut self, item: &'a T) -> u32 {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }
        let id = self.items.len() as u32;
        self.items.push(item);
        self.ids.insert(item, id);
        id
    }
}

impl<'a> XlsxStyleTable<'a> {
    pub(crate) fn build(workbook: &'a Workbook) -> Self {
        let mut styles: Vec<&'a Style> = Vec::new();
        let mut xf_ids: AHashMap<&'a Style, u32> = AHashMap::new();

        for sheet in workbook.worksheets() {
            for (_row, _col, cell) in sheet.iter_cells() {
                if let Some(style) = cell.style.as_ref() {
                    if !xf_ids.contains_key(style) {
                        let id = styles.len() as u32 + 1;
                        styles.push(style);
                        xf_ids.insert(style, id);
                    }
                }
            }
        }

        Self { styles, xf_ids }
    }

    /// The `s` attribute for a cell (0 = unstyled)
    pub(crate) fn xf_id_for(&self, style: Option<&Style>) -> u32 {
        style
            .and_then(|s| self.xf_ids.get(s).copied())
            .unwrap_or(0)
    }

    /// Number of `cellXfs` entries, including the default slot
    pub(crate) fn xf_count(&self) -> usize {
        self.styles.len() + 1
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let default_style = Style::default();
        let gray125 = FillStyle::pattern(PatternType::Gray125, Color::Auto, Color::Auto);

        let mut fonts = Interner::new();
        fonts.intern(&default_style.font);

        // Excel requires the first two fills to be none and gray125
        let mut fills = Interner::new();
        fills.intern(&default_style.fill);
        fills.intern(&gray125);

        let mut borders = Interner::new();
        borders.intern(&default_style.border);

        let mut numfmt_ids: AHashMap<&str, u32> = AHashMap::new();
        let mut numfmts: Vec<(u32, &str)> = Vec::new();

        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.xf_count());
        for style in std::iter::once(&default_style).chain(self.styles.iter().copied()) {
            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => match numfmt_ids.get(code.as_str()) {
                    Some(&id) => id,
                    None => {
                        let id = FIRST_CUSTOM_NUMFMT_ID + numfmts.len() as u32;
                        numfmt_ids.insert(code.as_str(), id);
                        numfmts.push((id, code.as_str()));
                        id
                    }
                },
            };

            resolved.push(ResolvedXfIds {
                font_id: fonts.intern(&style.font),
                fill_id: fills.intern(&style.fill),
                border_id: borders.intern(&style.border),
                num_fmt_id,
            });
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape(*code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.items.len()));
        for font in &fonts.items {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.items.len()));
        for fill in &fills.items {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(&format!("\n  <borders count=\"{}\">", borders.items.len()));
        for border in &borders.items {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", resolved.len()));
        xml.push_str("\n    ");
        xml.push_str(&write_xf(&default_style, resolved[0]));
        for (style, ids) in self.styles.iter().zip(resolved.iter().skip(1)) {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
        );

        xml.push_str("\n</styleSheet>");
        xml
    }
}

/// Attributes of a color element (empty for the automatic color)
fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => String::new(),
        Color::Rgb { .. } | Color::Argb { .. } => {
            format!(" rgb=\"{}\"", color.to_argb_hex().unwrap_or_default())
        }
        Color::Indexed(i) => format!(" indexed=\"{}\"", i),
        Color::Theme { index, tint } => {
            if *tint == 0.0 {
                format!(" theme=\"{}\"", index)
            } else {
                format!(" theme=\"{}\" tint=\"{}\"", index, tint)
            }
        }
    }
}

fn write_color(tag: &str, color: &Color) -> String {
    if color.is_auto() {
        String::new()
    } else {
        format!("<{tag}{}/>", color_attrs(color))
    }
}

fn bool_element(tag: &str, on: bool) -> &str {
    if on {
        tag
    } else {
        ""
    }
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    s.push_str(bool_element("<b/>", font.bold));
    s.push_str(bool_element("<i/>", font.italic));
    s.push_str(bool_element("<strike/>", font.strikethrough));
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
        Underline::Double => s.push_str("<u val=\"double\"/>"),
        Underline::SingleAccounting => s.push_str("<u val=\"singleAccounting\"/>"),
        Underline::DoubleAccounting => s.push_str("<u val=\"doubleAccounting\"/>"),
    }
    match font.vertical_align {
        FontVerticalAlign::Baseline => {}
        FontVerticalAlign::Superscript => s.push_str("<vertAlign val=\"superscript\"/>"),
        FontVerticalAlign::Subscript => s.push_str("<vertAlign val=\"subscript\"/>"),
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    s.push_str(&write_color("color", &font.color));
    s.push_str(&format!("<name val=\"{}\"/>", escape(font.name.as_str())));
    if let Some(family) = font.family {
        s.push_str(&format!("<family val=\"{}\"/>", family));
    }
    if let Some(charset) = font.charset {
        s.push_str(&format!("<charset val=\"{}\"/>", charset));
    }
    match font.scheme {
        FontScheme::None => {}
        FontScheme::Minor => s.push_str("<scheme val=\"minor\"/>"),
        FontScheme::Major => s.push_str("<scheme val=\"major\"/>"),
    }
    s.push_str("</font>");
    s
}

fn pattern_type_to_str(p: PatternType) -> &'static str {
    match p {
        PatternType::None => "none",
        PatternType::Solid => "solid",
        PatternType::MediumGray => "mediumGray",
        PatternType::DarkGray => "darkGray",
        PatternType::LightGray => "lightGray",
        PatternType::DarkHorizontal => "darkHorizontal",
        PatternType::DarkVertical => "darkVertical",
        PatternType::DarkDown => "darkDown",
        PatternType::DarkUp => "darkUp",
        PatternType::DarkGrid => "darkGrid",
        PatternType::DarkTrellis => "darkTrellis",
        PatternType::LightHorizontal => "lightHorizontal",
        PatternType::LightVertical => "lightVertical",
        PatternType::LightDown => "lightDown",
        PatternType::LightUp => "lightUp",
        PatternType::LightGrid => "lightGrid",
        PatternType::LightTrellis => "lightTrellis",
        PatternType::Gray125 => "gray125",
        PatternType::Gray0625 => "gray0625",
    }
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\">{}<bgColor indexed=\"64\"/></patternFill></fill>",
            write_color("fgColor", color)
        ),
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => {
            let colors = format!(
                "{}{}",
                write_color("fgColor", foreground),
                write_color("bgColor", background)
            );
            if colors.is_empty() {
                format!(
                    "<fill><patternFill patternType=\"{}\"/></fill>",
                    pattern_type_to_str(*pattern)
                )
            } else {
                format!(
                    "<fill><patternFill patternType=\"{}\">{}</patternFill></fill>",
                    pattern_type_to_str(*pattern),
                    colors
                )
            }
        }
        FillStyle::Gradient(gradient) => write_gradient(gradient),
    }
}

fn write_gradient(g: &GradientFill) -> String {
    let mut s = String::from("<fill><gradientFill");
    match g.gradient_type {
        GradientType::Linear => {
            if g.degree != 0.0 {
                s.push_str(&format!(" degree=\"{}\"", g.degree));
            }
        }
        GradientType::Path => {
            s.push_str(" type=\"path\"");
            for (name, v) in [
                ("left", g.left),
                ("right", g.right),
                ("top", g.top),
                ("bottom", g.bottom),
            ] {
                if v != 0.0 {
                    s.push_str(&format!(" {}=\"{}\"", name, v));
                }
            }
        }
    }
    s.push('>');
    for stop in &g.stops {
        s.push_str(&format!(
            "<stop position=\"{}\"><color{}/></stop>",
            stop.position,
            color_attrs(&stop.color)
        ));
    }
    s.push_str("</gradientFill></fill>");
    s
}

fn border_style_to_str(s: BorderLineStyle) -> Option<&'static str> {
    match s {
        BorderLineStyle::None => None,
        BorderLineStyle::Thin => Some("thin"),
        BorderLineStyle::Medium => Some("medium"),
        BorderLineStyle::Thick => Some("thick"),
        BorderLineStyle::Dashed => Some("dashed"),
        BorderLineStyle::Dotted => Some("dotted"),
        BorderLineStyle::Double => Some("double"),
        BorderLineStyle::Hair => Some("hair"),
        BorderLineStyle::MediumDashed => Some("mediumDashed"),
        BorderLineStyle::DashDot => Some("dashDot"),
        BorderLineStyle::MediumDashDot => Some("mediumDashDot"),
        BorderLineStyle::DashDotDot => Some("dashDotDot"),
        BorderLineStyle::MediumDashDotDot => Some("mediumDashDotDot"),
        BorderLineStyle::SlantDashDot => Some("slantDashDot"),
    }
}

fn write_border_edge(tag: &str, edge: &Option<BorderEdge>) -> String {
    let Some(edge) = edge else {
        return format!("<{tag}/>");
    };
    let Some(style) = border_style_to_str(edge.style) else {
        return format!("<{tag}/>");
    };
    format!(
        "<{tag} style=\"{}\">{}</{tag}>",
        style,
        write_color("color", &edge.color)
    )
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border");
    if border.diagonal_up {
        s.push_str(" diagonalUp=\"1\"");
    }
    if border.diagonal_down {
        s.push_str(" diagonalDown=\"1\"");
    }
    s.push('>');
    s.push_str(&write_border_edge("left", &border.left));
    s.push_str(&write_border_edge("right", &border.right));
    s.push_str(&write_border_edge("top", &border.top));
    s.push_str(&write_border_edge("bottom", &border.bottom));
    s.push_str(&write_border_edge("diagonal", &border.diagonal));
    s.push_str("</border>");
    s
}

fn horiz_to_str(h: HorizontalAlignment) -> &'static str {
    match h {
        HorizontalAlignment::General => "general",
        HorizontalAlignment::Left => "left",
        HorizontalAlignment::Center => "center",
        HorizontalAlignment::Right => "right",
        HorizontalAlignment::Fill => "fill",
        HorizontalAlignment::Justify => "justify",
        HorizontalAlignment::CenterContinuous => "centerContinuous",
        HorizontalAlignment::Distributed => "distributed",
    }
}

fn vert_to_str(v: VerticalAlignment) -> &'static str {
    match v {
        VerticalAlignment::Top => "top",
        VerticalAlignment::Center => "center",
        VerticalAlignment::Bottom => "bottom",
        VerticalAlignment::Justify => "justify",
        VerticalAlignment::Distributed => "distributed",
    }
}

fn write_alignment(al: &Alignment) -> String {
    let default = Alignment::default();
    if al == &default {
        return String::new();
    }

    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", horiz_to_str(al.horizontal)));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", vert_to_str(al.vertical)));
    }
    if al.rotation != 0 {
        s.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    if al.indent != 0 {
        s.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.justify_last_line {
        s.push_str(" justifyLastLine=\"1\"");
    }
    if al.shrink_to_fit {
        s.push_str(" shrinkToFit=\"1\"");
    }
    match al.reading_order {
        ReadingOrder::ContextDependent => {}
        ReadingOrder::LeftToRight => s.push_str(" readingOrder=\"1\""),
        ReadingOrder::RightToLeft => s.push_str(" readingOrder=\"2\""),
    }
    s.push_str("/>");
    s
}

fn write_protection(p: &Protection) -> String {
    let default = Protection::default();
    if p == &default {
        return String::new();
    }
    format!(
        "<protection locked=\"{}\" hidden=\"{}\"/>",
        u8::from(p.locked),
        u8::from(p.hidden)
    )
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if ids.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }
    if ids.fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }
    if ids.border_id != 0 {
        attrs.push_str(" applyBorder=\"1\"");
    }
    if style.alignment != Alignment::default() {
        attrs.push_str(" applyAlignment=\"1\"");
    }
    if style.protection != Protection::default() {
        attrs.push_str(" applyProtection=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id, attrs
    );

    let alignment_xml = write_alignment(&style.alignment);
    let protection_xml = write_protection(&style.protection);
    if alignment_xml.is_empty() && protection_xml.is_empty() {
        s.push_str("/>");
        return s;
    }

    s.push('>');
    s.push_str(&alignment_xml);
    s.push_str(&protection_xml);
    s.push_str("</xf>");
    s
}

// === Reading ===

/// Which top-level list of styles.xml the parser is inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
    /// Lists whose entries are not cell formats (cellStyleXfs, dxfs, ...)
    Other,
}

/// One `xf` entry before its component ids are resolved
#[derive(Debug, Default)]
struct RawXf {
    num_fmt_id: u32,
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    alignment: Alignment,
    protection: Protection,
}

/// A fill while its children are being read
#[derive(Debug)]
enum FillBuilder {
    Pattern {
        pattern: PatternType,
        fg: Color,
        bg: Color,
    },
    Gradient(GradientFill),
}

/// Read the `cellXfs` list of a styles part as fully resolved styles,
/// indexed like the `s` attribute of cells.
pub(crate) fn read_styles_xml<R: Read>(reader: R, part: &str) -> XlsxResult<Vec<Style>> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();

    let mut numfmts: AHashMap<u32, String> = AHashMap::new();
    let mut fonts: Vec<FontStyle> = Vec::new();
    let mut fills: Vec<FillStyle> = Vec::new();
    let mut borders: Vec<BorderStyle> = Vec::new();
    let mut xfs: Vec<RawXf> = Vec::new();

    let mut section = Section::None;
    let mut font: Option<FontStyle> = None;
    let mut fill: Option<FillBuilder> = None;
    let mut stop_position: Option<f64> = None;
    let mut border: Option<BorderStyle> = None;
    let mut border_edge: Option<&'static str> = None;
    let mut xf: Option<RawXf> = None;

    loop {
        let event = xml_reader
            .read_event_into(&mut buf)
            .map_err(|e| XlsxError::xml(part, e))?;
        let is_empty = matches!(event, Event::Empty(_));

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"numFmts" if !is_empty => section = Section::NumFmts,
                b"fonts" if !is_empty => section = Section::Fonts,
                b"fills" if !is_empty => section = Section::Fills,
                b"borders" if !is_empty => section = Section::Borders,
                b"cellXfs" if !is_empty => section = Section::CellXfs,
                b"cellStyleXfs" | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors"
                | b"extLst"
                    if !is_empty =>
                {
                    section = Section::Other
                }

                b"numFmt" if section == Section::NumFmts => {
                    let id = attr_value(e, b"numFmtId").and_then(|v| v.parse().ok());
                    let code = attr_value(e, b"formatCode");
                    if let (Some(id), Some(code)) = (id, code) {
                        numfmts.insert(id, code);
                    }
                }

                // Fonts
                b"font" if section == Section::Fonts => {
                    let f = FontStyle::default();
                    if is_empty {
                        fonts.push(f);
                    } else {
                        font = Some(f);
                    }
                }
                b"b" if font.is_some() => set_font(&mut font, |f| f.bold = bool_val(e)),
                b"i" if font.is_some() => set_font(&mut font, |f| f.italic = bool_val(e)),
                b"strike" if font.is_some() => {
                    set_font(&mut font, |f| f.strikethrough = bool_val(e))
                }
                b"u" if font.is_some() => {
                    let underline = str_to_underline(attr_value(e, b"val").as_deref());
                    set_font(&mut font, |f| f.underline = underline)
                }
                b"vertAlign" if font.is_some() => {
                    let align = match attr_value(e, b"val").as_deref() {
                        Some("superscript") => FontVerticalAlign::Superscript,
                        Some("subscript") => FontVerticalAlign::Subscript,
                        _ => FontVerticalAlign::Baseline,
                    };
                    set_font(&mut font, |f| f.vertical_align = align)
                }
                b"sz" if font.is_some() => {
                    if let Some(size) = attr_value(e, b"val").and_then(|v| v.parse().ok()) {
                        set_font(&mut font, |f| f.size = size)
                    }
                }
                b"name" | b"rFont" if font.is_some() => {
                    if let Some(name) = attr_value(e, b"val") {
                        set_font(&mut font, |f| f.name = name)
                    }
                }
                b"family" if font.is_some() => {
                    let family = attr_value(e, b"val").and_then(|v| v.parse().ok());
                    set_font(&mut font, |f| f.family = family)
                }
                b"charset" if font.is_some() => {
                    let charset = attr_value(e, b"val").and_then(|v| v.parse().ok());
                    set_font(&mut font, |f| f.charset = charset)
                }
                b"scheme" if font.is_some() => {
                    let scheme = match attr_value(e, b"val").as_deref() {
                        Some("minor") => FontScheme::Minor,
                        Some("major") => FontScheme::Major,
                        _ => FontScheme::None,
                    };
                    set_font(&mut font, |f| f.scheme = scheme)
                }
                b"color" if font.is_some() => {
                    let color = parse_color_attrs(e);
                    set_font(&mut font, |f| f.color = color)
                }

                // Fills
                b"fill" if section == Section::Fills => {
                    if is_empty {
                        fills.push(FillStyle::None);
                    } else {
                        fill = None;
                    }
                }
                b"patternFill" if section == Section::Fills => {
                    let pattern = attr_value(e, b"patternType")
                        .and_then(|v| str_to_pattern_type(&v))
                        .unwrap_or(PatternType::None);
                    fill = Some(FillBuilder::Pattern {
                        pattern,
                        fg: Color::Auto,
                        bg: Color::Auto,
                    });
                }
                b"fgColor" => {
                    if let Some(FillBuilder::Pattern { fg, .. }) = fill.as_mut() {
                        *fg = parse_color_attrs(e);
                    }
                }
                b"bgColor" => {
                    if let Some(FillBuilder::Pattern { bg, .. }) = fill.as_mut() {
                        *bg = parse_color_attrs(e);
                    }
                }
                b"gradientFill" if section == Section::Fills => {
                    let mut g = GradientFill::default();
                    if attr_value(e, b"type").as_deref() == Some("path") {
                        g.gradient_type = GradientType::Path;
                    }
                    let num = |name: &[u8]| {
                        attr_value(e, name)
                            .and_then(|v| v.parse::<f64>().ok())
                            .unwrap_or(0.0)
                    };
                    g.degree = num(b"degree");
                    g.left = num(b"left");
                    g.right = num(b"right");
                    g.top = num(b"top");
                    g.bottom = num(b"bottom");
                    fill = Some(FillBuilder::Gradient(g));
                }
                b"stop" if section == Section::Fills => {
                    stop_position = attr_value(e, b"position").and_then(|v| v.parse().ok());
                }
                b"color" if stop_position.is_some() => {
                    if let (Some(FillBuilder::Gradient(g)), Some(position)) =
                        (fill.as_mut(), stop_position)
                    {
                        g.stops
                            .push(GradientStop::new(position, parse_color_attrs(e)));
                    }
                }

                // Borders
                b"border" if section == Section::Borders => {
                    let mut b = BorderStyle::default();
                    b.diagonal_up = attr_flag(e, b"diagonalUp");
                    b.diagonal_down = attr_flag(e, b"diagonalDown");
                    if is_empty {
                        borders.push(b);
                    } else {
                        border = Some(b);
                    }
                }
                b"left" | b"right" | b"top" | b"bottom" | b"diagonal" | b"start" | b"end"
                    if border.is_some() =>
                {
                    let edge = match e.local_name().as_ref() {
                        b"left" | b"start" => "left",
                        b"right" | b"end" => "right",
                        b"top" => "top",
                        b"bottom" => "bottom",
                        _ => "diagonal",
                    };
                    let style = attr_value(e, b"style").and_then(|v| str_to_border_style(&v));
                    if let (Some(b), Some(style)) = (border.as_mut(), style) {
                        set_border_edge(b, edge, Some(BorderEdge::new(style, Color::Auto)));
                    }
                    if !is_empty {
                        border_edge = Some(edge);
                    }
                }
                b"color" if border_edge.is_some() => {
                    if let (Some(b), Some(edge)) = (border.as_mut(), border_edge) {
                        let color = parse_color_attrs(e);
                        if let Some(existing) = get_border_edge_mut(b, edge) {
                            existing.color = color;
                        }
                    }
                }

                // Cell formats
                b"xf" if section == Section::CellXfs => {
                    let id = |name: &[u8]| {
                        attr_value(e, name)
                            .and_then(|v| v.parse::<u32>().ok())
                            .unwrap_or(0)
                    };
                    let raw = RawXf {
                        num_fmt_id: id(b"numFmtId"),
                        font_id: id(b"fontId"),
                        fill_id: id(b"fillId"),
                        border_id: id(b"borderId"),
                        ..RawXf::default()
                    };
                    if is_empty {
                        xfs.push(raw);
                    } else {
                        xf = Some(raw);
                    }
                }
                b"alignment" => {
                    if let Some(raw) = xf.as_mut() {
                        parse_alignment(e, &mut raw.alignment);
                    }
                }
                b"protection" => {
                    if let Some(raw) = xf.as_mut() {
                        if let Some(v) = attr_value(e, b"locked") {
                            raw.protection.locked = is_true(&v);
                        }
                        if let Some(v) = attr_value(e, b"hidden") {
                            raw.protection.hidden = is_true(&v);
                        }
                    }
                }
                _ => {}
            },

            Event::End(ref e) => match e.local_name().as_ref() {
                b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs" | b"cellStyleXfs"
                | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors" | b"extLst" => {
                    section = Section::None
                }
                b"font" if section == Section::Fonts => {
                    if let Some(f) = font.take() {
                        fonts.push(f);
                    }
                }
                b"fill" if section == Section::Fills => {
                    fills.push(finalize_fill(fill.take()));
                }
                b"stop" => stop_position = None,
                b"left" | b"right" | b"top" | b"bottom" | b"diagonal" | b"start" | b"end" => {
                    border_edge = None
                }
                b"border" if section == Section::Borders => {
                    if let Some(b) = border.take() {
                        borders.push(b);
                    }
                }
                b"xf" => {
                    if let Some(raw) = xf.take() {
                        xfs.push(raw);
                    }
                }
                _ => {}
            },

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(xfs
        .into_iter()
        .map(|raw| resolve_style(raw, &numfmts, &fonts, &fills, &borders))
        .collect())
}

fn resolve_style(
    raw: RawXf,
    numfmts: &AHashMap<u32, String>,
    fonts: &[FontStyle],
    fills: &[FillStyle],
    borders: &[BorderStyle],
) -> Style {
    let number_format = match numfmts.get(&raw.num_fmt_id) {
        Some(code) => NumberFormat::from_code(code.as_str()),
        None => NumberFormat::from_id(raw.num_fmt_id),
    };

    Style {
        font: fonts.get(raw.font_id as usize).cloned().unwrap_or_default(),
        fill: fills.get(raw.fill_id as usize).cloned().unwrap_or_default(),
        border: borders
            .get(raw.border_id as usize)
            .cloned()
            .unwrap_or_default(),
        alignment: raw.alignment,
        number_format,
        protection: raw.protection,
    }
}

fn finalize_fill(fill: Option<FillBuilder>) -> FillStyle {
    match fill {
        None => FillStyle::None,
        Some(FillBuilder::Gradient(g)) => FillStyle::Gradient(g),
        Some(FillBuilder::Pattern { pattern, fg, bg }) => match pattern {
            PatternType::None => FillStyle::None,
            PatternType::Solid if matches!(bg, Color::Auto | Color::Indexed(64)) => {
                FillStyle::Solid { color: fg }
            }
            p => FillStyle::Pattern {
                pattern: p,
                foreground: fg,
                background: bg,
            },
        },
    }
}

fn set_font(font: &mut Option<FontStyle>, apply: impl FnOnce(&mut FontStyle)) {
    if let Some(f) = font.as_mut() {
        apply(f);
    }
}

fn parse_alignment(e: &BytesStart<'_>, align: &mut Alignment) {
    for attr in e.attributes().flatten() {
        let val = match attr.unescape_value() {
            Ok(v) => v,
            Err(_) => continue,
        };
        match attr.key.as_ref() {
            b"horizontal" => {
                if let Some(h) = str_to_horizontal(&val) {
                    align.horizontal = h;
                }
            }
            b"vertical" => {
                if let Some(v) = str_to_vertical(&val) {
                    align.vertical = v;
                }
            }
            b"wrapText" => align.wrap_text = is_true(&val),
            b"shrinkToFit" => align.shrink_to_fit = is_true(&val),
            b"justifyLastLine" => align.justify_last_line = is_true(&val),
            b"indent" => align.indent = val.parse::<u8>().unwrap_or(0),
            b"textRotation" => align.rotation = val.parse::<u8>().unwrap_or(0),
            b"readingOrder" => {
                align.reading_order = match val.as_ref() {
                    "1" => ReadingOrder::LeftToRight,
                    "2" => ReadingOrder::RightToLeft,
                    _ => ReadingOrder::ContextDependent,
                };
            }
            _ => {}
        }
    }
}

pub(crate) fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

pub(crate) fn is_true(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

pub(crate) fn attr_flag(e: &BytesStart<'_>, name: &[u8]) -> bool {
    attr_value(e, name).map_or(false, |v| is_true(&v))
}

/// `<b/>` style toggles: present means on unless `val` says otherwise
fn bool_val(e: &BytesStart<'_>) -> bool {
    attr_value(e, b"val").map_or(true, |v| is_true(&v))
}

fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    // Priority: rgb > theme > indexed > auto
    let mut rgb: Option<String> = None;
    let mut theme: Option<u8> = None;
    let mut tint: f64 = 0.0;
    let mut indexed: Option<u8> = None;

    for attr in e.attributes().flatten() {
        let Ok(val) = attr.unescape_value() else {
            continue;
        };
        match attr.key.as_ref() {
            b"rgb" => rgb = Some(val.into_owned()),
            b"theme" => theme = val.parse().ok(),
            b"tint" => tint = val.parse().unwrap_or(0.0),
            b"indexed" => indexed = val.parse().ok(),
            _ => {}
        }
    }

    // Opaque ARGB values are plain RGB; writing them back yields the same attribute
    match rgb.as_deref().and_then(Color::from_hex) {
        Some(Color::Argb { a: 0xFF, r, g, b }) => return Color::Rgb { r, g, b },
        Some(color) => return color,
        None => {}
    }
    if let Some(index) = theme {
        return Color::Theme { index, tint };
    }
    if let Some(i) = indexed {
        return Color::Indexed(i);
    }
    Color::Auto
}

fn str_to_pattern_type(s: &str) -> Option<PatternType> {
    Some(match s {
        "none" => PatternType::None,
        "solid" => PatternType::Solid,
        "mediumGray" => PatternType::MediumGray,
        "darkGray" => PatternType::DarkGray,
        "lightGray" => PatternType::LightGray,
        "darkHorizontal" => PatternType::DarkHorizontal,
        "darkVertical" => PatternType::DarkVertical,
        "darkDown" => PatternType::DarkDown,
        "darkUp" => PatternType::DarkUp,
        "darkGrid" => PatternType::DarkGrid,
        "darkTrellis" => PatternType::DarkTrellis,
        "lightHorizontal" => PatternType::LightHorizontal,
        "lightVertical" => PatternType::LightVertical,
        "lightDown" => PatternType::LightDown,
        "lightUp" => PatternType::LightUp,
        "lightGrid" => PatternType::LightGrid,
        "lightTrellis" => PatternType::LightTrellis,
        "gray125" => PatternType::Gray125,
        "gray0625" => PatternType::Gray0625,
        _ => return None,
    })
}

fn str_to_border_style(s: &str) -> Option<BorderLineStyle> {
    Some(match s {
        "thin" => BorderLineStyle::Thin,
        "medium" => BorderLineStyle::Medium,
        "thick" => BorderLineStyle::Thick,
        "dashed" => BorderLineStyle::Dashed,
        "dotted" => BorderLineStyle::Dotted,
        "double" => BorderLineStyle::Double,
        "hair" => BorderLineStyle::Hair,
        "mediumDashed" => BorderLineStyle::MediumDashed,
        "dashDot" => BorderLineStyle::DashDot,
        "mediumDashDot" => BorderLineStyle::MediumDashDot,
        "dashDotDot" => BorderLineStyle::DashDotDot,
        "mediumDashDotDot" => BorderLineStyle::MediumDashDotDot,
        "slantDashDot" => BorderLineStyle::SlantDashDot,
        _ => return None,
    })
}

fn str_to_horizontal(s: &str) -> Option<HorizontalAlignment> {
    Some(match s {
        "general" => HorizontalAlignment::General,
        "left" => HorizontalAlignment::Left,
        "center" => HorizontalAlignment::Center,
        "right" => HorizontalAlignment::Right,
        "fill" => HorizontalAlignment::Fill,
        "justify" => HorizontalAlignment::Justify,
        "centerContinuous" => HorizontalAlignment::CenterContinuous,
        "distributed" => HorizontalAlignment::Distributed,
        _ => return None,
    })
}

fn str_to_vertical(s: &str) -> Option<VerticalAlignment> {
    Some(match s {
        "top" => VerticalAlignment::Top,
        "center" => VerticalAlignment::Center,
        "bottom" => VerticalAlignment::Bottom,
        "justify" => VerticalAlignment::Justify,
        "distributed" => VerticalAlignment::Distributed,
        _ => return None,
    })
}

fn str_to_underline(s: Option<&str>) -> Underline {
    match s {
        Some("none") => Underline::None,
        Some("double") => Underline::Double,
        Some("singleAccounting") => Underline::SingleAccounting,
        Some("doubleAccounting") => Underline::DoubleAccounting,
        _ => Underline::Single,
    }
}

fn get_border_edge_mut<'a>(border: &'a mut BorderStyle, edge: &str) -> Option<&'a mut BorderEdge> {
    match edge {
        "left" => border.left.as_mut(),
        "right" => border.right.as_mut(),
        "top" => border.top.as_mut(),
        "bottom" => border.bottom.as_mut(),
        _ => border.diagonal.as_mut(),
    }
}

fn set_border_edge(border: &mut BorderStyle, edge: &str, val: Option<BorderEdge>) {
    match edge {
        "left" => border.left = val,
        "right" => border.right = val,
        "top" => border.top = val,
        "bottom" => border.bottom = val,
        _ => border.diagonal = val,
    }
}
