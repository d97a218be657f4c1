//! Worksheet part parsing

use ahash::AHashSet;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::ReadOptions;
use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_escapes;
use crate::styles::{attr_flag, attr_value, is_true};
use xlmerge_core::{
    CellAddress, CellData, CellRange, CellValue, ColumnDim, FreezePanes, RowDim, SheetFormat,
    SharedFormula, Style, Worksheet, MAX_COLS,
};

/// Where text events currently go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Value,
    Formula,
    InlineText,
}

/// A `<c>` element while its children are being read
#[derive(Debug, Default)]
struct PendingCell {
    row: u32,
    col: u16,
    kind: Option<String>,
    style: Option<usize>,
    value: Option<String>,
    formula: Option<String>,
    /// `si` and `ref` of an `<f t="shared">`
    shared_index: Option<u32>,
    shared_ref: Option<String>,
    inline: Option<String>,
}

impl PendingCell {
    fn buffer(&mut self, capture: Capture) -> Option<&mut String> {
        match capture {
            Capture::None => None,
            Capture::Value => Some(self.value.get_or_insert_with(String::new)),
            Capture::Formula => Some(self.formula.get_or_insert_with(String::new)),
            Capture::InlineText => Some(self.inline.get_or_insert_with(String::new)),
        }
    }
}

/// Everything a cell needs from outside its own part
struct CellContext<'a> {
    part: &'a str,
    shared_strings: &'a [String],
    styles: &'a [Style],
    options: &'a ReadOptions,
}

/// Parse one worksheet part
pub(super) fn read_worksheet(
    data: &[u8],
    part: &str,
    name: &str,
    shared_strings: &[String],
    styles: &[Style],
    options: &ReadOptions,
) -> XlsxResult<Worksheet> {
    let ctx = CellContext {
        part,
        shared_strings,
        styles,
        options,
    };

    let mut xml_reader = Reader::from_reader(data);
    xml_reader.trim_text(false);

    let mut worksheet = Worksheet::new(name);
    let mut buf = Vec::new();

    let mut next_row: u32 = 0;
    let mut next_col: u16 = 0;
    let mut cell: Option<PendingCell> = None;
    let mut capture = Capture::None;
    let mut in_inline = false;
    let mut in_phonetic = false;
    // Shared-formula groups whose anchor has been read
    let mut shared_anchors: AHashSet<u32> = AHashSet::new();

    loop {
        let event = xml_reader
            .read_event_into(&mut buf)
            .map_err(|e| XlsxError::xml(part, e))?;
        let is_empty = matches!(event, Event::Empty(_));

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"sheetFormatPr" => {
                    let mut format = SheetFormat::default();
                    if let Some(h) = attr_f64(e, b"defaultRowHeight") {
                        format.default_row_height = h;
                    }
                    if let Some(w) = attr_f64(e, b"defaultColWidth") {
                        format.default_column_width = w;
                    }
                    worksheet.set_format(format);
                }
                b"pane" => {
                    if let Some(panes) = read_frozen_pane(e) {
                        worksheet.set_freeze_panes_opt(Some(panes));
                    }
                }
                b"col" => read_column(e, &mut worksheet, part),
                b"row" => {
                    let row = attr_value(e, b"r")
                        .and_then(|r| r.parse::<u32>().ok())
                        .and_then(|r| r.checked_sub(1))
                        .unwrap_or(next_row);
                    next_row = row + 1;
                    next_col = 0;

                    let dim = read_row_dim(e);
                    if dim.has_custom_settings() {
                        worksheet.set_row_dim(row, dim);
                    }
                }
                b"c" => {
                    let (row, col) = match attr_value(e, b"r") {
                        Some(r) => {
                            let addr = CellAddress::parse(&r).map_err(|_| {
                                XlsxError::Parse(format!("{}: bad cell reference '{}'", part, r))
                            })?;
                            (addr.row, addr.col)
                        }
                        None => (next_row.saturating_sub(1), next_col),
                    };
                    next_col = col.saturating_add(1);

                    let pending = PendingCell {
                        row,
                        col,
                        kind: attr_value(e, b"t"),
                        style: attr_value(e, b"s").and_then(|s| s.parse().ok()),
                        ..Default::default()
                    };
                    if is_empty {
                        finish_cell(&mut worksheet, pending, &ctx, &mut shared_anchors)?;
                    } else {
                        cell = Some(pending);
                    }
                }
                b"v" if cell.is_some() => {
                    if let Some(c) = cell.as_mut() {
                        c.value.get_or_insert_with(String::new);
                    }
                    if !is_empty {
                        capture = Capture::Value;
                    }
                }
                b"f" if cell.is_some() => {
                    if let Some(c) = cell.as_mut() {
                        c.formula.get_or_insert_with(String::new);
                        if attr_value(e, b"t").as_deref() == Some("shared") {
                            c.shared_index = attr_value(e, b"si").and_then(|si| si.parse().ok());
                            c.shared_ref = attr_value(e, b"ref");
                        }
                    }
                    if !is_empty {
                        capture = Capture::Formula;
                    }
                }
                b"is" if !is_empty => {
                    in_inline = true;
                    if let Some(c) = cell.as_mut() {
                        c.inline.get_or_insert_with(String::new);
                    }
                }
                b"rPh" if !is_empty => in_phonetic = true,
                b"t" if in_inline && !in_phonetic && !is_empty => capture = Capture::InlineText,
                b"mergeCell" => {
                    if let Some(reference) = attr_value(e, b"ref") {
                        match CellRange::parse(&reference) {
                            Ok(range) => worksheet.push_merged_region(range),
                            Err(_) => log::warn!(
                                "{}: ignoring malformed merged range '{}'",
                                part,
                                reference
                            ),
                        }
                    }
                }
                _ => {}
            },
            Event::Text(ref e) if capture != Capture::None => {
                let text = e.unescape().map_err(|e| XlsxError::xml(part, e))?;
                if let Some(target) = cell.as_mut().and_then(|c| c.buffer(capture)) {
                    target.push_str(&text);
                }
            }
            Event::CData(e) if capture != Capture::None => {
                let bytes = e.into_inner();
                if let Some(target) = cell.as_mut().and_then(|c| c.buffer(capture)) {
                    target.push_str(&String::from_utf8_lossy(&bytes));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"f" | b"t" => capture = Capture::None,
                b"rPh" => in_phonetic = false,
                b"is" => in_inline = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        finish_cell(&mut worksheet, pending, &ctx, &mut shared_anchors)?;
                    }
                    capture = Capture::None;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!(
        "{}: sheet '{}' with {} cells, {} merged ranges",
        part,
        name,
        worksheet.cell_count(),
        worksheet.merged_regions().len()
    );

    Ok(worksheet)
}

fn attr_f64(e: &BytesStart<'_>, name: &[u8]) -> Option<f64> {
    attr_value(e, name).and_then(|v| v.parse().ok())
}

fn attr_u8(e: &BytesStart<'_>, name: &[u8]) -> Option<u8> {
    attr_value(e, name).and_then(|v| v.parse().ok())
}

/// A `<pane>` describes frozen panes only when its state says so
fn read_frozen_pane(e: &BytesStart<'_>) -> Option<FreezePanes> {
    let state = attr_value(e, b"state")?;
    if state != "frozen" && state != "frozenSplit" {
        return None;
    }

    // Split counts are exact; topLeftCell may be scrolled past the split
    let rows = attr_f64(e, b"ySplit").unwrap_or(0.0).max(0.0) as u32;
    let cols = attr_f64(e, b"xSplit").unwrap_or(0.0).max(0.0) as u16;
    if rows > 0 || cols > 0 {
        return FreezePanes::new(rows, cols);
    }

    attr_value(e, b"topLeftCell")
        .and_then(|r| CellAddress::parse(&r).ok())
        .and_then(FreezePanes::from_top_left)
}

fn read_column(e: &BytesStart<'_>, worksheet: &mut Worksheet, part: &str) {
    let min = attr_value(e, b"min").and_then(|v| v.parse::<u16>().ok());
    let max = attr_value(e, b"max").and_then(|v| v.parse::<u16>().ok());
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) if min >= 1 && min <= max => (min, max.min(MAX_COLS)),
        _ => {
            log::warn!("{}: ignoring column record without a valid span", part);
            return;
        }
    };

    let mut dim = ColumnDim::new();
    dim.width = attr_f64(e, b"width");
    dim.hidden = attr_flag(e, b"hidden");
    dim.outline_level = attr_u8(e, b"outlineLevel").unwrap_or(0);
    dim.best_fit = attr_flag(e, b"bestFit");

    if !dim.has_custom_settings() {
        return;
    }
    for col in min..=max {
        worksheet.set_column_dim(col - 1, dim.clone());
    }
}

fn read_row_dim(e: &BytesStart<'_>) -> RowDim {
    let mut dim = RowDim::new();
    dim.height = attr_f64(e, b"ht");
    dim.hidden = attr_flag(e, b"hidden");
    dim.outline_level = attr_u8(e, b"outlineLevel").unwrap_or(0);
    dim
}

fn finish_cell(
    worksheet: &mut Worksheet,
    cell: PendingCell,
    ctx: &CellContext<'_>,
    shared_anchors: &mut AHashSet<u32>,
) -> XlsxResult<()> {
    let style = match cell.style {
        None | Some(0) => None,
        Some(index) => match ctx.styles.get(index) {
            Some(style) => Some(style.clone()),
            None => {
                log::warn!(
                    "{}: cell {} refers to missing style {}",
                    ctx.part,
                    CellAddress::new(cell.row, cell.col).to_a1_string(),
                    index
                );
                None
            }
        },
    };

    let value = cell_value(&cell, ctx, shared_anchors)?;
    if value.is_empty() && style.is_none() {
        return Ok(());
    }

    worksheet.set_cell_at(cell.row, cell.col, CellData { value, style })?;
    Ok(())
}

fn cell_value(
    cell: &PendingCell,
    ctx: &CellContext<'_>,
    shared_anchors: &mut AHashSet<u32>,
) -> XlsxResult<CellValue> {
    let kind = cell.kind.as_deref();

    let cached = match kind {
        Some("inlineStr") => cell
            .inline
            .as_deref()
            .map(|text| CellValue::String(decode_escapes(text).into_owned())),
        _ => cell
            .value
            .as_deref()
            .map(|raw| typed_value(kind, raw, cell, ctx))
            .transpose()?,
    };

    let formula = match &cell.formula {
        Some(text) if !ctx.options.data_only => text,
        _ => return Ok(cached.unwrap_or_default()),
    };

    if let Some(index) = cell.shared_index {
        if !formula.is_empty() {
            match cell.shared_ref.as_deref().map(CellRange::parse) {
                Some(Ok(range)) => {
                    shared_anchors.insert(index);
                    let group = SharedFormula { index, range };
                    return Ok(CellValue::shared_formula(formula.as_str(), cached, group));
                }
                _ => log::warn!(
                    "{}: shared formula {} at {} has no valid range, keeping it unshared",
                    ctx.part,
                    index,
                    CellAddress::new(cell.row, cell.col).to_a1_string()
                ),
            }
        } else if shared_anchors.contains(&index) {
            return Ok(CellValue::shared_formula_ref(index, cached));
        }
    }

    if formula.is_empty() {
        log::warn!(
            "{}: cell {} continues an unknown shared formula, keeping its cached value",
            ctx.part,
            CellAddress::new(cell.row, cell.col).to_a1_string()
        );
        return Ok(cached.unwrap_or_default());
    }

    Ok(CellValue::formula_with_cached(formula.as_str(), cached))
}

fn typed_value(
    kind: Option<&str>,
    raw: &str,
    cell: &PendingCell,
    ctx: &CellContext<'_>,
) -> XlsxResult<CellValue> {
    let value = match kind {
        Some("s") => {
            let index: usize = raw.trim().parse().map_err(|_| {
                XlsxError::Parse(format!("{}: bad shared string index '{}'", ctx.part, raw))
            })?;
            let text = ctx.shared_strings.get(index).ok_or_else(|| {
                XlsxError::Parse(format!(
                    "{}: shared string {} out of range ({} strings)",
                    ctx.part,
                    index,
                    ctx.shared_strings.len()
                ))
            })?;
            CellValue::String(text.clone())
        }
        Some("b") => CellValue::Boolean(is_true(raw.trim())),
        Some("e") => CellValue::Error(raw.to_string()),
        Some("str") | Some("inlineStr") => CellValue::String(decode_escapes(raw).into_owned()),
        Some("d") => CellValue::Date(raw.to_string()),
        None | Some("n") => match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) if raw.trim().is_empty() => CellValue::Empty,
            Err(_) => {
                log::warn!(
                    "{}: cell {} holds non-numeric '{}', keeping it as text",
                    ctx.part,
                    CellAddress::new(cell.row, cell.col).to_a1_string(),
                    raw
                );
                CellValue::String(raw.to_string())
            }
        },
        Some(other) => {
            log::warn!(
                "{}: cell {} has unknown type '{}', keeping it as text",
                ctx.part,
                CellAddress::new(cell.row, cell.col).to_a1_string(),
                other
            );
            CellValue::String(raw.to_string())
        }
    };
    Ok(value)
}
