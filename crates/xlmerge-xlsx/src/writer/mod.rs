//! XLSX writer

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use ahash::AHashSet;
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::XlsxResult;
use crate::escape::encode_escapes;
use crate::styles::XlsxStyleTable;
use xlmerge_core::{CellAddress, CellData, CellValue, ColumnSpan, FreezePanes, Workbook, Worksheet};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write(workbook, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize a workbook into an in-memory package
    pub fn to_bytes(workbook: &Workbook) -> XlsxResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write(workbook, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        let mut zip = ZipWriter::new(writer);

        // One style table for the whole workbook
        let style_table = XlsxStyleTable::build(workbook);

        Self::write_part(&mut zip, "[Content_Types].xml", &content_types_xml(workbook))?;
        Self::write_part(&mut zip, "_rels/.rels", ROOT_RELS)?;
        Self::write_part(&mut zip, "xl/workbook.xml", &workbook_xml(workbook))?;
        Self::write_part(
            &mut zip,
            "xl/_rels/workbook.xml.rels",
            &workbook_rels_xml(workbook),
        )?;
        Self::write_part(&mut zip, "xl/styles.xml", &style_table.to_styles_xml())?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            let xml = worksheet_xml(sheet, i == 0, &style_table);
            Self::write_part(
                &mut zip,
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                &xml,
            )?;
        }

        zip.finish()?;

        log::debug!(
            "wrote {} sheet(s) with {} cell format(s)",
            workbook.sheet_count(),
            style_table.xf_count()
        );
        Ok(())
    }

    fn write_part<W: Write + Seek>(
        zip: &mut ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> XlsxResult<()> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }
}

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

fn content_types_xml(workbook: &Workbook) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    );

    for i in 0..workbook.sheet_count() {
        content.push_str(&format!(
            r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i + 1
        ));
    }

    content.push_str("\n</Types>");
    content
}

fn workbook_xml(workbook: &Workbook) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <bookViews>
        <workbookView activeTab="0"/>
    </bookViews>"#,
    );

    if workbook.is_empty() {
        content.push_str("\n    <sheets/>");
    } else {
        content.push_str("\n    <sheets>");
        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(sheet.name()),
                i + 1,
                i + 1
            ));
        }
        content.push_str("\n    </sheets>");
    }

    content.push_str("\n</workbook>");
    content
}

fn workbook_rels_xml(workbook: &Workbook) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for i in 0..workbook.sheet_count() {
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i + 1,
            i + 1
        ));
    }

    // Styles come after the sheets
    content.push_str(&format!(
        r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        workbook.sheet_count() + 1
    ));

    content.push_str("\n</Relationships>");
    content
}

fn worksheet_xml(sheet: &Worksheet, selected: bool, style_table: &XlsxStyleTable<'_>) -> String {
    let mut content = String::from(XML_DECLARATION);
    content.push_str(
        r#"
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );

    let dimension = sheet
        .used_range()
        .map(|range| range.to_a1_string())
        .unwrap_or_else(|| "A1".to_string());
    content.push_str(&format!("\n    <dimension ref=\"{}\"/>", dimension));

    write_sheet_views(&mut content, sheet.freeze_panes(), selected);
    write_sheet_format(&mut content, sheet);
    write_columns(&mut content, sheet);
    write_sheet_data(&mut content, sheet, style_table);

    let merged_regions = sheet.merged_regions();
    if !merged_regions.is_empty() {
        content.push_str(&format!(
            "\n    <mergeCells count=\"{}\">",
            merged_regions.len()
        ));
        for range in merged_regions {
            content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
        }
        content.push_str("\n    </mergeCells>");
    }

    content.push_str("\n</worksheet>");
    content
}

fn write_sheet_views(content: &mut String, panes: Option<&FreezePanes>, selected: bool) {
    let tab_selected = if selected { r#" tabSelected="1""# } else { "" };
    content.push_str("\n    <sheetViews>");

    match panes {
        None => {
            content.push_str(&format!(
                "\n        <sheetView{} workbookViewId=\"0\"/>",
                tab_selected
            ));
        }
        Some(panes) => {
            let active_pane = match (panes.row > 0, panes.col > 0) {
                (true, true) => "bottomRight",
                (true, false) => "bottomLeft",
                _ => "topRight",
            };

            let mut split = String::new();
            if panes.col > 0 {
                split.push_str(&format!(" xSplit=\"{}\"", panes.col));
            }
            if panes.row > 0 {
                split.push_str(&format!(" ySplit=\"{}\"", panes.row));
            }
            let top_left = panes.top_left_cell().to_a1_string();

            content.push_str(&format!(
                "\n        <sheetView{} workbookViewId=\"0\">",
                tab_selected
            ));
            content.push_str(&format!(
                "\n            <pane{} topLeftCell=\"{}\" activePane=\"{}\" state=\"frozen\"/>",
                split, top_left, active_pane
            ));
            content.push_str(&format!(
                "\n            <selection pane=\"{}\" activeCell=\"{}\" sqref=\"{}\"/>",
                active_pane, top_left, top_left
            ));
            content.push_str("\n        </sheetView>");
        }
    }

    content.push_str("\n    </sheetViews>");
}

fn write_sheet_format(content: &mut String, sheet: &Worksheet) {
    let format = sheet.format();
    let outline_rows = sheet.row_dims().map(|(_, d)| d.outline_level).max().unwrap_or(0);
    let outline_cols = sheet.column_dims().map(|(_, d)| d.outline_level).max().unwrap_or(0);

    content.push_str(&format!(
        "\n    <sheetFormatPr defaultRowHeight=\"{}\" defaultColWidth=\"{}\"",
        format.default_row_height, format.default_column_width
    ));
    if outline_rows > 0 {
        content.push_str(&format!(" outlineLevelRow=\"{}\"", outline_rows));
    }
    if outline_cols > 0 {
        content.push_str(&format!(" outlineLevelCol=\"{}\"", outline_cols));
    }
    content.push_str("/>");
}

fn write_columns(content: &mut String, sheet: &Worksheet) {
    let spans = ColumnSpan::coalesce(sheet.column_dims());
    if spans.is_empty() {
        return;
    }

    content.push_str("\n    <cols>");
    for span in spans {
        content.push_str(&format!(
            "\n        <col min=\"{}\" max=\"{}\"",
            span.min + 1,
            span.max + 1
        ));
        if let Some(width) = span.dim.width {
            content.push_str(&format!(" width=\"{}\" customWidth=\"1\"", width));
        }
        if span.dim.hidden {
            content.push_str(" hidden=\"1\"");
        }
        if span.dim.best_fit {
            content.push_str(" bestFit=\"1\"");
        }
        if span.dim.outline_level > 0 {
            content.push_str(&format!(" outlineLevel=\"{}\"", span.dim.outline_level));
        }
        content.push_str("/>");
    }
    content.push_str("\n    </cols>");
}

fn write_sheet_data(content: &mut String, sheet: &Worksheet, style_table: &XlsxStyleTable<'_>) {
    // Rows with cells or with a record of their own, in order
    let rows: BTreeSet<u32> = sheet
        .cell_rows()
        .chain(sheet.row_dims().map(|(row, _)| row))
        .collect();

    if rows.is_empty() {
        content.push_str("\n    <sheetData/>");
        return;
    }

    // Shared-formula groups that still have their anchor cell
    let shared_anchors: AHashSet<u32> = sheet
        .iter_cells()
        .filter_map(|(_, _, cell)| match &cell.value {
            CellValue::Formula {
                shared: Some(group),
                ..
            } => Some(group.index),
            _ => None,
        })
        .collect();

    content.push_str("\n    <sheetData>");
    for row in rows {
        content.push_str(&format!("\n        <row r=\"{}\"", row + 1));
        if let Some(dim) = sheet.row_dim(row) {
            if let Some(height) = dim.height {
                content.push_str(&format!(" ht=\"{}\" customHeight=\"1\"", height));
            }
            if dim.hidden {
                content.push_str(" hidden=\"1\"");
            }
            if dim.outline_level > 0 {
                content.push_str(&format!(" outlineLevel=\"{}\"", dim.outline_level));
            }
        }

        let mut cells = sheet.row_cells(row).peekable();
        if cells.peek().is_none() {
            content.push_str("/>");
            continue;
        }

        content.push('>');
        for (col, cell) in cells {
            write_cell(
                content,
                CellAddress::new(row, col),
                cell,
                style_table,
                &shared_anchors,
            );
        }
        content.push_str("\n        </row>");
    }
    content.push_str("\n    </sheetData>");
}

fn write_cell(
    content: &mut String,
    addr: CellAddress,
    cell: &CellData,
    style_table: &XlsxStyleTable<'_>,
    shared_anchors: &AHashSet<u32>,
) {
    let xf_id = style_table.xf_id_for(cell.style.as_ref());
    let style_attr = if xf_id != 0 {
        format!(" s=\"{}\"", xf_id)
    } else {
        String::new()
    };
    let cell_ref = addr.to_a1_string();

    match &cell.value {
        CellValue::Empty => {
            // Style-only cells keep their formatting
            if cell.style.is_some() {
                content.push_str(&format!("\n            <c r=\"{}\"{}/>", cell_ref, style_attr));
            }
        }
        CellValue::Formula {
            text,
            cached_value,
            shared,
        } => {
            let formula = escape(text.strip_prefix('=').unwrap_or(text));
            let f = match shared {
                Some(group) => format!(
                    "<f t=\"shared\" ref=\"{}\" si=\"{}\">{}</f>",
                    group.range, group.index, formula
                ),
                None => format!("<f>{}</f>", formula),
            };
            write_formula_cell(content, &cell_ref, &style_attr, &f, cached_value.as_deref());
        }
        CellValue::SharedFormulaRef {
            index,
            cached_value,
        } if shared_anchors.contains(index) => {
            let f = format!("<f t=\"shared\" si=\"{}\"/>", index);
            write_formula_cell(content, &cell_ref, &style_attr, &f, cached_value.as_deref());
        }
        CellValue::SharedFormulaRef { index, cached_value } => {
            log::warn!(
                "cell {} continues shared formula {} whose anchor is gone, writing its cached value",
                cell_ref,
                index
            );
            let orphan = CellData {
                value: cached_value.as_deref().cloned().unwrap_or_default(),
                style: cell.style.clone(),
            };
            write_cell(content, addr, &orphan, style_table, shared_anchors);
        }
        CellValue::String(s) => {
            content.push_str(&format!(
                "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                cell_ref,
                style_attr,
                escape(encode_escapes(s).as_ref())
            ));
        }
        value => {
            let (type_attr, v) = cached_parts(value);
            content.push_str(&format!(
                "\n            <c r=\"{}\"{}{}><v>{}</v></c>",
                cell_ref,
                style_attr,
                type_attr,
                v.unwrap_or_default()
            ));
        }
    }
}

fn write_formula_cell(
    content: &mut String,
    cell_ref: &str,
    style_attr: &str,
    f: &str,
    cached_value: Option<&CellValue>,
) {
    let (type_attr, cached) = match cached_value {
        Some(value) => cached_parts(value),
        None => ("", None),
    };
    content.push_str(&format!(
        "\n            <c r=\"{}\"{}{}>{}",
        cell_ref, style_attr, type_attr, f
    ));
    if let Some(v) = cached {
        content.push_str(&format!("<v>{}</v>", v));
    }
    content.push_str("</c>");
}

/// Type attribute and escaped `<v>` text for a plain value
fn cached_parts(value: &CellValue) -> (&'static str, Option<String>) {
    match value {
        CellValue::Empty | CellValue::Formula { .. } | CellValue::SharedFormulaRef { .. } => {
            ("", None)
        }
        CellValue::Number(n) if n.is_finite() => ("", Some(n.to_string())),
        CellValue::Number(_) => (" t=\"e\"", Some("#NUM!".to_string())),
        CellValue::Boolean(b) => (" t=\"b\"", Some(if *b { "1" } else { "0" }.to_string())),
        CellValue::String(s) => (
            " t=\"str\"",
            Some(escape(encode_escapes(s).as_ref()).into_owned()),
        ),
        CellValue::Error(e) => (" t=\"e\"", Some(escape(e.as_str()).into_owned())),
        CellValue::Date(d) => (" t=\"d\"", Some(escape(d.as_str()).into_owned())),
    }
}
