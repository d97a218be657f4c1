//! Common utilities for E2E tests.
//!
//! Fixtures are assembled part by part, shaped the way spreadsheet
//! applications write them (shared strings, indexed styles, relationships),
//! then saved to a temp file and read back through the public API.

use std::io::{Cursor, Write};

use tempfile::NamedTempFile;
use xlmerge_core::Workbook;
use xlmerge_xlsx::XlsxReader;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
</Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

/// Builder for a styles part: slot 0 of every list is the default record
pub struct StylesBuilder {
    num_fmts: Vec<String>,
    fonts: Vec<String>,
    fills: Vec<String>,
    borders: Vec<String>,
    xfs: Vec<String>,
}

impl StylesBuilder {
    pub fn new() -> Self {
        Self {
            num_fmts: Vec::new(),
            fonts: vec![r#"<font><sz val="11"/><name val="Calibri"/></font>"#.to_string()],
            fills: vec![
                r#"<fill><patternFill patternType="none"/></fill>"#.to_string(),
                r#"<fill><patternFill patternType="gray125"/></fill>"#.to_string(),
            ],
            borders: vec!["<border><left/><right/><top/><bottom/><diagonal/></border>".to_string()],
            xfs: vec![r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#.to_string()],
        }
    }

    pub fn num_fmt(&mut self, id: u32, code: &str) -> u32 {
        self.num_fmts
            .push(format!(r#"<numFmt numFmtId="{}" formatCode="{}"/>"#, id, code));
        id
    }

    pub fn font(&mut self, xml: &str) -> usize {
        self.fonts.push(xml.to_string());
        self.fonts.len() - 1
    }

    pub fn fill(&mut self, xml: &str) -> usize {
        self.fills.push(xml.to_string());
        self.fills.len() - 1
    }

    pub fn border(&mut self, xml: &str) -> usize {
        self.borders.push(xml.to_string());
        self.borders.len() - 1
    }

    /// Add a cell format; `children` holds optional alignment/protection
    pub fn xf(&mut self, num_fmt: u32, font: usize, fill: usize, border: usize, children: &str) -> usize {
        self.xfs.push(format!(
            r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="0" applyFont="1" applyFill="1" applyBorder="1">{}</xf>"#,
            num_fmt, font, fill, border, children
        ));
        self.xfs.len() - 1
    }

    pub fn build(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="{}">{}</numFmts>
<fonts count="{}">{}</fonts>
<fills count="{}">{}</fills>
<borders count="{}">{}</borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="{}">{}</cellXfs>
<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
<dxfs count="1"><dxf><font><b/></font></dxf></dxfs>
</styleSheet>"#,
            self.num_fmts.len(),
            self.num_fmts.concat(),
            self.fonts.len(),
            self.fonts.concat(),
            self.fills.len(),
            self.fills.concat(),
            self.borders.len(),
            self.borders.concat(),
            self.xfs.len(),
            self.xfs.concat()
        )
    }
}

/// An XLSX package assembled from raw parts
pub struct Fixture {
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    styles: Option<String>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            shared_strings: Vec::new(),
            styles: None,
        }
    }

    /// Add a sheet; `body` is everything inside `<worksheet>`
    pub fn sheet(mut self, name: &str, body: &str) -> Self {
        self.sheets.push((name.to_string(), body.to_string()));
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn styles(mut self, styles: &StylesBuilder) -> Self {
        self.styles = Some(styles.build());
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut parts: Vec<(String, String)> = vec![
            ("[Content_Types].xml".into(), CONTENT_TYPES.into()),
            ("_rels/.rels".into(), ROOT_RELS.into()),
        ];

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for (i, (name, body)) in self.sheets.iter().enumerate() {
            // Ids deliberately differ from positions, as in files that were edited
            let r_id = format!("rId{}", i + 10);
            workbook.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="{}"/>"#,
                name,
                i + 1,
                r_id
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                r_id,
                i + 1
            ));
            parts.push((
                format!("xl/worksheets/sheet{}.xml", i + 1),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">{}</worksheet>"#,
                    body
                ),
            ));
        }
        workbook.push_str("</sheets></workbook>");

        if !self.shared_strings.is_empty() {
            rels.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#);
            let items: String = self
                .shared_strings
                .iter()
                .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, s))
                .collect();
            parts.push((
                "xl/sharedStrings.xml".into(),
                format!(
                    r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
                    self.shared_strings.len(),
                    items
                ),
            ));
        }

        if let Some(styles) = &self.styles {
            rels.push_str(r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
            parts.push(("xl/styles.xml".into(), styles.clone()));
        }
        rels.push_str("</Relationships>");

        parts.push(("xl/workbook.xml".into(), workbook));
        parts.push(("xl/_rels/workbook.xml.rels".into(), rels));

        let mut buf = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buf));
            let options = zip::write::SimpleFileOptions::default();
            for (name, content) in &parts {
                zip.start_file(name.as_str(), options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    /// Save the package to a temp file that lives as long as the handle
    pub fn save(&self) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .expect("create temp file");
        file.write_all(&self.to_bytes()).expect("write fixture");
        file.flush().expect("flush fixture");
        file
    }

    /// Save and read back every sheet
    pub fn read(&self) -> Workbook {
        let file = self.save();
        XlsxReader::read_file(file.path()).expect("fixture should read")
    }
}

/// A single-sheet fixture holding `rows` inside `<sheetData>`
pub fn sheet_with_rows(rows: &str) -> Fixture {
    Fixture::new().sheet("Sheet1", &format!("<sheetData>{}</sheetData>", rows))
}
