//! XLSX reader
//!
//! [`XlsxReader::open`] parses only the package skeleton (relationships and
//! the workbook's sheet list). Worksheets are parsed one at a time through
//! [`XlsxPackage::read_worksheet`], so sheets nobody asks for are never
//! materialized. Shared strings and styles are loaded on the first sheet read.

mod shared_strings;
mod worksheet;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{attr_value, read_styles_xml};
use xlmerge_core::{Style, Workbook, Worksheet};

const REL_OFFICE_DOCUMENT: &str = "/officeDocument";
const REL_WORKSHEET: &str = "/worksheet";
const REL_SHARED_STRINGS: &str = "/sharedStrings";
const REL_STYLES: &str = "/styles";

/// Options controlling how cell contents are read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Read formula cells as their cached result instead of the formula
    pub data_only: bool,
}

impl ReadOptions {
    /// Create default options (formulas are kept)
    pub fn new() -> Self {
        Self::default()
    }

    /// Read cached results instead of formulas
    pub fn with_data_only(mut self, data_only: bool) -> Self {
        self.data_only = data_only;
        self
    }
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read every worksheet of a file into a workbook
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read every worksheet into a workbook
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        Self::read_with_options(reader, &ReadOptions::default())
    }

    /// Read every worksheet into a workbook with explicit options
    pub fn read_with_options<R: Read + Seek>(
        reader: R,
        options: &ReadOptions,
    ) -> XlsxResult<Workbook> {
        let mut package = Self::open(reader)?;
        let mut workbook = Workbook::empty();
        for index in 0..package.sheet_count() {
            let sheet = package.read_worksheet(index, options)?;
            workbook.add_existing_worksheet(sheet)?;
        }
        Ok(workbook)
    }

    /// Open a package without parsing any worksheet
    pub fn open<R: Read + Seek>(reader: R) -> XlsxResult<XlsxPackage<R>> {
        XlsxPackage::open(reader)
    }
}

/// One entry of the workbook's sheet list
#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    /// Resolved part path, None when the relationship is missing
    part: Option<String>,
    /// Relationship type suffix (worksheet, chartsheet, ...)
    kind: String,
}

/// An opened XLSX package
pub struct XlsxPackage<R> {
    archive: ZipArchive<R>,
    sheets: Vec<SheetEntry>,
    shared_strings_part: Option<String>,
    styles_part: Option<String>,
    shared_strings: Option<Vec<String>>,
    styles: Option<Vec<Style>>,
}

impl<R: Read + Seek> XlsxPackage<R> {
    fn open(reader: R) -> XlsxResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let workbook_part = read_relationships(&mut archive, "")?
            .into_iter()
            .find(|rel| rel.rel_type.ends_with(REL_OFFICE_DOCUMENT))
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| "xl/workbook.xml".to_string());

        let declared = read_sheet_list(&mut archive, &workbook_part)?;
        let rels = read_relationships(&mut archive, &workbook_part)?;

        let find_part = |suffix: &str| {
            rels.iter()
                .find(|rel| rel.rel_type.ends_with(suffix))
                .map(|rel| resolve_target(&workbook_part, &rel.target))
        };
        let shared_strings_part = find_part(REL_SHARED_STRINGS);
        let styles_part = find_part(REL_STYLES);

        let sheets = declared
            .into_iter()
            .map(|(name, r_id)| {
                let rel = rels.iter().find(|rel| rel.id == r_id);
                SheetEntry {
                    name,
                    part: rel.map(|rel| resolve_target(&workbook_part, &rel.target)),
                    kind: rel
                        .and_then(|rel| rel.rel_type.rsplit('/').next())
                        .unwrap_or_default()
                        .to_string(),
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "opened package: workbook part {}, {} sheet(s)",
            workbook_part,
            sheets.len()
        );

        Ok(Self {
            archive,
            sheets,
            shared_strings_part,
            styles_part,
            shared_strings: None,
            styles: None,
        })
    }

    /// Number of sheets the workbook lists
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Parse one worksheet
    pub fn read_worksheet(&mut self, index: usize, options: &ReadOptions) -> XlsxResult<Worksheet> {
        let entry = self
            .sheets
            .get(index)
            .cloned()
            .ok_or(XlsxError::SheetNotFound {
                index,
                count: self.sheets.len(),
            })?;

        let part = entry.part.ok_or_else(|| {
            XlsxError::MissingPart(format!("relationship for sheet '{}'", entry.name))
        })?;
        if entry.kind != REL_WORKSHEET.trim_start_matches('/') {
            return Err(XlsxError::InvalidFormat(format!(
                "sheet '{}' is a {}, not a worksheet",
                entry.name, entry.kind
            )));
        }

        self.load_shared_parts()?;
        let data = read_part(&mut self.archive, &part)?;
        let shared_strings = self.shared_strings.as_deref().unwrap_or_default();
        let styles = self.styles.as_deref().unwrap_or_default();

        worksheet::read_worksheet(&data, &part, &entry.name, shared_strings, styles, options)
    }

    fn load_shared_parts(&mut self) -> XlsxResult<()> {
        if self.shared_strings.is_none() {
            let strings = match self.shared_strings_part.clone() {
                Some(part) => {
                    let data = read_part(&mut self.archive, &part)?;
                    shared_strings::read_shared_strings(&data, &part)?
                }
                None => Vec::new(),
            };
            self.shared_strings = Some(strings);
        }

        if self.styles.is_none() {
            let styles = match self.styles_part.clone() {
                Some(part) => {
                    let data = read_part(&mut self.archive, &part)?;
                    read_styles_xml(data.as_slice(), &part)?
                }
                None => Vec::new(),
            };
            self.styles = Some(styles);
        }

        Ok(())
    }
}

/// A package relationship
#[derive(Debug, Clone)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// Read a whole part into memory
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, part: &str) -> XlsxResult<Vec<u8>> {
    let mut file = match archive.by_name(part) {
        Ok(f) => f,
        Err(ZipError::FileNotFound) => return Err(XlsxError::MissingPart(part.to_string())),
        Err(e) => return Err(e.into()),
    };
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    Ok(data)
}

/// Relationships of a part ("" = the package itself); a missing rels part
/// means no relationships
fn read_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    source_part: &str,
) -> XlsxResult<Vec<Relationship>> {
    let rels_part = rels_path(source_part);
    let data = match read_part(archive, &rels_part) {
        Ok(data) => data,
        Err(XlsxError::MissingPart(_)) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut xml_reader = Reader::from_reader(data.as_slice());
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match xml_reader
            .read_event_into(&mut buf)
            .map_err(|e| XlsxError::xml(&rels_part, e))?
        {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                let external = attr_value(&e, b"TargetMode").as_deref() == Some("External");
                let id = attr_value(&e, b"Id");
                let rel_type = attr_value(&e, b"Type");
                let target = attr_value(&e, b"Target");
                if let (false, Some(id), Some(rel_type), Some(target)) =
                    (external, id, rel_type, target)
                {
                    rels.push(Relationship {
                        id,
                        rel_type,
                        target,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Read the workbook part's sheet list as (name, relationship id) pairs
fn read_sheet_list<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    workbook_part: &str,
) -> XlsxResult<Vec<(String, String)>> {
    let data = read_part(archive, workbook_part)?;

    let mut xml_reader = Reader::from_reader(data.as_slice());
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match xml_reader
            .read_event_into(&mut buf)
            .map_err(|e| XlsxError::xml(workbook_part, e))?
        {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut r_id = None;

                for attr in e.attributes().flatten() {
                    let key = attr.key;
                    if key.as_ref() == b"name" {
                        name = attr.unescape_value().ok().map(|s| s.to_string());
                    } else if key.local_name().as_ref() == b"id" && key.prefix().is_some() {
                        r_id = attr.unescape_value().ok().map(|s| s.to_string());
                    }
                }

                match (name, r_id) {
                    (Some(name), Some(r_id)) => sheets.push((name, r_id)),
                    (name, _) => log::warn!(
                        "{}: ignoring sheet entry without name or relationship ({:?})",
                        workbook_part,
                        name
                    ),
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Location of the relationships part for a part ("" = package root)
fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None if part.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that declares it
///
/// Absolute targets start at the package root; relative ones are taken from
/// the source part's folder, with `.` and `..` segments folded.
fn resolve_target(source_part: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => match source_part.rsplit_once('/') {
            Some((dir, _)) => format!("{}/{}", dir, target),
            None => target.to_string(),
        },
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
