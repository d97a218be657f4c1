//! Source document access
//!
//! A [`SourceDocument`] borrows the raw bytes of one input and exposes only
//! what a merge needs from it: the first sheet, fully parsed.

use std::io::Cursor;

use xlmerge_core::Worksheet;
use xlmerge_xlsx::{ReadOptions, XlsxPackage, XlsxReader};

use crate::error::ReadError;

/// An opened, not yet materialized, spreadsheet document
pub struct SourceDocument<'a> {
    package: XlsxPackage<Cursor<&'a [u8]>>,
    options: ReadOptions,
}

impl<'a> SourceDocument<'a> {
    /// Open a document with default read options (formulas kept)
    pub fn open(bytes: &'a [u8]) -> Result<Self, ReadError> {
        Self::open_with_options(bytes, ReadOptions::default())
    }

    /// Open a document with explicit read options
    pub fn open_with_options(bytes: &'a [u8], options: ReadOptions) -> Result<Self, ReadError> {
        let package = XlsxReader::open(Cursor::new(bytes))?;
        Ok(Self { package, options })
    }

    /// Number of sheets the document lists
    pub fn sheet_count(&self) -> usize {
        self.package.sheet_count()
    }

    /// Titles of the listed sheets, in document order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.package.sheet_names()
    }

    /// Parse the first listed sheet
    ///
    /// Only this sheet's part is read; the document's other sheets are never
    /// parsed.
    pub fn first_sheet(&mut self) -> Result<Worksheet, ReadError> {
        if self.package.sheet_count() == 0 {
            return Err(ReadError::Empty);
        }
        let sheet = self.package.read_worksheet(0, &self.options)?;
        log::debug!(
            "parsed first sheet '{}' ({} cells)",
            sheet.name(),
            sheet.cell_count()
        );
        Ok(sheet)
    }

    /// Open `bytes` and take its first sheet, dropping the document afterwards
    pub fn read_first_sheet(bytes: &'a [u8], options: ReadOptions) -> Result<Worksheet, ReadError> {
        Self::open_with_options(bytes, options)?.first_sheet()
    }
}
