//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur during XLSX reading/writing
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error in {part}: {source}")]
    Xml {
        /// Package part being parsed
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Sheet index past the end of the workbook's sheet list
    #[error("Sheet index {index} out of range ({count} sheets)")]
    SheetNotFound { index: usize, count: usize },

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] xlmerge_core::Error),
}

impl XlsxError {
    /// Wrap an XML error with the name of the part it came from
    pub(crate) fn xml(part: &str, source: quick_xml::Error) -> Self {
        XlsxError::Xml {
            part: part.to_string(),
            source,
        }
    }
}
