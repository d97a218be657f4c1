//! Merge error types
//!
//! Per-input problems ([`ReadError`], [`ComposeError`]) are recovered by the
//! orchestrator and reported as [`FailureReason`]s. Only [`MergeError`] ends a
//! merge run.

use thiserror::Error;
use xlmerge_xlsx::XlsxError;

/// A source document could not be turned into a sheet model
#[derive(Debug, Error)]
pub enum ReadError {
    /// Not a spreadsheet container, or a corrupted one
    #[error("unreadable document: {0}")]
    Unreadable(#[from] XlsxError),

    /// The workbook lists no sheets at all
    #[error("document contains no sheets")]
    Empty,
}

/// A sheet model could not be placed into the output document
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The output document already has a sheet with this title
    #[error("sheet title '{0}' is already taken")]
    DuplicateTitle(String),

    /// Two merged ranges of the source sheet overlap
    #[error("merged range {range} overlaps merged range {existing}")]
    OverlappingMerge { range: String, existing: String },

    /// Any other rejection from the sheet model
    #[error(transparent)]
    Model(xlmerge_core::Error),
}

impl From<xlmerge_core::Error> for ComposeError {
    fn from(err: xlmerge_core::Error) -> Self {
        match err {
            xlmerge_core::Error::DuplicateSheetName(title) => ComposeError::DuplicateTitle(title),
            xlmerge_core::Error::MergedCellConflict { range, existing } => {
                ComposeError::OverlappingMerge { range, existing }
            }
            other => ComposeError::Model(other),
        }
    }
}

/// Why a single input was left out of the merged document
#[derive(Debug, Error)]
pub enum FailureReason {
    /// Reading the input failed
    #[error(transparent)]
    Read(#[from] ReadError),

    /// Composing the input's sheet failed
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// A merge run could not produce an output document
#[derive(Debug, Error)]
pub enum MergeError {
    /// The finished document could not be serialized
    #[error("failed to serialize merged document: {0}")]
    Serialize(#[source] XlsxError),
}
