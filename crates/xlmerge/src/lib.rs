//! # xlmerge
//!
//! Merge many spreadsheet documents into one, one sheet per input, keeping
//! the look of every sheet intact.
//!
//! For each input the first sheet is read and rebuilt in the output document:
//! values, every cell's full style, column widths and row heights, hidden and
//! outline state, merged ranges and the frozen pane.
//!
//! ## Features
//!
//! - Per-cell style copies: no output cell shares a style with another
//! - Sheet titles derived from input names, sanitized and made unique
//! - Bad inputs are reported and skipped; the rest are still merged
//! - Optional parallel parsing (`parallel` feature, on by default)
//!
//! ## Example
//!
//! ```rust
//! use xlmerge::{merge, MergeInput, Workbook, Worksheet, XlsxWriter};
//!
//! let mut sheet = Worksheet::new("Sheet1");
//! sheet.set_cell_value("A1", "Hello").unwrap();
//! let mut workbook = Workbook::empty();
//! workbook.add_existing_worksheet(sheet).unwrap();
//! let bytes = XlsxWriter::to_bytes(&workbook).unwrap();
//!
//! let output = merge(&[
//!     MergeInput::new("north.xlsx", bytes.clone()),
//!     MergeInput::new("south.xlsx", bytes),
//! ])
//! .unwrap();
//!
//! assert_eq!(output.sheet_titles, vec!["north", "south"]);
//! assert!(output.failures.is_empty());
//! ```

pub mod composer;
pub mod copier;
pub mod error;
pub mod options;
pub mod orchestrator;
pub mod reader;
pub mod sanitize;

pub use composer::compose;
pub use copier::copy_style;
pub use error::{ComposeError, FailureReason, MergeError, ReadError};
pub use options::MergeOptions;
pub use orchestrator::{merge, merge_documents, InputFailure, MergeInput, MergeOutput, Merger};
pub use reader::SourceDocument;
pub use sanitize::{sanitize, strip_extension, SheetTitles};

// Re-export the model and the file format crate
pub use xlmerge_core::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, CellAddress, CellData, CellRange,
    CellValue, Color, ColumnDim, FillStyle, FontStyle, FreezePanes, HorizontalAlignment,
    NumberFormat, Protection, RowDim, SharedFormula, SheetFormat, Style, VerticalAlignment,
    Workbook, Worksheet, MAX_SHEET_NAME_LEN,
};
pub use xlmerge_xlsx::{ReadOptions, XlsxError, XlsxReader, XlsxWriter};
