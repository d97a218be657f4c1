//! # xlmerge-core
//!
//! Sheet model for the xlmerge spreadsheet merge engine.
//!
//! This crate provides the types every other xlmerge crate speaks:
//! - [`CellValue`] - Opaque cell values (numbers, strings, booleans, errors, dates, formulas)
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and merged ranges
//! - [`Style`] - Cell formatting (fonts, fills, borders, alignment, protection, number formats)
//! - [`ColumnDim`] and [`RowDim`] - Sizing, visibility and outline records
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! Every cell owns its own [`Style`]. Nothing in the model shares a style
//! between cells, so editing one cell's formatting can never leak into another.
//!
//! ## Example
//!
//! ```rust
//! use xlmerge_core::{CellValue, Style, Workbook, Worksheet};
//!
//! let mut sheet = Worksheet::new("Report");
//! sheet.set_cell_value("A1", "Total").unwrap();
//! sheet.set_cell_value_at(0, 1, CellValue::Number(42.0)).unwrap();
//! sheet.set_cell_style("A1", Style::new().bold(true)).unwrap();
//!
//! let mut workbook = Workbook::empty();
//! workbook.add_existing_worksheet(sheet).unwrap();
//! assert_eq!(workbook.sheet_count(), 1);
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod row;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellRange, CellValue, SharedFormula};
pub use column::{ColumnDim, ColumnSpan};
pub use row::RowDim;
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::{FreezePanes, SheetFormat, Worksheet};

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, Protection, Style, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Characters that may never appear in a sheet name
pub const INVALID_SHEET_NAME_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// Sheet name Excel keeps for itself (compared ignoring case)
pub const RESERVED_SHEET_NAME: &str = "History";
