//! # xlmerge-xlsx
//!
//! XLSX (Office Open XML) reader and writer for xlmerge.
//!
//! The reader resolves parts through the package relationships and keeps
//! every cell's fully resolved style. The writer rebuilds a compact,
//! deduplicated style table from the styles the cells own.

pub mod error;
pub mod reader;
pub mod writer;

mod escape;
mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::{ReadOptions, XlsxPackage, XlsxReader};
pub use writer::XlsxWriter;
