//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellRange, CellStorage, CellValue};
use crate::column::ColumnDim;
use crate::error::{Error, Result};
use crate::row::RowDim;
use crate::style::Style;
use crate::{MAX_COLS, MAX_ROWS};

/// Row height a sheet uses when it states none (points)
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Column width a sheet uses when it states none (character units)
pub const DEFAULT_COLUMN_WIDTH: f64 = 8.43;

/// A worksheet (single sheet in a workbook)
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Cell storage
    cells: CellStorage,
    /// Default sizes
    format: SheetFormat,
    /// Column records keyed by 0-based column index
    columns: BTreeMap<u16, ColumnDim>,
    /// Row records keyed by 0-based row index
    rows: BTreeMap<u32, RowDim>,
    /// Merged regions in insertion order
    merged_regions: Vec<CellRange>,
    /// Freeze pane settings
    freeze_panes: Option<FreezePanes>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            format: SheetFormat::default(),
            columns: BTreeMap::new(),
            rows: BTreeMap::new(),
            merged_regions: Vec::new(),
            freeze_panes: None,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row, addr.col))
    }

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get a mutable cell by row and column indices
    pub fn cell_at_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.cells.get_mut(row, col)
    }

    /// Get cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Get a cell's style by address string
    pub fn cell_style(&self, address: &str) -> Result<Option<&Style>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_at(addr.row, addr.col))
    }

    /// Get a cell's style by indices (None = unstyled or absent)
    pub fn cell_style_at(&self, row: u32, col: u16) -> Option<&Style> {
        self.cells.get(row, col).and_then(|c| c.style.as_ref())
    }

    /// Get a cell's style for in-place editing
    ///
    /// The returned style belongs to this one cell only.
    pub fn cell_style_at_mut(&mut self, row: u32, col: u16) -> Option<&mut Style> {
        self.cells.get_mut(row, col).and_then(|c| c.style.as_mut())
    }

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by indices, keeping any style the cell already has
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.entry(row, col).value = value.into();
        Ok(())
    }

    /// Set a cell style by address string
    pub fn set_cell_style(&mut self, address: &str, style: Style) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_style_at(addr.row, addr.col, style)
    }

    /// Give a cell its own style, keeping its value
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: Style) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.entry(row, col).style = Some(style);
        Ok(())
    }

    /// Store a complete cell, replacing whatever was at that position
    pub fn set_cell_at(&mut self, row: u32, col: u16, data: CellData) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.insert(row, col, data);
        Ok(())
    }

    /// Remove a cell entirely
    pub fn clear_cell_at(&mut self, row: u32, col: u16) -> Option<CellData> {
        self.cells.remove(row, col)
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the worksheet holds no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// Iterate mutably over all stored cells in row-major order
    pub fn iter_cells_mut(&mut self) -> impl Iterator<Item = (u32, u16, &mut CellData)> {
        self.cells.iter_mut()
    }

    /// Cells of one row, ascending by column
    pub fn row_cells(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.cells.row(row)
    }

    /// Row indices holding at least one cell, ascending
    pub fn cell_rows(&self) -> impl Iterator<Item = u32> + '_ {
        self.cells.row_indices()
    }

    /// Highest 1-based row number holding a cell (1 for an empty sheet)
    pub fn max_row(&self) -> u32 {
        self.cells.last_row().map_or(1, |r| r + 1)
    }

    /// Highest 1-based column number holding a cell (1 for an empty sheet)
    pub fn max_column(&self) -> u16 {
        self.cells.last_col().map_or(1, |c| c + 1)
    }

    /// Bounding range of all stored cells
    pub fn used_range(&self) -> Option<CellRange> {
        let last_row = self.cells.last_row()?;
        let last_col = self.cells.last_col()?;
        let first_row = self.cells.row_indices().next()?;
        let first_col = self
            .cells
            .iter()
            .map(|(_, c, _)| c)
            .min()
            .unwrap_or(last_col);
        Some(CellRange::from_indices(first_row, first_col, last_row, last_col))
    }

    // === Sheet format ===

    /// Get the default sizes
    pub fn format(&self) -> &SheetFormat {
        &self.format
    }

    /// Replace the default sizes
    pub fn set_format(&mut self, format: SheetFormat) {
        self.format = format;
    }

    /// Default row height in points
    pub fn default_row_height(&self) -> f64 {
        self.format.default_row_height
    }

    /// Default column width in character units
    pub fn default_column_width(&self) -> f64 {
        self.format.default_column_width
    }

    // === Column and row records ===

    /// Get the record for a column
    pub fn column_dim(&self, col: u16) -> Option<&ColumnDim> {
        self.columns.get(&col)
    }

    /// Set the record for a column
    pub fn set_column_dim(&mut self, col: u16, dim: ColumnDim) {
        self.columns.insert(col, dim);
    }

    /// All column records, ascending by column
    pub fn column_dims(&self) -> impl Iterator<Item = (u16, &ColumnDim)> {
        self.columns.iter().map(|(c, d)| (*c, d))
    }

    /// Get the record for a row
    pub fn row_dim(&self, row: u32) -> Option<&RowDim> {
        self.rows.get(&row)
    }

    /// Set the record for a row
    pub fn set_row_dim(&mut self, row: u32, dim: RowDim) {
        self.rows.insert(row, dim);
    }

    /// All row records, ascending by row
    pub fn row_dims(&self) -> impl Iterator<Item = (u32, &RowDim)> {
        self.rows.iter().map(|(r, d)| (*r, d))
    }

    /// Set a custom column width
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.columns.entry(col).or_default().width = Some(width);
    }

    /// Effective column width (record width or sheet default)
    pub fn column_width(&self, col: u16) -> f64 {
        self.columns
            .get(&col)
            .and_then(|d| d.width)
            .unwrap_or(self.format.default_column_width)
    }

    /// Hide or show a column
    pub fn set_column_hidden(&mut self, col: u16, hidden: bool) {
        self.columns.entry(col).or_default().hidden = hidden;
    }

    /// Set a custom row height
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.rows.entry(row).or_default().height = Some(height);
    }

    /// Effective row height (record height or sheet default)
    pub fn row_height(&self, row: u32) -> f64 {
        self.rows
            .get(&row)
            .and_then(|d| d.height)
            .unwrap_or(self.format.default_row_height)
    }

    /// Hide or show a row
    pub fn set_row_hidden(&mut self, row: u32, hidden: bool) {
        self.rows.entry(row).or_default().hidden = hidden;
    }

    // === Merged Cells ===

    /// Get merged regions
    pub fn merged_regions(&self) -> &[CellRange] {
        &self.merged_regions
    }

    /// Merge cells, rejecting a range that overlaps an existing one
    pub fn merge_cells(&mut self, range: &CellRange) -> Result<()> {
        if let Some(existing) = self.merged_regions.iter().find(|r| r.overlaps(range)) {
            return Err(Error::MergedCellConflict {
                range: range.to_string(),
                existing: existing.to_string(),
            });
        }
        self.merged_regions.push(*range);
        Ok(())
    }

    /// Record a merged region exactly as a file lists it, without the
    /// overlap check. Files written by other tools may contain overlaps.
    pub fn push_merged_region(&mut self, range: CellRange) {
        self.merged_regions.push(range);
    }

    /// The merged region covering (row, col), if any
    pub fn merged_region_at(&self, row: u32, col: u16) -> Option<&CellRange> {
        self.merged_regions.iter().find(|r| r.contains(row, col))
    }

    // === Freeze Panes ===

    /// Get freeze pane settings
    pub fn freeze_panes(&self) -> Option<&FreezePanes> {
        self.freeze_panes.as_ref()
    }

    /// Freeze the first `row` rows and `col` columns (0, 0 unfreezes)
    pub fn set_freeze_panes(&mut self, row: u32, col: u16) {
        self.freeze_panes = FreezePanes::new(row, col);
    }

    /// Replace the freeze pane settings verbatim
    pub fn set_freeze_panes_opt(&mut self, panes: Option<FreezePanes>) {
        self.freeze_panes = panes;
    }

    /// Validate cell position
    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(())
    }
}

/// Default sizes of a sheet (the `sheetFormatPr` element)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetFormat {
    /// Height of rows without a record, in points
    pub default_row_height: f64,
    /// Width of columns without a record, in character units
    pub default_column_width: f64,
}

impl Default for SheetFormat {
    fn default() -> Self {
        Self {
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// Freeze pane anchor
///
/// `row` and `col` count the frozen rows and columns, which is also the
/// 0-based position of the top-left scrollable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezePanes {
    /// Number of frozen rows
    pub row: u32,
    /// Number of frozen columns
    pub col: u16,
}

impl FreezePanes {
    /// Create an anchor; (0, 0) freezes nothing and yields None
    pub fn new(row: u32, col: u16) -> Option<Self> {
        if row == 0 && col == 0 {
            None
        } else {
            Some(Self { row, col })
        }
    }

    /// Anchor from the top-left scrollable cell (e.g. "B2" freezes row 1 and column A)
    pub fn from_top_left(addr: CellAddress) -> Option<Self> {
        Self::new(addr.row, addr.col)
    }

    /// The top-left scrollable cell
    pub fn top_left_cell(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}
