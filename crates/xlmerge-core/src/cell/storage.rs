//! Sparse cell storage
//!
//! Only cells that were ever written are stored, in a row-major BTreeMap so
//! iteration order matches the order cells appear in a worksheet part.

use std::collections::BTreeMap;

use super::CellValue;
use crate::style::Style;

/// Complete data for a single cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellData {
    /// The cell's value
    pub value: CellValue,
    /// The cell's own formatting (None = unstyled)
    pub style: Option<Style>,
}

impl CellData {
    /// Create a new unstyled cell
    pub fn new(value: CellValue) -> Self {
        Self { value, style: None }
    }

    /// Create a new cell with a value and style
    pub fn with_style(value: CellValue, style: Style) -> Self {
        Self {
            value,
            style: Some(style),
        }
    }

    /// Check whether the cell carries formatting of its own
    pub fn has_style(&self) -> bool {
        self.style.is_some()
    }

    /// Check if this cell is effectively empty (no value and no style)
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.style.is_none()
    }
}

/// Row-major sparse storage
#[derive(Debug, Clone, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u16, CellData>>,
    count: usize,
}

impl CellStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cell
    pub fn get(&self, row: u32, col: u16) -> Option<&CellData> {
        self.rows.get(&row).and_then(|r| r.get(&col))
    }

    /// Get a mutable cell
    pub fn get_mut(&mut self, row: u32, col: u16) -> Option<&mut CellData> {
        self.rows.get_mut(&row).and_then(|r| r.get_mut(&col))
    }

    /// Get a cell, creating an empty one if it does not exist yet
    pub fn entry(&mut self, row: u32, col: u16) -> &mut CellData {
        let cells = self.rows.entry(row).or_default();
        if !cells.contains_key(&col) {
            self.count += 1;
        }
        cells.entry(col).or_default()
    }

    /// Store a cell, replacing any previous one at the same position
    pub fn insert(&mut self, row: u32, col: u16, data: CellData) {
        if self.rows.entry(row).or_default().insert(col, data).is_none() {
            self.count += 1;
        }
    }

    /// Remove a cell
    pub fn remove(&mut self, row: u32, col: u16) -> Option<CellData> {
        let cells = self.rows.get_mut(&row)?;
        let removed = cells.remove(&col);
        if cells.is_empty() {
            self.rows.remove(&row);
        }
        if removed.is_some() {
            self.count -= 1;
        }
        removed
    }

    /// Number of stored cells
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if no cell is stored
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Highest stored row index (0-based)
    pub fn last_row(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    /// Highest stored column index across all rows (0-based)
    pub fn last_col(&self) -> Option<u16> {
        self.rows
            .values()
            .filter_map(|cells| cells.keys().next_back().copied())
            .max()
    }

    /// Row indices that hold at least one cell, ascending
    pub fn row_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.keys().copied()
    }

    /// Cells of one row, ascending by column
    pub fn row(&self, row: u32) -> impl Iterator<Item = (u16, &CellData)> {
        self.rows
            .get(&row)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(c, d)| (*c, d)))
    }

    /// Iterate over all cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.rows
            .iter()
            .flat_map(|(r, cells)| cells.iter().map(move |(c, d)| (*r, *c, d)))
    }

    /// Iterate mutably over all cells in row-major order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, u16, &mut CellData)> {
        self.rows
            .iter_mut()
            .flat_map(|(r, cells)| cells.iter_mut().map(move |(c, d)| (*r, *c, d)))
    }
}
