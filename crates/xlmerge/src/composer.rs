//! Sheet composition
//!
//! Rebuilds a source sheet inside the output document, attribute by
//! attribute: sheet format, column and row records, merged ranges, frozen
//! panes, then every cell with its own copy of the source style.

use xlmerge_core::{CellData, CellRange, CellValue, ColumnDim, RowDim, Workbook, Worksheet};

use crate::copier::copy_style;
use crate::error::ComposeError;

/// Append a copy of `source` to `target` under `title`
///
/// The new sheet is assembled on its own and only appended once every step
/// succeeded; on error `target` is unchanged.
pub fn compose(target: &mut Workbook, title: &str, source: &Worksheet) -> Result<(), ComposeError> {
    target.validate_sheet_name(title)?;

    let sheet = build_sheet(title, source)?;
    let cells = sheet.cell_count();
    target.add_existing_worksheet(sheet)?;

    log::debug!(
        "composed sheet '{}' from '{}' with {} cells",
        title,
        source.name(),
        cells
    );
    Ok(())
}

fn build_sheet(title: &str, source: &Worksheet) -> Result<Worksheet, ComposeError> {
    let mut sheet = Worksheet::new(title);
    sheet.set_format(*source.format());

    copy_columns(&mut sheet, source);
    copy_rows(&mut sheet, source);

    for range in source.merged_regions() {
        sheet.merge_cells(range)?;
    }

    sheet.set_freeze_panes_opt(source.freeze_panes().copied());

    let mut merges = MergeSweep::new(source.merged_regions());
    let mut dropped = 0usize;
    for (row, col, cell) in source.iter_cells() {
        let covered = merges.covers(row, col);

        let value = if covered {
            if !cell.value.is_empty() {
                dropped += 1;
            }
            CellValue::Empty
        } else {
            cell.value.clone()
        };
        let style = cell.style.as_ref().map(copy_style);

        if value.is_empty() && style.is_none() {
            continue;
        }
        sheet.set_cell_at(row, col, CellData { value, style })?;
    }

    if dropped > 0 {
        log::debug!(
            "'{}': dropped {} value(s) hidden under merged ranges",
            source.name(),
            dropped
        );
    }

    Ok(sheet)
}

/// Merged ranges swept in row order alongside a row-major cell walk
///
/// Only ranges spanning the current row are checked. Asking about an
/// earlier row restarts the sweep.
struct MergeSweep<'a> {
    by_start_row: Vec<&'a CellRange>,
    next: usize,
    active: Vec<&'a CellRange>,
    row: Option<u32>,
}

impl<'a> MergeSweep<'a> {
    fn new(ranges: &'a [CellRange]) -> Self {
        let mut by_start_row: Vec<&CellRange> = ranges.iter().collect();
        by_start_row.sort_by_key(|range| range.start.row);
        Self {
            by_start_row,
            next: 0,
            active: Vec::new(),
            row: None,
        }
    }

    /// Whether (row, col) lies in a merged range without being its anchor
    fn covers(&mut self, row: u32, col: u16) -> bool {
        if self.row != Some(row) {
            if self.row.map_or(false, |current| row < current) {
                self.next = 0;
                self.active.clear();
            }
            self.active.retain(|range| range.end.row >= row);
            while let Some(range) = self
                .by_start_row
                .get(self.next)
                .copied()
                .filter(|range| range.start.row <= row)
            {
                if range.end.row >= row {
                    self.active.push(range);
                }
                self.next += 1;
            }
            self.row = Some(row);
        }

        self.active
            .iter()
            .any(|range| range.contains(row, col) && !range.is_anchor(row, col))
    }
}

/// Every column in the extent gets a record; columns without one in the
/// source get the default width spelled out
fn copy_columns(sheet: &mut Worksheet, source: &Worksheet) {
    let max_column = source.max_column();
    let default_width = sheet.default_column_width();

    for col in 0..max_column {
        let dim = match source.column_dim(col) {
            Some(dim) => copy_column_dim(dim),
            None => ColumnDim::new().with_width(default_width),
        };
        sheet.set_column_dim(col, dim);
    }

    for (col, dim) in source.column_dims().filter(|(col, _)| *col >= max_column) {
        sheet.set_column_dim(col, copy_column_dim(dim));
    }
}

fn copy_rows(sheet: &mut Worksheet, source: &Worksheet) {
    let max_row = source.max_row();
    let default_height = sheet.default_row_height();

    for row in 0..max_row {
        let dim = match source.row_dim(row) {
            Some(dim) => copy_row_dim(dim),
            None => RowDim::new().with_height(default_height),
        };
        sheet.set_row_dim(row, dim);
    }

    for (row, dim) in source.row_dims().filter(|(row, _)| *row >= max_row) {
        sheet.set_row_dim(row, copy_row_dim(dim));
    }
}

fn copy_column_dim(dim: &ColumnDim) -> ColumnDim {
    ColumnDim {
        width: dim.width,
        hidden: dim.hidden,
        outline_level: dim.outline_level,
        best_fit: dim.best_fit,
    }
}

fn copy_row_dim(dim: &RowDim) -> RowDim {
    RowDim {
        height: dim.height,
        hidden: dim.hidden,
        outline_level: dim.outline_level,
    }
}
