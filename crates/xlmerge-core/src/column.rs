//! Column dimension records

/// Per-column sizing, visibility and outline state
///
/// A column without a record inherits the sheet's default column width.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnDim {
    /// Custom width in character units (None = default)
    pub width: Option<f64>,
    /// Column is hidden
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
    /// Width was auto-fitted to the content
    pub best_fit: bool,
}

impl ColumnDim {
    /// Create a column record with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Set hidden
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Set outline level
    pub fn with_outline_level(mut self, level: u8) -> Self {
        self.outline_level = level;
        self
    }

    /// Set best fit
    pub fn with_best_fit(mut self, best_fit: bool) -> Self {
        self.best_fit = best_fit;
        self
    }

    /// Check if this column differs from an untouched column
    pub fn has_custom_settings(&self) -> bool {
        self.width.is_some() || self.hidden || self.outline_level > 0 || self.best_fit
    }
}

/// A run of consecutive columns sharing one record (the `<col min max>` shape)
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpan {
    /// Start column index (0-based)
    pub min: u16,
    /// End column index (inclusive)
    pub max: u16,
    /// Shared settings
    pub dim: ColumnDim,
}

impl ColumnSpan {
    /// Create a span covering a single column
    pub fn single(index: u16, dim: ColumnDim) -> Self {
        Self {
            min: index,
            max: index,
            dim,
        }
    }

    /// Group column records, given in ascending column order, into maximal runs
    /// of adjacent columns with identical settings.
    pub fn coalesce<'a, I>(columns: I) -> Vec<ColumnSpan>
    where
        I: IntoIterator<Item = (u16, &'a ColumnDim)>,
    {
        let mut spans: Vec<ColumnSpan> = Vec::new();
        for (index, dim) in columns {
            match spans.last_mut() {
                Some(last) if last.max + 1 == index && last.dim == *dim => last.max = index,
                _ => spans.push(ColumnSpan::single(index, dim.clone())),
            }
        }
        spans
    }
}
