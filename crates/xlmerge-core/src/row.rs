//! Row dimension records

/// Per-row sizing, visibility and outline state
///
/// A row without a record inherits the sheet's default row height.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowDim {
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    /// Row is hidden
    pub hidden: bool,
    /// Outline/grouping level (0-7)
    pub outline_level: u8,
}

impl RowDim {
    /// Create a row record with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set height
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
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

    /// Check if this row differs from an untouched row
    pub fn has_custom_settings(&self) -> bool {
        self.height.is_some() || self.hidden || self.outline_level > 0
    }
}
