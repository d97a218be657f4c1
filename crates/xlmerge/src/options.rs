//! Merge run configuration

use xlmerge_xlsx::ReadOptions;

/// Options for a merge run
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Read formula cells as their cached results instead of formulas
    pub data_only: bool,
    /// Parse inputs on the rayon pool (needs the `parallel` feature)
    pub parallel: bool,
    /// Title for inputs whose name sanitizes to nothing (default: "Sheet")
    pub fallback_title: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            data_only: false,
            parallel: false,
            fallback_title: "Sheet".to_string(),
        }
    }
}

impl MergeOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether formulas are replaced by their cached results
    pub fn with_data_only(mut self, data_only: bool) -> Self {
        self.data_only = data_only;
        self
    }

    /// Set whether inputs are parsed in parallel
    ///
    /// Without the `parallel` feature this is accepted and ignored.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the title used for names that sanitize to nothing
    pub fn with_fallback_title<S: Into<String>>(mut self, title: S) -> Self {
        self.fallback_title = title.into();
        self
    }

    pub(crate) fn read_options(&self) -> ReadOptions {
        ReadOptions::new().with_data_only(self.data_only)
    }
}
