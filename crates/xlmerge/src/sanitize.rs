//! Sheet title sanitizing
//!
//! Input names come from file names and can contain anything. Sheet titles
//! cannot: they are at most 31 characters, must not use `: \ / ? * [ ]`,
//! must not begin or end with `'`, must not be `History`, and must be unique
//! within a workbook (ignoring case).

use xlmerge_core::{INVALID_SHEET_NAME_CHARS, MAX_SHEET_NAME_LEN, RESERVED_SHEET_NAME};

/// Remove forbidden characters, trim edge apostrophes and truncate to the
/// title length limit
pub fn sanitize(raw_name: &str) -> String {
    let filtered: String = raw_name
        .chars()
        .filter(|c| !INVALID_SHEET_NAME_CHARS.contains(c))
        .collect();
    let truncated: String = filtered
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    // Truncation can expose an apostrophe at the new end
    truncated.trim_end_matches('\'').to_string()
}

/// Strip the final `.ext` segment from a file name
///
/// `report.final.xlsx` becomes `report.final`; a name without a dot is kept.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[..pos],
        None => name,
    }
}

/// Registry of the titles handed out during one merge run
#[derive(Debug, Clone)]
pub struct SheetTitles {
    taken: Vec<String>,
    fallback: String,
}

impl Default for SheetTitles {
    fn default() -> Self {
        Self::new("Sheet")
    }
}

impl SheetTitles {
    /// Create an empty registry; `fallback` replaces names that sanitize to nothing
    pub fn new(fallback: &str) -> Self {
        let fallback = sanitize(fallback);
        Self {
            taken: Vec::new(),
            fallback: if fallback.is_empty() {
                "Sheet".to_string()
            } else {
                fallback
            },
        }
    }

    /// Check whether a title is in use, ignoring case
    pub fn contains(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.taken.iter().any(|t| t.to_lowercase() == lower)
    }

    fn is_free(&self, title: &str) -> bool {
        !title.eq_ignore_ascii_case(RESERVED_SHEET_NAME) && !self.contains(title)
    }

    /// Pick a free title for an input name without reserving it
    ///
    /// The name loses its extension and is sanitized. A taken or reserved
    /// title gets the first free `_1`, `_2`, ... suffix, with the base
    /// shortened so the result still fits the length limit.
    pub fn propose(&self, input_name: &str) -> String {
        let base = sanitize(strip_extension(input_name));
        let base = if base.is_empty() {
            self.fallback.clone()
        } else {
            base
        };

        if self.is_free(&base) {
            return base;
        }

        (1usize..)
            .map(|n| {
                let suffix = format!("_{}", n);
                let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
                let mut candidate: String = base.chars().take(keep).collect();
                candidate.push_str(&suffix);
                candidate
            })
            .find(|candidate| self.is_free(candidate))
            .unwrap_or(base)
    }

    /// Mark a title as used
    pub fn reserve(&mut self, title: &str) {
        self.taken.push(title.to_string());
    }

    /// Titles handed out so far, in order
    pub fn titles(&self) -> &[String] {
        &self.taken
    }
}
