//! Cell value types

use std::fmt;

use super::CellRange;

/// The value stored in a cell
///
/// Values are carried through a merge untouched: numbers keep their exact
/// `f64`, error codes and ISO dates keep their source text, and formulas keep
/// both their text and the last result the authoring application cached.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value, possibly styled)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value (serial dates are numbers too)
    Number(f64),

    /// String value
    String(String),

    /// Error code as written in the file (e.g. `#DIV/0!`)
    Error(String),

    /// ISO 8601 date/time text from a `t="d"` cell
    Date(String),

    /// Formula with cached result
    Formula {
        /// Formula text with a leading `=` (e.g. "=SUM(A1:A10)")
        text: String,
        /// Last calculated value, if the file stored one
        cached_value: Option<Box<CellValue>>,
        /// Set when this cell anchors a shared-formula group
        shared: Option<SharedFormula>,
    },

    /// Cell continuing a shared formula; the text lives on the group's anchor
    SharedFormulaRef {
        /// Group index (`si`) of the anchor
        index: u32,
        /// Last calculated value, if the file stored one
        cached_value: Option<Box<CellValue>>,
    },
}

/// A shared-formula group (`<f t="shared" ref=".." si="..">`) anchored at
/// the cell holding the formula text
///
/// Other cells of `range` refer to the group by `index` and are evaluated
/// with the anchor's formula shifted to their own position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedFormula {
    /// Group index, unique within a sheet
    pub index: u32,
    /// Cells the group covers
    pub range: CellRange,
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Create a formula value, adding the leading `=` when missing
    pub fn formula<S: Into<String>>(text: S) -> Self {
        Self::formula_with_cached(text, None)
    }

    /// Create a formula value carrying a cached result
    pub fn formula_with_cached<S: Into<String>>(text: S, cached: Option<CellValue>) -> Self {
        let text = text.into();
        let text = if text.starts_with('=') {
            text
        } else {
            format!("={}", text)
        };
        CellValue::Formula {
            text,
            cached_value: cached.map(Box::new),
            shared: None,
        }
    }

    /// Create the anchor formula of a shared-formula group
    pub fn shared_formula<S: Into<String>>(
        text: S,
        cached: Option<CellValue>,
        group: SharedFormula,
    ) -> Self {
        let mut value = Self::formula_with_cached(text, cached);
        if let CellValue::Formula { shared, .. } = &mut value {
            *shared = Some(group);
        }
        value
    }

    /// Create a cell continuing shared-formula group `index`
    pub fn shared_formula_ref(index: u32, cached: Option<CellValue>) -> Self {
        CellValue::SharedFormulaRef {
            index,
            cached_value: cached.map(Box::new),
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell holds a formula
    pub fn is_formula(&self) -> bool {
        matches!(
            self,
            CellValue::Formula { .. } | CellValue::SharedFormulaRef { .. }
        )
    }

    /// Get the numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean value, if any
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the string value, if any
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the formula text, if this cell holds one
    ///
    /// Cells continuing a shared formula have no text of their own.
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Shared-formula group index of an anchor or continuing cell
    pub fn shared_index(&self) -> Option<u32> {
        match self {
            CellValue::Formula {
                shared: Some(group),
                ..
            } => Some(group.index),
            CellValue::SharedFormulaRef { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The cached result of a formula cell
    pub fn cached_value(&self) -> Option<&CellValue> {
        match self {
            CellValue::Formula { cached_value, .. }
            | CellValue::SharedFormulaRef { cached_value, .. } => cached_value.as_deref(),
            _ => None,
        }
    }

    /// The cached result of a formula, or the value itself for anything else
    pub fn effective_value(&self) -> &CellValue {
        if self.is_formula() {
            return self.cached_value().unwrap_or(&CellValue::Empty);
        }
        self
    }

    /// Short type name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::Error(_) => "error",
            CellValue::Date(_) => "date",
            CellValue::Formula { .. } | CellValue::SharedFormulaRef { .. } => "formula",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) | CellValue::Error(s) | CellValue::Date(s) => f.write_str(s),
            CellValue::Formula { text, .. } => f.write_str(text),
            CellValue::SharedFormulaRef { cached_value, .. } => match cached_value {
                Some(v) => write!(f, "{}", v),
                None => Ok(()),
            },
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}
