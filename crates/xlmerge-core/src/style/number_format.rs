//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (id 0)
    #[default]
    General,

    /// Built-in format by id (1-49); the format code is implied by the id
    BuiltIn(u32),

    /// Custom format code
    Custom(String),
}

impl NumberFormat {
    /// Create a number format from a format code
    pub fn from_code<S: Into<String>>(code: S) -> Self {
        let code = code.into();
        if code == "General" {
            NumberFormat::General
        } else {
            NumberFormat::Custom(code)
        }
    }

    /// Create a format from a numFmtId that has no custom definition
    pub fn from_id(id: u32) -> Self {
        if id == 0 {
            NumberFormat::General
        } else {
            NumberFormat::BuiltIn(id)
        }
    }

    /// The format code this format displays with
    pub fn format_code(&self) -> &str {
        match self {
            NumberFormat::General => "General",
            NumberFormat::BuiltIn(id) => builtin_format_code(*id).unwrap_or("General"),
            NumberFormat::Custom(code) => code,
        }
    }

    /// Check if this is the General format
    pub fn is_general(&self) -> bool {
        matches!(self, NumberFormat::General)
    }
}

/// Format codes of the built-in ids that are locale independent
pub fn builtin_format_code(id: u32) -> Option<&'static str> {
    Some(match id {
        0 => "General",
        1 => "0",
        2 => "0.00",
        3 => "#,##0",
        4 => "#,##0.00",
        9 => "0%",
        10 => "0.00%",
        11 => "0.00E+00",
        12 => "# ?/?",
        13 => "# ??/??",
        14 => "mm-dd-yy",
        15 => "d-mmm-yy",
        16 => "d-mmm",
        17 => "mmm-yy",
        18 => "h:mm AM/PM",
        19 => "h:mm:ss AM/PM",
        20 => "h:mm",
        21 => "h:mm:ss",
        22 => "m/d/yy h:mm",
        37 => "#,##0 ;(#,##0)",
        38 => "#,##0 ;[Red](#,##0)",
        39 => "#,##0.00;(#,##0.00)",
        40 => "#,##0.00;[Red](#,##0.00)",
        45 => "mm:ss",
        46 => "[h]:mm:ss",
        47 => "mmss.0",
        48 => "##0.0E+0",
        49 => "@",
        _ => return None,
    })
}
