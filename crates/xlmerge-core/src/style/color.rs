//! Color representation

use std::hash::{Hash, Hasher};

/// Color representation
///
/// Mirrors the attribute forms a spreadsheet color can take, so a color read
/// from one file is written back in the same form.
#[derive(Debug, Clone, Copy, Default)]
pub enum Color {
    /// Automatic/default color (no explicit color element)
    #[default]
    Auto,

    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// ARGB color with alpha channel
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color with tint
    ///
    /// Theme indices:
    /// 0 = Background 1 (light)
    /// 1 = Text 1 (dark)
    /// 2 = Background 2
    /// 3 = Text 2
    /// 4-9 = Accent 1-6
    Theme {
        /// Theme color index
        index: u8,
        /// Tint (-1.0 to 1.0), kept exactly as read
        tint: f64,
    },

    /// Indexed color (legacy palette; 64 is the system foreground)
    Indexed(u8),
}

impl Color {
    /// Black
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// White
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create an ARGB color
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a, r, g, b }
    }

    /// Create a theme color
    pub const fn theme(index: u8, tint: f64) -> Self {
        Color::Theme { index, tint }
    }

    /// Create from a hex string ("#FF0000", "FF0000" or "FFFF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let byte = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
        };

        match hex.len() {
            6 => Some(Color::Rgb {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// ARGB hex string for an explicit RGB/ARGB color (e.g. "FFFF0000")
    pub fn to_argb_hex(&self) -> Option<String> {
        match self {
            Color::Rgb { r, g, b } => Some(format!("FF{:02X}{:02X}{:02X}", r, g, b)),
            Color::Argb { a, r, g, b } => Some(format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b)),
            _ => None,
        }
    }

    /// Check if this is the automatic color
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Color::Auto, Color::Auto) => true,
            (Color::Rgb { r, g, b }, Color::Rgb { r: r2, g: g2, b: b2 }) => {
                (r, g, b) == (r2, g2, b2)
            }
            (
                Color::Argb { a, r, g, b },
                Color::Argb {
                    a: a2,
                    r: r2,
                    g: g2,
                    b: b2,
                },
            ) => (a, r, g, b) == (a2, r2, g2, b2),
            (Color::Theme { index, tint }, Color::Theme { index: i2, tint: t2 }) => {
                index == i2 && tint.to_bits() == t2.to_bits()
            }
            (Color::Indexed(a), Color::Indexed(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Color::Auto => {}
            Color::Rgb { r, g, b } => (r, g, b).hash(state),
            Color::Argb { a, r, g, b } => (a, r, g, b).hash(state),
            Color::Theme { index, tint } => {
                index.hash(state);
                tint.to_bits().hash(state);
            }
            Color::Indexed(i) => i.hash(state),
        }
    }
}
