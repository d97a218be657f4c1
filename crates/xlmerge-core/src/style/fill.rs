//! Fill/background style types

use super::Color;

/// Fill style for cell background
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FillStyle {
    /// No fill (transparent)
    #[default]
    None,

    /// Solid color fill
    Solid { color: Color },

    /// Pattern fill
    Pattern {
        pattern: PatternType,
        foreground: Color,
        background: Color,
    },

    /// Gradient fill
    Gradient(GradientFill),
}

impl FillStyle {
    /// Create a solid fill with the given color
    pub fn solid(color: Color) -> Self {
        FillStyle::Solid { color }
    }

    /// Create a pattern fill
    pub fn pattern(pattern: PatternType, foreground: Color, background: Color) -> Self {
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        }
    }

    /// Check if this is a "no fill"
    pub fn is_none(&self) -> bool {
        matches!(self, FillStyle::None)
    }
}

impl std::hash::Hash for FillStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FillStyle::None => {}
            FillStyle::Solid { color } => color.hash(state),
            FillStyle::Pattern {
                pattern,
                foreground,
                background,
            } => {
                pattern.hash(state);
                foreground.hash(state);
                background.hash(state);
            }
            FillStyle::Gradient(gradient) => gradient.hash(state),
        }
    }
}

impl Eq for FillStyle {}

/// Gradient fill parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientFill {
    /// Linear or path gradient
    pub gradient_type: GradientType,
    /// Angle of a linear gradient, in degrees
    pub degree: f64,
    /// Path gradient box (fractions of the cell)
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    /// Color stops, in position order
    pub stops: Vec<GradientStop>,
}

impl std::hash::Hash for GradientFill {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.gradient_type.hash(state);
        for v in [self.degree, self.left, self.right, self.top, self.bottom] {
            v.to_bits().hash(state);
        }
        for stop in &self.stops {
            stop.position.to_bits().hash(state);
            stop.color.hash(state);
        }
    }
}

/// Pattern fill types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternType {
    /// No pattern
    #[default]
    None,
    /// Solid (100% foreground)
    Solid,
    /// 50% gray
    MediumGray,
    /// 75% gray
    DarkGray,
    /// 25% gray
    LightGray,
    /// Horizontal stripe
    DarkHorizontal,
    /// Vertical stripe
    DarkVertical,
    /// Diagonal stripe (down)
    DarkDown,
    /// Diagonal stripe (up)
    DarkUp,
    /// Grid
    DarkGrid,
    /// Trellis
    DarkTrellis,
    /// Thin horizontal stripe
    LightHorizontal,
    /// Thin vertical stripe
    LightVertical,
    /// Thin diagonal stripe (down)
    LightDown,
    /// Thin diagonal stripe (up)
    LightUp,
    /// Thin grid
    LightGrid,
    /// Thin trellis
    LightTrellis,
    /// 12.5% gray
    Gray125,
    /// 6.25% gray
    Gray0625,
}

/// Gradient types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GradientType {
    /// Linear gradient
    #[default]
    Linear,
    /// Radial/path gradient
    Path,
}

/// Gradient stop (position and color)
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    /// Position (0.0 to 1.0)
    pub position: f64,
    /// Color at this position
    pub color: Color,
}

impl GradientStop {
    /// Create a new gradient stop
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}
