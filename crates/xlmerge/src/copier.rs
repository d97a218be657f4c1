//! Style copying

use xlmerge_core::style::{GradientFill, GradientStop};
use xlmerge_core::{
    Alignment, BorderEdge, BorderStyle, FillStyle, FontStyle, NumberFormat, Protection, Style,
};

/// Build an independent copy of a cell style
///
/// Every nested record is rebuilt field by field, so the result shares no
/// allocation with `src` and a later edit to either side stays local.
pub fn copy_style(src: &Style) -> Style {
    Style {
        font: copy_font(&src.font),
        fill: copy_fill(&src.fill),
        border: copy_border(&src.border),
        alignment: copy_alignment(&src.alignment),
        number_format: copy_number_format(&src.number_format),
        protection: copy_protection(&src.protection),
    }
}

fn copy_font(font: &FontStyle) -> FontStyle {
    FontStyle {
        name: font.name.as_str().to_owned(),
        size: font.size,
        bold: font.bold,
        italic: font.italic,
        underline: font.underline,
        strikethrough: font.strikethrough,
        color: font.color,
        vertical_align: font.vertical_align,
        family: font.family,
        charset: font.charset,
        scheme: font.scheme,
    }
}

fn copy_fill(fill: &FillStyle) -> FillStyle {
    match fill {
        FillStyle::None => FillStyle::None,
        FillStyle::Solid { color } => FillStyle::Solid { color: *color },
        FillStyle::Pattern {
            pattern,
            foreground,
            background,
        } => FillStyle::Pattern {
            pattern: *pattern,
            foreground: *foreground,
            background: *background,
        },
        FillStyle::Gradient(gradient) => FillStyle::Gradient(GradientFill {
            gradient_type: gradient.gradient_type,
            degree: gradient.degree,
            left: gradient.left,
            right: gradient.right,
            top: gradient.top,
            bottom: gradient.bottom,
            stops: gradient
                .stops
                .iter()
                .map(|stop| GradientStop::new(stop.position, stop.color))
                .collect(),
        }),
    }
}

fn copy_border(border: &BorderStyle) -> BorderStyle {
    let edge = |e: &Option<BorderEdge>| e.as_ref().map(|e| BorderEdge::new(e.style, e.color));
    BorderStyle {
        left: edge(&border.left),
        right: edge(&border.right),
        top: edge(&border.top),
        bottom: edge(&border.bottom),
        diagonal: edge(&border.diagonal),
        diagonal_up: border.diagonal_up,
        diagonal_down: border.diagonal_down,
    }
}

fn copy_alignment(alignment: &Alignment) -> Alignment {
    Alignment {
        horizontal: alignment.horizontal,
        vertical: alignment.vertical,
        wrap_text: alignment.wrap_text,
        shrink_to_fit: alignment.shrink_to_fit,
        indent: alignment.indent,
        justify_last_line: alignment.justify_last_line,
        rotation: alignment.rotation,
        reading_order: alignment.reading_order,
    }
}

fn copy_number_format(format: &NumberFormat) -> NumberFormat {
    match format {
        NumberFormat::General => NumberFormat::General,
        NumberFormat::BuiltIn(id) => NumberFormat::BuiltIn(*id),
        NumberFormat::Custom(code) => NumberFormat::Custom(code.as_str().to_owned()),
    }
}

fn copy_protection(protection: &Protection) -> Protection {
    Protection {
        locked: protection.locked,
        hidden: protection.hidden,
    }
}
