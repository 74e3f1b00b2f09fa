//! Bitmap text
//!
//! A deterministic built-in face: 5x7 glyphs on a 6x9 cell, scaled to
//! the font's em height. Lowercase letters render with uppercase glyphs
//! and characters without a glyph render as a hollow box.
//!
//! Layout follows the usual string-format model: horizontal and vertical
//! alignment inside a layout rectangle, word wrapping unless disabled,
//! and character or ellipsis trimming of lines that do not fit.

use crate::error::{Error, Result};
use crate::geometry::{RectF, SizeF};

/// Glyph columns
const GLYPH_WIDTH: usize = 5;
/// Glyph rows
const GLYPH_HEIGHT: usize = 7;
/// Horizontal advance in glyph units
const CELL_ADVANCE: f32 = 6.0;
/// Line height in glyph units; the em height maps onto this
const CELL_HEIGHT: f32 = 9.0;
/// Rows of padding above each glyph
const CELL_TOP: f32 = 1.0;

/// Families served by the built-in face
const BUILTIN_FAMILIES: &[&str] = &[
    "arial",
    "helvetica",
    "microsoft sans serif",
    "sans serif",
    "generic sans serif",
    "tahoma",
    "verdana",
    "courier new",
    "consolas",
    "monospace",
];

/// Family used when nothing else can be constructed
pub const BUILTIN_FAMILY: &str = "Arial";

/// Font style flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
    pub const BOLD: FontStyle = FontStyle {
        bold: true,
        italic: false,
    };
    pub const ITALIC: FontStyle = FontStyle {
        bold: false,
        italic: true,
    };
}

/// Unit a font size is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontUnit {
    /// Device pixels
    #[default]
    Pixel,
    /// 1/72 inch
    Point,
    /// 1 inch
    Inch,
    /// 1 millimetre
    Millimeter,
    /// 1/300 inch
    Document,
}

impl FontUnit {
    /// Convert a size in this unit to pixels at `dpi`
    pub fn to_pixels(self, size: f32, dpi: f32) -> f32 {
        match self {
            FontUnit::Pixel => size,
            FontUnit::Point => size * dpi / 72.0,
            FontUnit::Inch => size * dpi,
            FontUnit::Millimeter => size * dpi / 25.4,
            FontUnit::Document => size * dpi / 300.0,
        }
    }
}

/// A constructed font
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    family: String,
    size: f32,
    style: FontStyle,
    unit: FontUnit,
}

impl Font {
    /// The built-in font, which always constructs
    pub fn builtin(size: f32, style: FontStyle, unit: FontUnit) -> Self {
        Self {
            family: BUILTIN_FAMILY.to_string(),
            size,
            style,
            unit,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn unit(&self) -> FontUnit {
        self.unit
    }

    /// Em height in pixels at `dpi`
    pub fn em_pixels(&self, dpi: f32) -> f32 {
        self.unit.to_pixels(self.size, dpi)
    }

    /// Size of one glyph unit in pixels
    fn glyph_unit(&self, dpi: f32) -> f32 {
        self.em_pixels(dpi) / CELL_HEIGHT
    }

    /// Height of one line of text in pixels
    pub fn line_height(&self, dpi: f32) -> f32 {
        self.em_pixels(dpi)
    }

    /// Width of a single line of text in pixels
    pub fn line_width(&self, line: &str, dpi: f32) -> f32 {
        let extra = if self.style.bold { 1.0 } else { 0.0 };
        let n = line.chars().count();
        if n == 0 {
            0.0
        } else {
            n as f32 * CELL_ADVANCE * self.glyph_unit(dpi) + extra
        }
    }

    /// Pixel blocks making up `ch` drawn with its cell's top-left at
    /// `(x, y)`. Each block is `(x, y, size)` in pixels.
    pub fn glyph_blocks(&self, ch: char, x: f32, y: f32, dpi: f32) -> Vec<(f32, f32, f32)> {
        let unit = self.glyph_unit(dpi);
        let rows = glyph(ch);
        let mut blocks = Vec::new();
        for (row, bits) in rows.iter().enumerate() {
            let shear = if self.style.italic {
                (GLYPH_HEIGHT - 1 - row) as f32 * unit * 0.25
            } else {
                0.0
            };
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    let bx = x + shear + col as f32 * unit;
                    let by = y + (row as f32 + CELL_TOP) * unit;
                    blocks.push((bx, by, unit));
                    if self.style.bold {
                        blocks.push((bx + 1.0, by, unit));
                    }
                }
            }
        }
        blocks
    }
}

/// Font construction seam
pub trait FontSource {
    /// Construct a font, failing if the family is unavailable
    fn create_font(
        &self,
        family: &str,
        size: f32,
        style: FontStyle,
        unit: FontUnit,
    ) -> Result<Font>;
}

/// Serves the built-in face under common family names
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFontSource;

impl FontSource for BuiltinFontSource {
    fn create_font(
        &self,
        family: &str,
        size: f32,
        style: FontStyle,
        unit: FontUnit,
    ) -> Result<Font> {
        let key = family.trim().to_ascii_lowercase();
        if !BUILTIN_FAMILIES.contains(&key.as_str()) {
            return Err(Error::FontNotFound(family.to_string()));
        }
        if !size.is_finite() || size <= 0.0 {
            return Err(Error::InvalidParameter(format!("font size {size}")));
        }
        Ok(Font {
            family: family.trim().to_string(),
            size,
            style,
            unit,
        })
    }
}

/// Horizontal or vertical alignment within a layout rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringAlignment {
    #[default]
    Near,
    Center,
    Far,
}

/// How lines wider than the layout rectangle are shortened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringTrimming {
    /// Lines overflow the rectangle
    None,
    /// Cut at the last character that fits
    #[default]
    Character,
    /// Cut and append an ellipsis
    EllipsisCharacter,
}

/// Text layout options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StringFormat {
    pub alignment: StringAlignment,
    pub line_alignment: StringAlignment,
    pub trimming: StringTrimming,
    pub no_wrap: bool,
}

/// One positioned line of laid-out text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Split text into lines, wrapping at word boundaries to `max_width`.
fn wrap_lines(text: &str, font: &Font, dpi: f32, max_width: Option<f32>) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let Some(max_width) = max_width else {
            lines.push(paragraph.to_string());
            continue;
        };
        let mut current = String::new();
        for word in paragraph.split(' ') {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && font.line_width(&candidate, dpi) > max_width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    lines
}

/// Shorten a line to fit `max_width` according to `trimming`.
fn trim_line(
    line: &str,
    font: &Font,
    dpi: f32,
    max_width: f32,
    trimming: StringTrimming,
) -> String {
    if trimming == StringTrimming::None || font.line_width(line, dpi) <= max_width {
        return line.to_string();
    }
    let suffix = if trimming == StringTrimming::EllipsisCharacter {
        "..."
    } else {
        ""
    };
    let chars: Vec<char> = line.chars().collect();
    for keep in (0..chars.len()).rev() {
        let mut candidate: String = chars[..keep].iter().collect();
        candidate.push_str(suffix);
        if font.line_width(&candidate, dpi) <= max_width {
            return candidate;
        }
    }
    String::new()
}

/// Size of text laid out without a rectangle
pub fn measure(text: &str, font: &Font, dpi: f32) -> SizeF {
    let lines = wrap_lines(text, font, dpi, None);
    let width = lines
        .iter()
        .map(|l| font.line_width(l, dpi))
        .fold(0.0f32, f32::max);
    SizeF::new(width, lines.len() as f32 * font.line_height(dpi))
}

/// Size of text laid out in an area, before trimming
pub fn measure_in(text: &str, font: &Font, dpi: f32, area: SizeF, format: &StringFormat) -> SizeF {
    let wrap = if format.no_wrap { None } else { Some(area.w) };
    let lines = wrap_lines(text, font, dpi, wrap);
    let width = lines
        .iter()
        .map(|l| font.line_width(l, dpi))
        .fold(0.0f32, f32::max);
    SizeF::new(width, lines.len() as f32 * font.line_height(dpi))
}

/// Lay out text inside `rect`.
///
/// Only lines that fit completely inside the rectangle's height are
/// returned.
pub fn layout(
    text: &str,
    font: &Font,
    dpi: f32,
    rect: &RectF,
    format: &StringFormat,
) -> Vec<TextLine> {
    let wrap = if format.no_wrap { None } else { Some(rect.w) };
    let line_height = font.line_height(dpi);
    let mut lines = wrap_lines(text, font, dpi, wrap);

    let capacity = if line_height > 0.0 {
        ((rect.h + 0.01) / line_height).floor() as usize
    } else {
        0
    };
    lines.truncate(capacity);
    if lines.is_empty() {
        return Vec::new();
    }

    let block_height = lines.len() as f32 * line_height;
    let top = match format.line_alignment {
        StringAlignment::Near => rect.y,
        StringAlignment::Center => rect.y + (rect.h - block_height) / 2.0,
        StringAlignment::Far => rect.bottom() - block_height,
    };

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let text = trim_line(&line, font, dpi, rect.w, format.trimming);
            let width = font.line_width(&text, dpi);
            let x = match format.alignment {
                StringAlignment::Near => rect.x,
                StringAlignment::Center => rect.x + (rect.w - width) / 2.0,
                StringAlignment::Far => rect.right() - width,
            };
            TextLine {
                text,
                x,
                y: top + i as f32 * line_height,
            }
        })
        .collect()
}

/// Look up the 5x7 bitmap for a character; bit 4 is the leftmost column.
fn glyph(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch.to_ascii_uppercase() {
        ' ' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        ';' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '[' => [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E],
        ']' => [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E],
        '<' => [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02],
        '>' => [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '=' => [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '"' => [0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x00, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        '*' => [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00],
        '#' => [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        '@' => [0x0E, 0x11, 0x01, 0x0D, 0x15, 0x15, 0x0E],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font(px: f32) -> Font {
        Font::builtin(px, FontStyle::REGULAR, FontUnit::Pixel)
    }

    #[test]
    fn test_font_unit_conversion() {
        assert_eq!(FontUnit::Pixel.to_pixels(12.0, 96.0), 12.0);
        assert_eq!(FontUnit::Point.to_pixels(9.0, 96.0), 12.0);
        assert_eq!(FontUnit::Inch.to_pixels(1.0, 96.0), 96.0);
    }

    #[test]
    fn test_builtin_source_rejects_unknown_family() {
        let src = BuiltinFontSource;
        assert!(src.create_font("Arial", 10.0, FontStyle::REGULAR, FontUnit::Pixel).is_ok());
        assert!(src.create_font("arial", 10.0, FontStyle::BOLD, FontUnit::Point).is_ok());
        assert!(matches!(
            src.create_font("Wingdings", 10.0, FontStyle::REGULAR, FontUnit::Pixel),
            Err(Error::FontNotFound(_))
        ));
    }

    #[test]
    fn test_measure_single_line() {
        let size = measure("ABC", &font(9.0), 96.0);
        assert_eq!(size, SizeF::new(18.0, 9.0));
    }

    #[test]
    fn test_measure_multi_line() {
        let size = measure("AB\nABCD", &font(9.0), 96.0);
        assert_eq!(size, SizeF::new(24.0, 18.0));
    }

    #[test]
    fn test_layout_wraps_words() {
        let rect = RectF::new(0.0, 0.0, 30.0, 100.0);
        let lines = layout("AB CD EF", &font(9.0), 96.0, &rect, &StringFormat::default());
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["AB CD", "EF"]);
        assert_eq!(lines[1].y, 9.0);
    }

    #[test]
    fn test_layout_alignment() {
        let rect = RectF::new(0.0, 0.0, 60.0, 27.0);
        let format = StringFormat {
            alignment: StringAlignment::Far,
            line_alignment: StringAlignment::Center,
            ..Default::default()
        };
        let lines = layout("AB", &font(9.0), 96.0, &rect, &format);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].x, 48.0);
        assert_eq!(lines[0].y, 9.0);
    }

    #[test]
    fn test_layout_drops_partial_lines() {
        let rect = RectF::new(0.0, 0.0, 100.0, 15.0);
        let lines = layout("A\nB", &font(9.0), 96.0, &rect, &StringFormat::default());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_trimming() {
        let rect = RectF::new(0.0, 0.0, 30.0, 9.0);
        let mut format = StringFormat {
            no_wrap: true,
            ..Default::default()
        };
        let lines = layout("ABCDEFGH", &font(9.0), 96.0, &rect, &format);
        assert_eq!(lines[0].text, "ABCDE");

        format.trimming = StringTrimming::EllipsisCharacter;
        let lines = layout("ABCDEFGH", &font(9.0), 96.0, &rect, &format);
        assert_eq!(lines[0].text, "AB...");

        format.trimming = StringTrimming::None;
        let lines = layout("ABCDEFGH", &font(9.0), 96.0, &rect, &format);
        assert_eq!(lines[0].text, "ABCDEFGH");
    }

    #[test]
    fn test_glyph_blocks_scale_with_size() {
        let small = font(9.0).glyph_blocks('I', 0.0, 0.0, 96.0);
        let large = font(18.0).glyph_blocks('I', 0.0, 0.0, 96.0);
        assert_eq!(small.len(), large.len());
        assert_eq!(small[0].2 * 2.0, large[0].2);
    }
}
