//! Style attributes shared by element kinds.

use peniko::Color as PenikoColor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGBA8 color, serialized as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Convert to a renderer color with an extra opacity multiplier.
    pub fn with_opacity(self, opacity: f64) -> PenikoColor {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        PenikoColor::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color: {0}")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "transparent" {
            return Ok(Self::transparent());
        }
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| ParseColorError(s.to_string()))
        };
        match hex.len() {
            // #rgb -> #rrggbb
            3 => Ok(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl From<PenikoColor> for Color {
    fn from(color: PenikoColor) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<Color> for PenikoColor {
    fn from(color: Color) -> Self {
        PenikoColor::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Stroke dash style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Font family for text elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Hand-drawn style font.
    #[default]
    Draw,
    Sans,
    Serif,
    Monospace,
}

impl FontFamily {
    /// Average glyph advance as a fraction of the font size.
    pub fn char_width_factor(self) -> f64 {
        match self {
            FontFamily::Draw => 0.55,
            FontFamily::Sans => 0.52,
            FontFamily::Serif => 0.50,
            FontFamily::Monospace => 0.60,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Decoration drawn at a line/arrow endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    #[default]
    None,
    Arrow,
    Triangle,
    Circle,
    Square,
}

/// Outline variant of a rectangle element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeVariant {
    #[default]
    Sharp,
    Rounded,
    Diamond,
}

/// Style applied to newly created elements.
///
/// Updated whenever a style is applied to the selection, so the last used
/// style becomes the next element's style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleDefaults {
    pub fill_color: Option<Color>,
    pub fill_opacity: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub stroke_opacity: f64,
    pub text_color: Color,
    pub text_font: FontFamily,
    pub text_size: f64,
    pub text_align: TextAlign,
    pub arrowhead_start: Arrowhead,
    pub arrowhead_end: Arrowhead,
    pub shape_variant: ShapeVariant,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            fill_color: None,
            fill_opacity: 1.0,
            stroke_color: Color::black(),
            stroke_width: 2.0,
            stroke_style: StrokeStyle::Solid,
            stroke_opacity: 1.0,
            text_color: Color::black(),
            text_font: FontFamily::Draw,
            text_size: 16.0,
            text_align: TextAlign::Center,
            arrowhead_start: Arrowhead::None,
            arrowhead_end: Arrowhead::Arrow,
            shape_variant: ShapeVariant::Sharp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::white());
        assert_eq!("#000000".parse::<Color>().unwrap(), Color::black());
        assert_eq!(
            "#11223380".parse::<Color>().unwrap(),
            Color::new(0x11, 0x22, 0x33, 0x80)
        );
        assert_eq!("transparent".parse::<Color>().unwrap(), Color::transparent());
        assert!("red".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_json_is_hex() {
        let json = serde_json::to_string(&Color::new(255, 0, 16, 255)).unwrap();
        assert_eq!(json, "\"#ff0010\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::new(255, 0, 16, 255));
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let color = Color::black().with_opacity(0.5);
        assert_eq!(color.to_rgba8().a, 128);
    }
}
