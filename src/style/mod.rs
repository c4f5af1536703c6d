//! # Cell Styling
//!
//! The small, closed set of presentation properties a cell carries: font
//! weight, text alignment, color, and the four border toggles.
//!
//! Values serialize to the lowercase strings the persisted cell shape uses
//! (`"bold"`, `"center"`, `"#1a1a1a"`), so stored documents stay readable by
//! any host that speaks the same JSON.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_FONT_SIZE: u32 = 14;
pub const DEFAULT_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_css(&self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// An RGB color parsed from a `#rgb` / `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Parse a `#rgb` or `#rrggbb` color. Anything else is `None`.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => Some(Color {
                r: channel(&digits[0..1].repeat(2))?,
                g: channel(&digits[1..2].repeat(2))?,
                b: channel(&digits[2..3].repeat(2))?,
            }),
            6 => Some(Color {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
            }),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Which edges of a cell draw a border line.
///
/// Top and left default on, right and bottom default off, matching how the
/// editor has always drawn a freshly added cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borders {
    #[serde(rename = "borderTop", default = "default_true")]
    pub top: bool,
    #[serde(rename = "borderRight", default)]
    pub right: bool,
    #[serde(rename = "borderBottom", default)]
    pub bottom: bool,
    #[serde(rename = "borderLeft", default = "default_true")]
    pub left: bool,
}

impl Default for Borders {
    fn default() -> Self {
        Self {
            top: true,
            right: false,
            bottom: false,
            left: true,
        }
    }
}

fn default_true() -> bool {
    true
}
