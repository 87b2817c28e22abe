//! Colour palette and typography handed to the renderer at start-up

use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Bubble background for user turns
    #[serde(with = "hex_color")]
    pub user: Color,
    /// Bubble background for assistant turns
    #[serde(with = "hex_color")]
    pub assistant: Color,
    /// Foreground inside bubbles
    #[serde(with = "hex_color")]
    pub text: Color,
    #[serde(with = "hex_color")]
    pub border: Color,
    /// Terminals pick their own font, so this is informational only.
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            user: Color::Rgb(0x8B, 0x45, 0x13),
            assistant: Color::Rgb(0xFF, 0x8C, 0x00),
            text: Color::White,
            border: Color::Rgb(0xE0, 0xE0, 0xE0),
            font_family: "'Segoe UI', Tahoma, Geneva, Verdana, sans-serif".to_string(),
        }
    }
}

/// Parse `#RRGGBB` (leading `#` optional) or a named colour such as `white`.
pub fn parse_color(s: &str) -> Option<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    s.trim().parse::<Color>().ok()
}

pub fn format_color(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        other => other.to_string().to_lowercase(),
    }
}

mod hex_color {
    use super::*;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_color(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_color(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid colour: {}", s)))
    }
}
