//! Color themes.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::Fill;

/// Color theme for page text and the rain glyphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Purple,
    Green,
    Cyan,
    Amber,
    Crimson,
}

impl ColorTheme {
    /// Cycle to the next color theme.
    pub fn next(&self) -> Self {
        match self {
            ColorTheme::Purple => ColorTheme::Green,
            ColorTheme::Green => ColorTheme::Cyan,
            ColorTheme::Cyan => ColorTheme::Amber,
            ColorTheme::Amber => ColorTheme::Crimson,
            ColorTheme::Crimson => ColorTheme::Purple,
        }
    }

    /// Accent color for headings, tags and navigation.
    pub fn accent(self) -> Color {
        let Fill { r, g, b, .. } = self.glyph();
        Color::Rgb(r, g, b)
    }

    /// Lighter tint of the accent, for highlighted text.
    pub fn highlight(self) -> Color {
        match self {
            ColorTheme::Purple => Color::Rgb(0xd8, 0xb4, 0xfe),
            ColorTheme::Green => Color::Rgb(0xbb, 0xf7, 0xd0),
            ColorTheme::Cyan => Color::Rgb(0xa5, 0xf3, 0xfc),
            ColorTheme::Amber => Color::Rgb(0xfd, 0xe6, 0x8a),
            ColorTheme::Crimson => Color::Rgb(0xfe, 0xca, 0xca),
        }
    }

    /// Glyph color for the rain.
    pub fn glyph(self) -> Fill {
        match self {
            ColorTheme::Purple => Fill::rgb(0x8a, 0x2b, 0xe2),
            ColorTheme::Green => Fill::rgb(0x00, 0xc8, 0x3c),
            ColorTheme::Cyan => Fill::rgb(0x00, 0xb7, 0xc3),
            ColorTheme::Amber => Fill::rgb(0xe0, 0x9b, 0x00),
            ColorTheme::Crimson => Fill::rgb(0xdc, 0x14, 0x3c),
        }
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            ColorTheme::Purple => "purple",
            ColorTheme::Green => "green",
            ColorTheme::Cyan => "cyan",
            ColorTheme::Amber => "amber",
            ColorTheme::Crimson => "crimson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_back() {
        let mut theme = ColorTheme::default();
        for _ in 0..5 {
            theme = theme.next();
        }
        assert_eq!(theme, ColorTheme::Purple);
    }

    #[test]
    fn test_accent_matches_glyph() {
        assert_eq!(ColorTheme::Purple.accent(), Color::Rgb(0x8a, 0x2b, 0xe2));
    }
}
