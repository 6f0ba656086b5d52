//! Immediate-mode 2D drawing surface.

use crate::Viewport;

/// Fill style: an RGB color with an alpha between 0.0 and 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Fill {
    pub const BLACK: Fill = Fill::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    /// Parse a `#rrggbb` color. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Font used by [`Surface::fill_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub size_px: u32,
    pub family: String,
}

impl Font {
    pub fn monospace(size_px: u32) -> Self {
        Self {
            size_px,
            family: "monospace".to_string(),
        }
    }
}

/// A drawing surface bound to a rectangle of logical pixels.
///
/// Text is positioned by its baseline, so a glyph drawn at `y` occupies the
/// cell row that ends at `y`.
pub trait Surface {
    /// Current size in logical pixels.
    fn size(&self) -> Viewport;

    /// Resize the surface. Content is not preserved.
    fn resize(&mut self, viewport: Viewport);

    /// Set the fill style used by subsequent draw calls.
    fn set_fill(&mut self, fill: Fill);

    /// Set the font used by subsequent text draws.
    fn set_font(&mut self, font: Font);

    /// Paint a rectangle with the current fill, blending by its alpha.
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32);

    /// Draw text with its baseline at `y`.
    fn fill_text(&mut self, text: &str, x: u32, y: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Fill::from_hex("#8A2BE2"), Some(Fill::rgb(0x8a, 0x2b, 0xe2)));
        assert_eq!(Fill::from_hex("00ff00"), Some(Fill::rgb(0, 255, 0)));
        assert_eq!(Fill::from_hex("#8A2BE"), None);
        assert_eq!(Fill::from_hex("#GGGGGG"), None);
        assert_eq!(Fill::from_hex("#ééé"), None);
    }

    #[test]
    fn test_with_alpha() {
        let fill = Fill::BLACK.with_alpha(0.05);
        assert_eq!(fill, Fill::rgba(0, 0, 0, 0.05));
    }
}
