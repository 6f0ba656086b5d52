//! Validated settings shared by the page components.

use crate::Fill;

/// Settings of the scroll-triggered reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Fraction of an element that must be visible to reveal it.
    pub visibility_threshold: f32,
    /// Duration of the fade once revealed, in milliseconds.
    pub transition_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: 0.1,
            transition_ms: 1000,
        }
    }
}

/// Settings of the matrix rain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainConfig {
    /// Size of a glyph cell in logical pixels.
    pub cell_size: u32,
    /// Alpha of the black wash painted every frame.
    pub fade_alpha: f32,
    /// A column past the bottom edge restarts when a random sample exceeds this.
    pub reset_threshold: f64,
    /// Glyph color.
    pub glyph: Fill,
    /// Recompute the column count when the viewport is resized.
    pub recompute_columns_on_resize: bool,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            cell_size: 20,
            fade_alpha: 0.05,
            reset_threshold: 0.975,
            glyph: Fill::rgb(0x8a, 0x2b, 0xe2),
            recompute_columns_on_resize: true,
        }
    }
}
