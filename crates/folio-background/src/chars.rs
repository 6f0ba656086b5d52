//! Glyph range for the matrix rain.

use crate::RandomSource;

/// First code point of the Katakana block.
pub const GLYPH_BASE: u32 = 0x30A0;

/// Number of code points glyphs are drawn from.
pub const GLYPH_SPAN: u32 = 96;

/// Pick a glyph from `U+30A0..U+3100`.
pub fn random_glyph(random: &mut impl RandomSource) -> char {
    let offset = (random.next_unit() * GLYPH_SPAN as f64) as u32;
    char::from_u32(GLYPH_BASE + offset.min(GLYPH_SPAN - 1)).unwrap_or('゠')
}
