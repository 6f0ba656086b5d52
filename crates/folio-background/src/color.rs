//! Color utility functions.

use ratatui::style::Color;

/// Linear blend from `from` to `to`; `t` is clamped to `0.0..=1.0`.
///
/// Colors without a known RGB value snap to whichever end is closer.
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (rgb(from), rgb(to)) {
        (Some((r1, g1, b1)), Some((r2, g2, b2))) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

/// Fade `color` toward black; `opacity` 1.0 leaves it unchanged.
pub fn fade(color: Color, opacity: f32) -> Color {
    blend(Color::Black, color, opacity)
}

fn rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Black => Some((0, 0, 0)),
        Color::DarkGray => Some((85, 85, 85)),
        Color::Gray => Some((170, 170, 170)),
        Color::White => Some((255, 255, 255)),
        _ => None,
    }
}
