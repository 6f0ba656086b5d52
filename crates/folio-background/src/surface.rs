//! Terminal drawing surface.

use folio_core::{CapabilityError, Fill, Font, Surface, SurfaceProvider, Viewport};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Cells dimmer than this are drawn as blank.
const VISIBLE_LUMA: f32 = 10.0;

#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    glyph: Option<char>,
    rgb: [f32; 3],
}

impl Cell {
    fn paint(&mut self, fill: Fill) {
        let alpha = fill.alpha.clamp(0.0, 1.0);
        for (channel, target) in self.rgb.iter_mut().zip([fill.r, fill.g, fill.b]) {
            *channel = *channel * (1.0 - alpha) + target as f32 * alpha;
        }
    }

    fn luma(&self) -> f32 {
        let [r, g, b] = self.rgb;
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

/// Grid of square glyph cells addressed in logical pixels.
///
/// Each cell spans two terminal columns and one row when rendered, which
/// also leaves room for double-width glyphs.
#[derive(Debug, Clone)]
pub struct CellSurface {
    cell_size: u32,
    size: Viewport,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    fill: Fill,
    font: Font,
}

impl CellSurface {
    /// Create a blank surface covering `size`.
    pub fn new(size: Viewport, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        let mut surface = Self {
            cell_size,
            size: Viewport::default(),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            fill: Fill::BLACK,
            font: Font::monospace(cell_size),
        };
        surface.resize(size);
        surface
    }

    /// Number of glyph columns and rows.
    pub fn grid(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Visible glyph and its color at a grid position.
    pub fn glyph_at(&self, col: usize, row: usize) -> Option<(char, Color)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let cell = &self.cells[row * self.cols + col];
        let glyph = cell.glyph?;
        if cell.luma() < VISIBLE_LUMA {
            return None;
        }
        let [r, g, b] = cell.rgb.map(|c| c.round().clamp(0.0, 255.0) as u8);
        Some((glyph, Color::Rgb(r, g, b)))
    }

    /// Font set by the last [`Surface::set_font`] call.
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Grid cells covering the pixel span `[start, start + len)`, clamped to `limit`.
    fn span(&self, start: u32, len: u32, limit: usize) -> std::ops::Range<usize> {
        let first = (start / self.cell_size) as usize;
        let last = start.saturating_add(len).div_ceil(self.cell_size) as usize;
        first.min(limit)..last.min(limit)
    }
}

impl Surface for CellSurface {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = viewport;
        self.cols = (viewport.width / self.cell_size) as usize;
        self.rows = (viewport.height / self.cell_size) as usize;
        self.cells = vec![Cell::default(); self.cols * self.rows];
    }

    fn set_fill(&mut self, fill: Fill) {
        self.fill = fill;
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let fill = self.fill;
        let opaque = fill.alpha >= 1.0;
        for row in self.span(y, height, self.rows) {
            for col in self.span(x, width, self.cols) {
                let cell = &mut self.cells[row * self.cols + col];
                cell.paint(fill);
                if opaque {
                    cell.glyph = None;
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: u32, y: u32) {
        // Baseline at the bottom edge of the row above `y / cell_size`.
        let Some(row) = ((y / self.cell_size) as usize).checked_sub(1) else {
            return;
        };
        if row >= self.rows {
            return;
        }
        let first = (x / self.cell_size) as usize;
        let fill = self.fill;
        for (col, glyph) in (first..self.cols).zip(text.chars()) {
            let cell = &mut self.cells[row * self.cols + col];
            cell.paint(fill);
            cell.glyph = Some(glyph);
        }
    }
}

impl Widget for &CellSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = area.intersection(buf.area);
        for row in 0..self.rows.min(area.height as usize) {
            for col in 0..self.cols {
                let x = area.x as usize + col * 2;
                if x + 1 >= area.right() as usize {
                    break;
                }
                if let Some((glyph, color)) = self.glyph_at(col, row) {
                    let y = area.y + row as u16;
                    buf.set_stringn(x as u16, y, glyph.to_string(), 2, Style::new().fg(color));
                }
            }
        }
    }
}

/// Provider of [`CellSurface`]s, optionally disabled.
#[derive(Debug, Clone, Copy)]
pub struct CellSurfaces {
    cell_size: u32,
    available: bool,
}

impl CellSurfaces {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size,
            available: true,
        }
    }

    /// A provider that never hands out a surface.
    pub fn unavailable() -> Self {
        Self {
            cell_size: 1,
            available: false,
        }
    }
}

impl SurfaceProvider for CellSurfaces {
    type Surface = CellSurface;

    fn acquire_surface(&mut self, viewport: Viewport) -> Result<CellSurface, CapabilityError> {
        if !self.available {
            return Err(CapabilityError::unavailable(
                "drawing surface",
                "disabled for this session",
            ));
        }
        if viewport.width < self.cell_size || viewport.height < self.cell_size {
            return Err(CapabilityError::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(CellSurface::new(viewport, self.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PURPLE: Fill = Fill::rgb(0x8a, 0x2b, 0xe2);

    #[test]
    fn test_grid_from_size() {
        let surface = CellSurface::new(Viewport::new(810, 415), 20);
        assert_eq!(surface.grid(), (40, 20));
    }

    #[test]
    fn test_text_uses_baseline() {
        let mut surface = CellSurface::new(Viewport::new(100, 100), 20);
        surface.set_fill(PURPLE);
        surface.fill_text("ア", 40, 20);
        assert_eq!(
            surface.glyph_at(2, 0),
            Some(('ア', Color::Rgb(0x8a, 0x2b, 0xe2)))
        );

        // A baseline at the top edge is off the surface.
        surface.fill_text("イ", 0, 0);
        assert_eq!(surface.glyph_at(0, 0), None);
        // So is one below the bottom.
        surface.fill_text("イ", 0, 120);
        assert_eq!(surface.glyph_at(0, 4), None);
    }

    #[test]
    fn test_translucent_wash_fades_glyphs() {
        let mut surface = CellSurface::new(Viewport::new(100, 100), 20);
        surface.set_fill(PURPLE);
        surface.fill_text("ア", 0, 20);

        surface.set_fill(Fill::BLACK.with_alpha(0.05));
        surface.fill_rect(0, 0, 100, 100);
        let Some((_, Color::Rgb(r, _, _))) = surface.glyph_at(0, 0) else {
            panic!("glyph should still be visible after one wash");
        };
        assert!(r < 0x8a);

        for _ in 0..200 {
            surface.fill_rect(0, 0, 100, 100);
        }
        assert_eq!(surface.glyph_at(0, 0), None);
    }

    #[test]
    fn test_opaque_rect_clears() {
        let mut surface = CellSurface::new(Viewport::new(100, 100), 20);
        surface.set_fill(PURPLE);
        surface.fill_text("アイ", 0, 40);
        assert!(surface.glyph_at(1, 1).is_some());

        surface.set_fill(PURPLE);
        surface.fill_rect(0, 20, 20, 20);
        assert_eq!(surface.glyph_at(0, 1), None);
        assert!(surface.glyph_at(1, 1).is_some());
    }

    #[test]
    fn test_font_follows_last_set() {
        let mut surface = CellSurface::new(Viewport::new(100, 100), 20);
        assert_eq!(surface.font().size_px, 20);
        surface.set_font(Font::monospace(12));
        assert_eq!(surface.font(), &Font::monospace(12));
    }

    #[test]
    fn test_resize_matches_viewport() {
        let mut surface = CellSurface::new(Viewport::new(800, 600), 20);
        surface.resize(Viewport::new(1024, 768));
        assert_eq!(surface.size(), Viewport::new(1024, 768));
        assert_eq!(surface.grid(), (51, 38));
    }

    #[test]
    fn test_render_to_buffer() {
        let mut surface = CellSurface::new(Viewport::new(60, 40), 20);
        surface.set_fill(PURPLE);
        surface.fill_text("ア", 20, 40);

        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        (&surface).render(area, &mut buf);
        assert_eq!(buf[(2u16, 1u16)].symbol(), "ア");
        assert_eq!(buf[(0u16, 0u16)].symbol(), " ");
    }

    #[test]
    fn test_provider_availability() {
        let viewport = Viewport::new(800, 600);
        assert!(CellSurfaces::new(20).acquire_surface(viewport).is_ok());
        assert!(matches!(
            CellSurfaces::unavailable().acquire_surface(viewport),
            Err(CapabilityError::Unavailable { .. })
        ));
        assert!(matches!(
            CellSurfaces::new(20).acquire_surface(Viewport::new(10, 600)),
            Err(CapabilityError::EmptyViewport { .. })
        ));
    }
}
