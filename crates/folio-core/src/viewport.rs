//! Viewport geometry.

/// Size of the visible region in logical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Viewport covering a terminal of `cols` x `rows` cells.
    ///
    /// A terminal cell is about half as wide as it is tall, so one square
    /// glyph cell of `cell_size` logical pixels spans two columns and one row.
    pub const fn from_terminal(cols: u16, rows: u16, cell_size: u32) -> Self {
        Self {
            width: (cols as u32).saturating_mul(cell_size) / 2,
            height: (rows as u32).saturating_mul(cell_size),
        }
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
