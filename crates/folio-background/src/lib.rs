//! Matrix rain background for the folio portfolio.
//!
//! The rain is an immediate-mode animation: every frame washes the whole
//! drawing surface with translucent black and paints one glyph per column, so
//! earlier glyphs fade into trails instead of being cleared. [`CellSurface`]
//! is the terminal drawing surface it paints on.

mod chars;
mod color;
mod rain;
mod random;
mod surface;

pub use color::{blend, fade};
pub use rain::{DropColumn, MatrixRain};
pub use random::{RandomSource, seeded};
pub use surface::{CellSurface, CellSurfaces};
