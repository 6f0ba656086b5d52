//! Matrix rain animation (stateful).

use folio_core::{
    CapabilityError, Fill, Font, FrameRequest, Host, RainConfig, ResizeSubscription, Surface,
    SurfaceProvider, Viewport,
};
use tracing::debug;

use crate::{RandomSource, chars::random_glyph};

/// Cursor of a single glyph column, in cell rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropColumn {
    pub row: u32,
}

impl Default for DropColumn {
    fn default() -> Self {
        Self { row: 1 }
    }
}

/// Running matrix rain bound to a drawing surface.
///
/// The animation owns its pending frame request and its resize subscription.
/// Both are handed back to the host together by [`MatrixRain::unmount`].
#[derive(Debug)]
pub struct MatrixRain<S> {
    surface: S,
    columns: Vec<DropColumn>,
    config: RainConfig,
    pending_frame: FrameRequest,
    resize: ResizeSubscription,
}

impl<S: Surface> MatrixRain<S> {
    /// Acquire a surface covering the viewport and start animating.
    ///
    /// Nothing is registered with the host if the surface is unavailable.
    pub fn mount(
        host: &mut impl Host,
        surfaces: &mut impl SurfaceProvider<Surface = S>,
        config: RainConfig,
    ) -> Result<Self, CapabilityError> {
        let viewport = host.viewport();
        let surface = surfaces.acquire_surface(viewport)?;
        let columns = vec![DropColumn::default(); column_count(viewport, config.cell_size)];
        debug!(?viewport, columns = columns.len(), "matrix rain mounted");

        Ok(Self {
            surface,
            columns,
            config,
            pending_frame: host.request_frame(),
            resize: host.subscribe_resize(),
        })
    }

    /// Run one frame if `request` is the pending one, then request the next.
    /// Returns whether a frame was drawn.
    pub fn on_frame(
        &mut self,
        host: &mut impl Host,
        request: FrameRequest,
        random: &mut impl RandomSource,
    ) -> bool {
        if request != self.pending_frame {
            return false;
        }
        self.step(random);
        self.pending_frame = host.request_frame();
        true
    }

    /// Paint one frame.
    pub fn step(&mut self, random: &mut impl RandomSource) {
        let Viewport { width, height } = self.surface.size();
        let cell = self.config.cell_size;

        self.surface
            .set_fill(Fill::BLACK.with_alpha(self.config.fade_alpha));
        self.surface.fill_rect(0, 0, width, height);

        self.surface.set_fill(self.config.glyph);
        self.surface.set_font(Font::monospace(cell));

        let mut text = [0u8; 4];
        for (i, column) in self.columns.iter_mut().enumerate() {
            let glyph = random_glyph(random);
            let y = column.row.saturating_mul(cell);
            self.surface
                .fill_text(glyph.encode_utf8(&mut text), i as u32 * cell, y);

            // Stagger restarts so columns don't all return to the top at once.
            if y > height && random.next_unit() > self.config.reset_threshold {
                column.row = 0;
            }
            column.row = column.row.saturating_add(1);
        }
    }

    /// Handle a resize notification for this animation's subscription.
    pub fn on_resize(&mut self, subscription: ResizeSubscription, viewport: Viewport) {
        if subscription != self.resize {
            return;
        }
        self.surface.resize(viewport);
        if self.config.recompute_columns_on_resize {
            let count = column_count(viewport, self.config.cell_size);
            self.columns.resize(count, DropColumn::default());
        }
        debug!(?viewport, columns = self.columns.len(), "matrix rain resized");
    }

    /// Cancel the pending frame and drop the resize subscription.
    pub fn unmount(self, host: &mut impl Host) {
        host.cancel_frame(self.pending_frame);
        host.unsubscribe_resize(self.resize);
        debug!("matrix rain unmounted");
    }

    /// Change the glyph color for subsequent frames.
    pub fn set_glyph(&mut self, glyph: Fill) {
        self.config.glyph = glyph;
    }

    pub fn columns(&self) -> &[DropColumn] {
        &self.columns
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

fn column_count(viewport: Viewport, cell_size: u32) -> usize {
    (viewport.width / cell_size.max(1)) as usize
}
