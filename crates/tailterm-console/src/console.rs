//! Console driver: wires a [`Viewport`] to a [`Surface`] and coalesces
//! repaints onto a periodic tick.
//!
//! The host owns the cadence: it forwards producer output through
//! [`Console::write`], user gestures through the scroll methods, and calls
//! [`Console::tick`] at a fixed interval. The tick repaints only when the
//! viewport is dirty, so any burst of writes between two ticks costs one
//! paint.

use std::time::Duration;

use tracing::{debug, trace};

use tailterm_core::{OutOfRangeError, ScrollbackBuffer, Viewport};

use crate::surface::Surface;

/// Cadence hosts are expected to drive [`Console::tick`] at.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Scrollback console bound to a rendering surface.
#[derive(Debug)]
pub struct Console<S: Surface> {
    viewport: Viewport,
    surface: S,
}

impl<S: Surface> Console<S> {
    /// Create a console over a default-capacity buffer, sized to the
    /// surface's current dimensions.
    pub fn new(surface: S) -> Self {
        Self::with_buffer(surface, ScrollbackBuffer::default())
    }

    /// Create a console over an explicitly configured buffer.
    pub fn with_buffer(surface: S, buffer: ScrollbackBuffer) -> Self {
        let viewport = Viewport::with_buffer(surface.rows(), surface.cols(), buffer);
        Self { viewport, surface }
    }

    /// The viewport driving this console.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The surface this console paints on.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Append producer output. The repaint happens on the next tick.
    pub fn write(&mut self, text: &str) {
        trace!(bytes = text.len(), "console write");
        self.viewport.write(text);
    }

    /// Force tail-follow and suppress user scrolling.
    pub fn lock(&mut self) {
        debug!("console locked");
        self.viewport.lock();
    }

    /// Re-enable user scrolling.
    pub fn unlock(&mut self) {
        debug!("console unlocked");
        self.viewport.unlock();
    }

    /// Scroll one step toward older content.
    pub fn scroll_up(&mut self) {
        self.viewport.scroll_up();
    }

    /// Scroll one step toward newer content.
    pub fn scroll_down(&mut self) {
        self.viewport.scroll_down();
    }

    /// Move the scroll anchor to an explicit line.
    ///
    /// # Errors
    ///
    /// [`OutOfRangeError`] when `line` is outside the buffer's live range.
    pub fn pin_line(&mut self, line: u64) -> Result<(), OutOfRangeError> {
        self.viewport.pin_line(line)
    }

    /// Re-read the surface dimensions into the viewport.
    ///
    /// Hosts call this after a layout change; the stale window is discarded
    /// and the next tick repaints at the new dimensions.
    pub fn resize(&mut self) {
        let (rows, cols) = (self.surface.rows(), self.surface.cols());
        debug!(rows, cols, "console resized");
        self.viewport.resize(rows, cols);
    }

    /// Clear all content and repaint immediately.
    ///
    /// Rebuilds the buffer with the same caps; surface dimensions are
    /// re-read in the same pass.
    pub fn reset(&mut self) {
        debug!("console reset");
        self.viewport.reset();
        self.resize();
        self.tick();
    }

    /// The periodic render step.
    ///
    /// Does nothing while the viewport is clean, which is what coalesces
    /// write bursts into a single paint. A degenerate (zero-dimension)
    /// surface is marked clean without painting. Returns whether a paint
    /// happened.
    pub fn tick(&mut self) -> bool {
        if !self.viewport.is_dirty() {
            return false;
        }
        let window = self.viewport.render_window();
        self.viewport.mark_clean();
        if window.is_empty() {
            return false;
        }
        trace!(rows = window.len(), "console paint");
        self.surface.paint(&window);
        true
    }
}
