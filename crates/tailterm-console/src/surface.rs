//! Rendering surface abstraction.
//!
//! A [`Surface`] is the fixed-size character grid a host paints on: a
//! canvas, a TTY region, a widget. The console only ever asks it for its
//! current dimensions and hands it complete render windows; all output goes
//! through this seam, so tests and headless hosts plug in
//! [`CaptureSurface`] instead of a real display.

use tailterm_core::Row;

/// A fixed-size character grid that paints render windows.
pub trait Surface {
    /// Current grid height in character cells.
    fn rows(&self) -> usize;

    /// Current grid width in character cells.
    fn cols(&self) -> usize;

    /// Paint a window of exactly [`rows`](Self::rows) rows, each at most
    /// [`cols`](Self::cols) characters wide.
    fn paint(&mut self, window: &[Row]);
}

/// In-memory surface that records the last painted window.
#[derive(Debug, Clone, Default)]
pub struct CaptureSurface {
    rows: usize,
    cols: usize,
    last_window: Vec<Row>,
    paint_count: usize,
}

impl CaptureSurface {
    /// Create a capture surface with the given grid dimensions.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            last_window: Vec::new(),
            paint_count: 0,
        }
    }

    /// Change the grid dimensions, as a host would on a layout change.
    ///
    /// The console does not observe this until its `resize` is called.
    pub fn set_dims(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
    }

    /// The most recently painted window. Empty before the first paint.
    #[must_use]
    pub fn last_window(&self) -> &[Row] {
        &self.last_window
    }

    /// The text of each row in the most recently painted window.
    #[must_use]
    pub fn last_text(&self) -> Vec<String> {
        self.last_window.iter().map(|r| r.text.clone()).collect()
    }

    /// How many times [`Surface::paint`] has run.
    #[must_use]
    pub fn paint_count(&self) -> usize {
        self.paint_count
    }
}

impl Surface for CaptureSurface {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn paint(&mut self, window: &[Row]) {
        self.last_window = window.to_vec();
        self.paint_count += 1;
    }
}
