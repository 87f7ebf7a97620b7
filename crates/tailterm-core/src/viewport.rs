//! Viewport: grid dimensions, dirty/locked state, and the wrap-aware render
//! window over a [`ScrollbackBuffer`].
//!
//! The viewport owns the buffer and is the only writer to it. It renders in
//! one of two modes, derived from the buffer's pin rather than stored here:
//! tail-pinned (bottom-anchored, newest content visible) or scrolled back
//! (top-anchored at the pinned line).

use std::fmt;

use bitflags::bitflags;

use crate::scrollback::{OutOfRangeError, ScrollbackBuffer};

bitflags! {
    /// Viewport state flags orthogonal to the buffer contents.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ViewportFlags: u8 {
        /// Rendered output may be stale; the next render tick should repaint.
        const DIRTY = 1 << 0;
        /// User scrolling is suppressed while programmatic output runs.
        const LOCKED = 1 << 1;
    }
}

/// One wrapped, fixed-width slice of a logical line — the unit painted to
/// the display grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Backing logical line, or `None` for a padding row emitted when there
    /// is not enough buffered text to fill the requested grid.
    pub line: Option<u64>,
    /// Offset within the backing line where this row begins.
    pub column: usize,
    /// The wrapped slice. At most `cols` characters; empty for padding rows
    /// and for rows backed by an empty line.
    pub text: String,
}

impl Row {
    fn padding() -> Self {
        Self {
            line: None,
            column: 0,
            text: String::new(),
        }
    }

    /// Whether this row has no backing line.
    #[must_use]
    pub fn is_padding(&self) -> bool {
        self.line.is_none()
    }
}

/// Error returned by [`Viewport::window`] for a zero dimension.
///
/// A zero-row or zero-column window has no defined row count; callers are
/// expected to skip rendering degenerate surfaces instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDimensionsError {
    /// Requested row count.
    pub rows: usize,
    /// Requested column count.
    pub cols: usize,
}

impl fmt::Display for InvalidDimensionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "window dimensions must be nonzero (got {} rows x {} cols)",
            self.rows, self.cols
        )
    }
}

impl std::error::Error for InvalidDimensionsError {}

/// Scroll anchor and render window over a scrollback buffer.
///
/// `rows`/`cols` track the hosting surface and are refreshed through
/// [`resize`](Self::resize). Every mutation that could change rendered
/// output sets the dirty flag; the host's render tick checks it, paints,
/// and calls [`mark_clean`](Self::mark_clean), so bursts of writes coalesce
/// into a single repaint.
#[derive(Debug, Clone)]
pub struct Viewport {
    buffer: ScrollbackBuffer,
    rows: usize,
    cols: usize,
    flags: ViewportFlags,
}

impl Viewport {
    /// Create a viewport over a default-capacity buffer.
    ///
    /// Starts dirty so the first render tick paints the empty grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_buffer(rows, cols, ScrollbackBuffer::default())
    }

    /// Create a viewport over an explicitly configured buffer.
    #[must_use]
    pub fn with_buffer(rows: usize, cols: usize, buffer: ScrollbackBuffer) -> Self {
        Self {
            buffer,
            rows,
            cols,
            flags: ViewportFlags::DIRTY,
        }
    }

    /// Grid height in character cells.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grid width in character cells.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The underlying line store.
    #[must_use]
    pub fn buffer(&self) -> &ScrollbackBuffer {
        &self.buffer
    }

    /// Whether rendered output may be stale.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.flags.contains(ViewportFlags::DIRTY)
    }

    /// Whether user scrolling is currently suppressed.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.flags.contains(ViewportFlags::LOCKED)
    }

    /// Clear the dirty flag after a repaint.
    pub fn mark_clean(&mut self) {
        self.flags.remove(ViewportFlags::DIRTY);
    }

    /// Append producer output to the buffer and mark the viewport dirty.
    ///
    /// Not gated on the lock: the lock suppresses user scrolling, never
    /// programmatic writes.
    pub fn write(&mut self, text: &str) {
        self.buffer.write(text);
        self.flags.insert(ViewportFlags::DIRTY);
    }

    /// Record new surface dimensions and mark dirty.
    ///
    /// Zero dimensions are accepted — a surface may be degenerate before its
    /// first layout. [`window`](Self::window) is where zero is rejected.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.flags.insert(ViewportFlags::DIRTY);
    }

    /// Replace the buffer with a fresh empty one using the same caps.
    ///
    /// The lock flag survives a reset; the dirty flag is set so the next
    /// tick paints the cleared grid.
    pub fn reset(&mut self) {
        self.buffer = ScrollbackBuffer::with_max_line_len(
            self.buffer.target_size(),
            self.buffer.max_line_len(),
        );
        self.flags.insert(ViewportFlags::DIRTY);
    }

    /// Move the scroll anchor to an explicit line.
    ///
    /// # Errors
    ///
    /// [`OutOfRangeError`] when `line` is outside the buffer's live range.
    pub fn pin_line(&mut self, line: u64) -> Result<(), OutOfRangeError> {
        self.buffer.pin_line(line)?;
        self.flags.insert(ViewportFlags::DIRTY);
        Ok(())
    }

    // ── Render window ───────────────────────────────────────────────

    /// Compute a render window of exactly `rows` rows wrapped to `cols`.
    ///
    /// Tail-pinned buffers render bottom-anchored: the window walks back
    /// from the pin far enough to fill the grid after wrapping, and the
    /// last `rows` wrapped rows are returned. Scrolled-back buffers render
    /// top-anchored starting at the pinned line. Missing content is padded
    /// with [`Row::is_padding`] rows.
    ///
    /// # Errors
    ///
    /// [`InvalidDimensionsError`] when `rows` or `cols` is zero.
    pub fn window(&self, rows: usize, cols: usize) -> Result<Vec<Row>, InvalidDimensionsError> {
        if rows == 0 || cols == 0 {
            return Err(InvalidDimensionsError { rows, cols });
        }
        Ok(self.compute_window(rows, cols))
    }

    /// Window at the viewport's own dimensions.
    ///
    /// Returns an empty vector when either dimension is zero — the caller
    /// has nothing to paint on a degenerate surface.
    #[must_use]
    pub fn render_window(&self) -> Vec<Row> {
        if self.rows == 0 || self.cols == 0 {
            return Vec::new();
        }
        self.compute_window(self.rows, self.cols)
    }

    fn compute_window(&self, rows: usize, cols: usize) -> Vec<Row> {
        let pinned_to_end = self.buffer.is_tail_pinned();
        let start = self.buffer.start_line();
        let end = self.buffer.end_line();

        // Pick the first line to wrap. Bottom-anchored windows walk back
        // until enough raw characters exist upstream of the tail to fill
        // the grid; characters-per-row over-approximates the wrapped row
        // count, so the walk never stops short.
        let mut begin = self.buffer.pinned_line();
        if pinned_to_end {
            let max_chars = rows * cols;
            let mut char_count = self.line_len(begin);
            while char_count < max_chars && begin > start {
                begin -= 1;
                char_count += self.line_len(begin);
            }
        }

        let mut out = Vec::with_capacity(rows);
        loop {
            self.wrap_line(begin, cols, &mut out);
            if begin == end {
                break;
            }
            if !pinned_to_end && out.len() >= rows {
                break;
            }
            begin += 1;
        }

        // Bottom-anchored windows keep the newest rows against the bottom
        // edge, so padding goes on top; top-anchored windows pad below.
        if pinned_to_end {
            while out.len() < rows {
                out.insert(0, Row::padding());
            }
            out.split_off(out.len() - rows)
        } else {
            while out.len() < rows {
                out.push(Row::padding());
            }
            out.truncate(rows);
            out
        }
    }

    /// Wrap one logical line into `cols`-wide rows.
    ///
    /// Full chunks become one row each; a trailing remainder gets its own
    /// row, as does a line with no characters at all — an empty line still
    /// occupies exactly one visual row.
    fn wrap_line(&self, index: u64, cols: usize, out: &mut Vec<Row>) {
        let Some(line) = self.buffer.line(index) else {
            return;
        };
        let cells = line.cells();
        if cells.is_empty() {
            out.push(Row {
                line: Some(index),
                column: 0,
                text: String::new(),
            });
            return;
        }
        let mut offset = 0;
        while offset < cells.len() {
            let chunk_end = (offset + cols).min(cells.len());
            out.push(Row {
                line: Some(index),
                column: offset,
                text: cells[offset..chunk_end].iter().collect(),
            });
            offset = chunk_end;
        }
    }

    fn line_len(&self, index: u64) -> usize {
        self.buffer.line(index).map_or(0, crate::scrollback::Line::len)
    }

    // ── Scroll policy ───────────────────────────────────────────────

    /// Scroll one step toward older content.
    ///
    /// No-op while locked. From the tail, the anchor moves to the line
    /// backing the current window's first row; when that row starts at
    /// column 0 the anchor steps one line further back, otherwise moving
    /// the pin would reveal nothing new above the previous view. From
    /// scrollback, the anchor steps back one line until it hits the oldest.
    pub fn scroll_up(&mut self) {
        if self.flags.contains(ViewportFlags::LOCKED) {
            return;
        }
        if self.buffer.is_tail_pinned() {
            if self.rows == 0 || self.cols == 0 {
                return;
            }
            let window = self.compute_window(self.rows, self.cols);
            let Some(first) = window.first() else {
                return;
            };
            let Some(line) = first.line else {
                // Padding on top: the whole buffer already fits.
                return;
            };
            self.buffer.set_pin(line);
            if first.column == 0 && line > self.buffer.start_line() {
                self.buffer.set_pin(line - 1);
            }
        } else if self.buffer.pinned_line() > self.buffer.start_line() {
            self.buffer.set_pin(self.buffer.pinned_line() - 1);
        }
        self.flags.insert(ViewportFlags::DIRTY);
    }

    /// Scroll one step toward newer content.
    ///
    /// No-op while locked or already tail-pinned. Near the end of the
    /// buffer, once the current window already shows the newest line the
    /// anchor snaps to it and tail-following resumes; otherwise the anchor
    /// advances by exactly one line.
    pub fn scroll_down(&mut self) {
        if self.flags.contains(ViewportFlags::LOCKED) || self.buffer.is_tail_pinned() {
            return;
        }
        let end = self.buffer.end_line();
        let pinned = self.buffer.pinned_line();
        if self.rows > 0 && self.cols > 0 && pinned + self.rows as u64 > end {
            let window = self.compute_window(self.rows, self.cols);
            let newest_shown = window.iter().filter_map(|r| r.line).max();
            if newest_shown.is_some_and(|line| line >= end) {
                self.buffer.set_pin(end);
                self.flags.insert(ViewportFlags::DIRTY);
                return;
            }
        }
        self.buffer.set_pin(pinned + 1);
        self.flags.insert(ViewportFlags::DIRTY);
    }

    /// Force tail-following and suppress user scrolling.
    ///
    /// Called by the execution controller before programmatic output runs.
    pub fn lock(&mut self) {
        self.buffer.set_pin(self.buffer.end_line());
        self.flags.insert(ViewportFlags::LOCKED | ViewportFlags::DIRTY);
    }

    /// Re-enable user scrolling. The pin is left where it is.
    pub fn unlock(&mut self) {
        self.flags.remove(ViewportFlags::LOCKED);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrollback::ScrollbackBuffer;

    fn texts(window: &[Row]) -> Vec<&str> {
        window.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn window_rejects_zero_dimensions() {
        let vp = Viewport::new(5, 10);
        assert_eq!(
            vp.window(0, 10).unwrap_err(),
            InvalidDimensionsError { rows: 0, cols: 10 }
        );
        assert!(vp.window(5, 0).is_err());
    }

    #[test]
    fn window_is_exactly_rows_tall() {
        let mut vp = Viewport::new(5, 10);
        vp.write("one\ntwo");
        let window = vp.window(5, 10).unwrap();
        assert_eq!(window.len(), 5);
        assert!(window.iter().all(|r| r.text.chars().count() <= 10));
    }

    #[test]
    fn fresh_buffer_renders_padding_above_empty_line() {
        let vp = Viewport::new(3, 4);
        let window = vp.window(3, 4).unwrap();
        // Bottom-anchored: the single empty line sits at the bottom.
        assert!(window[0].is_padding());
        assert!(window[1].is_padding());
        assert_eq!(window[2].line, Some(0));
        assert_eq!(window[2].text, "");
    }

    #[test]
    fn tail_window_is_bottom_anchored() {
        let mut vp = Viewport::new(3, 5);
        for i in 0..6 {
            vp.write(&format!("l{i}\n"));
        }
        // Lines 0..=5 plus a trailing empty line 6; the tail window shows
        // the newest rows with the empty current line last.
        let window = vp.window(3, 5).unwrap();
        assert_eq!(texts(&window), vec!["l4", "l5", ""]);
        assert_eq!(window[2].line, Some(6));
    }

    #[test]
    fn scrolled_window_is_top_anchored() {
        let mut vp = Viewport::new(3, 5);
        for i in 0..6 {
            vp.write(&format!("l{i}\n"));
        }
        vp.pin_line(1).unwrap();
        let window = vp.window(3, 5).unwrap();
        assert_eq!(texts(&window), vec!["l1", "l2", "l3"]);
        assert_eq!(window[0].column, 0);
    }

    #[test]
    fn long_lines_wrap_into_column_offsets() {
        let mut vp = Viewport::new(4, 3);
        vp.write("abcdefgh");
        let window = vp.window(4, 3).unwrap();
        // 8 chars wrap to 3 rows at width 3; one padding row on top.
        assert!(window[0].is_padding());
        assert_eq!(texts(&window), vec!["", "abc", "def", "gh"]);
        assert_eq!(window[2].column, 3);
        assert_eq!(window[3].column, 6);
    }

    #[test]
    fn exact_width_line_occupies_one_row() {
        let mut vp = Viewport::new(2, 4);
        vp.write("abcd\nx");
        let window = vp.window(2, 4).unwrap();
        assert_eq!(texts(&window), vec!["abcd", "x"]);
    }

    #[test]
    fn empty_lines_occupy_one_row_each() {
        let mut vp = Viewport::new(4, 10);
        vp.write("a\n\nb");
        let window = vp.window(4, 10).unwrap();
        assert!(window[0].is_padding());
        assert_eq!(texts(&window), vec!["", "a", "", "b"]);
    }

    #[test]
    fn last_rows_of_many_short_lines() {
        let mut buf = ScrollbackBuffer::new(100);
        for _ in 0..19 {
            buf.write("x\n");
        }
        buf.write("x");
        let vp = Viewport::with_buffer(3, 5, buf);
        let window = vp.window(3, 5).unwrap();
        assert_eq!(texts(&window), vec!["x", "x", "x"]);
        assert_eq!(window[2].line, Some(19));
        assert!(vp.buffer().is_tail_pinned());
    }

    #[test]
    fn write_marks_dirty_and_mark_clean_clears() {
        let mut vp = Viewport::new(2, 2);
        vp.mark_clean();
        assert!(!vp.is_dirty());
        vp.write("a");
        assert!(vp.is_dirty());
        vp.mark_clean();
        vp.resize(3, 3);
        assert!(vp.is_dirty());
    }

    #[test]
    fn scroll_up_from_tail_pins_above_the_window() {
        let mut vp = Viewport::new(2, 10);
        for i in 0..5 {
            vp.write(&format!("l{i}\n"));
        }
        // Tail window shows l4 and the empty line 5; its first row is l4 at
        // column 0, so the pin lands one line further back, on l3.
        vp.scroll_up();
        assert_eq!(vp.buffer().pinned_line(), 3);
        assert!(!vp.buffer().is_tail_pinned());
        let window = vp.window(2, 10).unwrap();
        assert_eq!(texts(&window), vec!["l3", "l4"]);
    }

    #[test]
    fn scroll_up_from_tail_lands_on_wrap_boundary() {
        let mut vp = Viewport::new(2, 3);
        vp.write("abcdefgh\n");
        // Window is the last two rows of the wrapped line 0 ("gh" preceded
        // by "def"); the first row starts mid-line, so no extra step back.
        vp.scroll_up();
        assert_eq!(vp.buffer().pinned_line(), 0);
    }

    #[test]
    fn scroll_up_with_everything_visible_is_a_no_op() {
        let mut vp = Viewport::new(5, 10);
        vp.write("a\nb");
        vp.scroll_up();
        // Padding still tops the window: nothing above to reveal.
        assert!(vp.buffer().is_tail_pinned());
    }

    #[test]
    fn scroll_up_steps_back_through_scrollback_and_stops() {
        let mut vp = Viewport::new(2, 10);
        for i in 0..4 {
            vp.write(&format!("l{i}\n"));
        }
        vp.pin_line(1).unwrap();
        vp.scroll_up();
        assert_eq!(vp.buffer().pinned_line(), 0);
        vp.scroll_up();
        assert_eq!(vp.buffer().pinned_line(), 0);
    }

    #[test]
    fn scroll_down_steps_forward_and_snaps_to_tail() {
        let mut vp = Viewport::new(2, 10);
        for i in 0..6 {
            vp.write(&format!("l{i}\n"));
        }
        vp.pin_line(2).unwrap();
        vp.scroll_down();
        assert_eq!(vp.buffer().pinned_line(), 3);
        assert!(!vp.buffer().is_tail_pinned());
        // Step until the window reaches the newest line, then snap.
        vp.scroll_down();
        vp.scroll_down();
        assert_eq!(vp.buffer().pinned_line(), 5);
        vp.scroll_down();
        assert!(vp.buffer().is_tail_pinned());
        assert_eq!(vp.buffer().pinned_line(), 6);
    }

    #[test]
    fn scroll_down_at_tail_is_a_no_op() {
        let mut vp = Viewport::new(2, 10);
        vp.write("a\nb\n");
        vp.scroll_down();
        assert!(vp.buffer().is_tail_pinned());
    }

    #[test]
    fn lock_snaps_to_tail_and_suppresses_scrolling() {
        let mut vp = Viewport::new(2, 10);
        for i in 0..5 {
            vp.write(&format!("l{i}\n"));
        }
        vp.pin_line(1).unwrap();
        vp.lock();
        assert!(vp.is_locked());
        assert!(vp.buffer().is_tail_pinned());
        vp.scroll_up();
        assert_eq!(vp.buffer().pinned_line(), vp.buffer().end_line());
        vp.scroll_down();
        assert_eq!(vp.buffer().pinned_line(), vp.buffer().end_line());
        vp.unlock();
        assert!(!vp.is_locked());
        assert!(vp.buffer().is_tail_pinned());
        vp.scroll_up();
        assert!(!vp.buffer().is_tail_pinned());
    }

    #[test]
    fn writes_while_scrolled_back_keep_the_view_frozen() {
        let mut vp = Viewport::new(2, 10);
        for i in 0..5 {
            vp.write(&format!("l{i}\n"));
        }
        vp.scroll_up();
        let pinned = vp.buffer().pinned_line();
        vp.write("more\nand more\n");
        assert_eq!(vp.buffer().pinned_line(), pinned);
        let window = vp.window(2, 10).unwrap();
        assert_eq!(window[0].line, Some(pinned));
    }

    #[test]
    fn reset_clears_content_but_keeps_caps_and_lock() {
        let mut buf = ScrollbackBuffer::with_max_line_len(50, 5);
        buf.write("hello\nworld\n");
        let mut vp = Viewport::with_buffer(2, 10, buf);
        vp.lock();
        vp.mark_clean();
        vp.reset();
        assert!(vp.is_dirty());
        assert!(vp.is_locked());
        assert_eq!(vp.buffer().size(), 0);
        assert_eq!(vp.buffer().line_count(), 1);
        assert_eq!(vp.buffer().target_size(), 50);
        assert_eq!(vp.buffer().max_line_len(), 5);
    }

    #[test]
    fn render_window_is_empty_on_degenerate_surface() {
        let mut vp = Viewport::new(0, 0);
        vp.write("text");
        assert!(vp.render_window().is_empty());
        vp.resize(2, 2);
        assert_eq!(vp.render_window().len(), 2);
    }
}
