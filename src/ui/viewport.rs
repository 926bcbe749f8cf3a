//! Scroll state for the entry pane.

use std::ops::Range;

/// The window of laid-out lines currently on screen.
///
/// ```
/// use lexview::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 50);
/// vp.scroll_down(5);
/// assert_eq!(vp.visible_range(), 5..25);
/// vp.ensure_visible(40);
/// assert_eq!(vp.visible_range(), 21..41);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// `height` is the number of rows available to the entry text.
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Line indices on screen, clamped to the document.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    /// Scroll position as a percentage; a document that fits reads 100.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // Always within 0..=100.
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.height as usize / 2);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll the least amount needed to bring `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) {
        let height = self.height as usize;
        if line < self.offset {
            self.offset = line;
        } else if height > 0 && line >= self.offset + height {
            self.offset = (line + 1 - height).min(self.max_offset());
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Replace the line count after a new layout, clamping the offset.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
