/// Rows exposed before the first scroll
pub const DEFAULT_INITIAL_ROWS: usize = 10;

/// Rows added per scroll-to-bottom
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

/// Slack allowed when deciding the viewport touches the bottom
pub const DEFAULT_SCROLL_TOLERANCE: f64 = 1.0;

/// Geometry of a scrollable viewport at the time of a scroll event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_offset: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_offset: f64, viewport_height: f64, content_height: f64) -> Self {
        Self {
            scroll_offset,
            viewport_height,
            content_height,
        }
    }

    /// True once the remaining content fits in the viewport, give or take
    /// `tolerance`
    pub fn is_at_bottom(&self, tolerance: f64) -> bool {
        self.content_height - self.scroll_offset <= self.viewport_height + tolerance
    }
}

/// Prefix length of the ordered view that is handed to the renderer.
///
/// The count only grows on scroll and is never capped; callers clamp with
/// [`PageWindow::visible`] or [`PageWindow::slice`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    initial: usize,
    increment: usize,
    tolerance: f64,
    visible_count: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(
            DEFAULT_INITIAL_ROWS,
            DEFAULT_ROWS_PER_PAGE,
            DEFAULT_SCROLL_TOLERANCE,
        )
    }
}

impl PageWindow {
    pub fn new(initial: usize, increment: usize, tolerance: f64) -> Self {
        Self {
            initial,
            increment,
            tolerance,
            visible_count: initial,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Expose one more page
    pub fn grow(&mut self) {
        self.visible_count = self.visible_count.saturating_add(self.increment);
    }

    /// Grow when the scroll reached the bottom. Returns whether it grew.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        if metrics.is_at_bottom(self.tolerance) {
            self.grow();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.visible_count = self.initial;
    }

    /// Number of rows to render out of `len`
    pub fn visible(&self, len: usize) -> usize {
        self.visible_count.min(len)
    }

    /// The exposed prefix of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible(items.len())]
    }
}
