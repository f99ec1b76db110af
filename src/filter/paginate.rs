//! Incremental reveal of a filtered list ("infinite scroll").

use crate::filter::FilterState;

/// Items revealed per step when no page size is given.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Distance from the list's end (in pixels) at which the next page is appended.
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 300.0;

/// Scroll position of the list container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub offset: f64,
    /// Height of the visible area.
    pub viewport: f64,
    /// Full height of the rendered content.
    pub content: f64,
}

impl ScrollMetrics {
    pub fn remaining(&self) -> f64 {
        (self.content - self.offset - self.viewport).max(0.0)
    }
}

/// Tracks how many items of the current filtered list are revealed.
///
/// The revealed count only grows while the filter stays the same, and snaps back to one page
/// as soon as [`sync_filter`](Self::sync_filter) sees a different filter.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: usize,
    visible: usize,
    threshold: f64,
    filter: Option<FilterState>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A paginator revealing `page_size` items per step (at least one).
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            visible: page_size,
            threshold: DEFAULT_SCROLL_THRESHOLD,
            filter: None,
        }
    }

    /// Overrides the scroll-proximity threshold.
    #[must_use]
    pub fn with_threshold(mut self, px: f64) -> Self {
        self.threshold = px.max(0.0);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current reveal limit (may exceed the list length).
    pub fn limit(&self) -> usize {
        self.visible
    }

    /// The revealed prefix of `items`.
    pub fn page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.visible.min(items.len())]
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }

    /// Reveals the next page. Returns `false` when everything is already shown.
    pub fn load_more(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.visible = self.visible.saturating_add(self.page_size);
        true
    }

    /// Scroll trigger: appends a page once the user is within the threshold of the end.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, total: usize) -> bool {
        metrics.remaining() <= self.threshold && self.load_more(total)
    }

    /// Intersection trigger: the sentinel at the list's tail became visible.
    pub fn on_tail_visible(&mut self, total: usize) -> bool {
        self.load_more(total)
    }

    /// Back to a single page.
    pub fn reset(&mut self) {
        self.visible = self.page_size;
    }

    /// Resets when `filter` differs from the last one seen. Returns whether it reset.
    pub fn sync_filter(&mut self, filter: &FilterState) -> bool {
        if self.filter.as_ref() == Some(filter) {
            return false;
        }
        let had_previous = self.filter.is_some();
        self.filter = Some(filter.clone());
        self.reset();
        had_previous
    }
}
