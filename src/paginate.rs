//! Paginated list view for narrow viewports.
//!
//! On mobile the filtered project list is shown a page at a time. The
//! [`Paginator`] owns the 1-indexed current page and derives everything else
//! from the filtered item count:
//!
//! ```text
//! total_pages = ceil(total_items / page_size)
//! ```
//!
//! Navigation outside `[1, total_pages]` is rejected, which is what the
//! disabled first/prev (on page 1) and next/last (on the last page) controls
//! express. Every accepted move yields a [`ScrollRequest`] so the host can
//! bring the list back under the fixed header.
//!
//! ## Page-number controls
//!
//! Page 1 and the last page are always shown, as are the current page and its
//! immediate neighbours. Any run of hidden pages collapses to one ellipsis:
//!
//! ```text
//! total=10, current=5   →  1 … 4 [5] 6 … 10
//! total=10, current=1   →  [1] 2 … 10
//! total=4,  current=2   →  1 [2] 3 4
//! ```

use std::ops::Range;

/// Records per mobile page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// A scroll the host should perform after a page change: bring the top of
/// the list container to `header_offset` pixels below the viewport top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Page that was navigated to.
    pub page: usize,
    /// Height of the fixed overlay header, in CSS pixels.
    pub header_offset: f64,
}

impl ScrollRequest {
    /// Window scroll position for a container whose document top is `container_top`.
    pub fn target_y(&self, container_top: f64) -> f64 {
        (container_top - self.header_offset).max(0.0)
    }
}

/// One entry of the page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Rendered state of the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    /// First and previous buttons are enabled.
    pub prev_enabled: bool,
    /// Next and last buttons are enabled.
    pub next_enabled: bool,
    pub current: usize,
    pub total_pages: usize,
    pub items: Vec<PageItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paginator {
    page_size: usize,
    current: usize,
    total_items: usize,
    header_offset: f64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
            total_items: 0,
            header_offset: 0.0,
        }
    }

    pub fn with_header_offset(mut self, header_offset: f64) -> Self {
        self.header_offset = header_offset;
        self
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// The upstream filtered set changed: adopt its size and go back to page 1.
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current = 1;
    }

    /// Move to `page`. Returns `None` (and changes nothing) when `page` is
    /// outside `[1, total_pages]`.
    pub fn paginate(&mut self, page: usize) -> Option<ScrollRequest> {
        if page < 1 || page > self.total_pages() {
            return None;
        }
        self.current = page;
        Some(ScrollRequest {
            page,
            header_offset: self.header_offset,
        })
    }

    pub fn next(&mut self) -> Option<ScrollRequest> {
        self.paginate(self.current + 1)
    }

    pub fn prev(&mut self) -> Option<ScrollRequest> {
        self.paginate(self.current.saturating_sub(1))
    }

    pub fn first(&mut self) -> Option<ScrollRequest> {
        if self.current == 1 {
            return None;
        }
        self.paginate(1)
    }

    pub fn last(&mut self) -> Option<ScrollRequest> {
        let last = self.total_pages();
        if self.current == last {
            return None;
        }
        self.paginate(last)
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Item indices shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// The current page's slice of `items`. `items` should be the same
    /// filtered list the paginator was reset with.
    pub fn slice<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        let range = self.page_range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    /// Pagination bar state, or `None` when there is at most one page.
    pub fn controls(&self) -> Option<PageControls> {
        let total_pages = self.total_pages();
        if total_pages <= 1 {
            return None;
        }
        Some(PageControls {
            prev_enabled: self.has_prev(),
            next_enabled: self.has_next(),
            current: self.current,
            total_pages,
            items: page_items(self.current, total_pages),
        })
    }
}

/// Page-number strip for `current` of `total` pages.
pub fn page_items(current: usize, total: usize) -> Vec<PageItem> {
    let mut items = Vec::new();
    let mut last_shown = 0;
    for number in 1..=total {
        let shown = number == 1 || number == total || number.abs_diff(current) <= 1;
        if !shown {
            continue;
        }
        if last_shown != 0 && number > last_shown + 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page {
            number,
            current: number == current,
        });
        last_shown = number;
    }
    items
}
