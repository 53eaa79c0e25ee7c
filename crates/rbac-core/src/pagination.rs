//! Page arithmetic
//!
//! Pages are 1-indexed. Requests past the last page clamp to it, so a page
//! is never empty unless the whole collection is.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Requested page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    6
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Zero-based index of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page.max(1) - 1) * self.page_size.max(1)
    }
}

/// One page cut out of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Number of pages needed for `total` items
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

impl<T> Page<T> {
    /// Slice `items` according to `request`, clamping the page number
    pub fn from_items(items: Vec<T>, request: PageRequest) -> Self {
        let request = PageRequest::new(request.page, request.page_size);
        let total = items.len();
        let last = total_pages(total, request.page_size).max(1);
        let page = request.page.min(last);
        let offset = (page - 1) * request.page_size;

        let items = items
            .into_iter()
            .skip(offset)
            .take(request.page_size)
            .collect();

        Self {
            items,
            total,
            page,
            page_size: request.page_size,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total, self.page_size)
    }

    /// 1-based position of the first item shown, 0 when empty
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based position of the last item shown, 0 when empty
    pub fn last_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_index() + self.items.len() - 1
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Page numbers to offer as navigation buttons
    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        1..=self.total_pages()
    }

    /// "Showing A to B of N entries"
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.first_index(),
            self.last_index(),
            self.total
        )
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
