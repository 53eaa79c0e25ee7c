//! The user table
//!
//! Rows go through the search filter first, are then sorted on the single
//! sort key and finally cut into fixed-size pages.

use rbac_core::config::TableConfig;
use rbac_core::pagination::{Page, PageRequest};
use rbac_models::User;
use std::ops::RangeInclusive;

use crate::columns::UserColumn;
use crate::filters::SearchFilter;
use crate::sorts::SortState;

/// Interactive state of the user table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTable {
    search: SearchFilter,
    sort: SortState,
    page: usize,
    page_size: usize,
}

impl Default for UserTable {
    fn default() -> Self {
        Self::new(PageRequest::default().page_size)
    }
}

impl UserTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: SearchFilter::default(),
            sort: SortState::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Table with the configured page size
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(config.page_size)
    }

    pub fn search(&self) -> &str {
        self.search.term()
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the search term. A different term goes back to page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search.term() {
            self.search = SearchFilter::new(term);
            self.page = 1;
        }
    }

    /// Header click on `column`
    pub fn sort_by(&mut self, column: UserColumn) {
        self.sort.toggle(column);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Compute the visible page. The stored page number is clamped to the
    /// last page of the filtered rows.
    pub fn view(&mut self, users: &[User]) -> TableView {
        let mut rows = self.search.apply(users);
        self.sort.sort(&mut rows);

        let rows: Vec<User> = rows.into_iter().cloned().collect();
        let page = Page::from_items(rows, PageRequest::new(self.page, self.page_size));
        self.page = page.page;

        TableView {
            page,
            sort: self.sort,
            search: self.search.term().to_string(),
        }
    }
}

/// One rendered page of the table
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub page: Page<User>,
    pub sort: SortState,
    pub search: String,
}

impl TableView {
    pub fn columns(&self) -> &'static [UserColumn] {
        &UserColumn::ALL
    }

    pub fn rows(&self) -> &[User] {
        &self.page.items
    }

    /// Matching rows across all pages
    pub fn total(&self) -> usize {
        self.page.total
    }

    pub fn page_numbers(&self) -> RangeInclusive<usize> {
        self.page.page_numbers()
    }

    pub fn summary(&self) -> String {
        self.page.summary()
    }

    /// Cell text for each visible row, in column order
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.rows()
            .iter()
            .map(|user| UserColumn::ALL.iter().map(|c| c.value(user)).collect())
            .collect()
    }
}
