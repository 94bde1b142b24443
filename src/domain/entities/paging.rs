//! Pagination cursor state.

/// Cursor and completion flags of the catalog pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingState {
    /// Where the next page begins; equals the number of items loaded so far.
    pub offset: usize,
    /// Entries requested per page.
    pub page_size: usize,
    /// A page fetch is in flight.
    pub is_loading: bool,
    /// More pages may exist. Once false, stays false.
    pub has_more: bool,
}

impl PagingState {
    /// Initial state for a pager with the given page size.
    #[must_use]
    pub const fn new(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size,
            is_loading: false,
            has_more: true,
        }
    }

    /// Returns whether a new batch may start now.
    #[must_use]
    pub const fn can_load(&self) -> bool {
        !self.is_loading && self.has_more
    }
}
