//! Pagination.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Listing page size.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// Slice one page out of `records`.
///
/// Pages are 1-based. A page past the end yields an empty list.
pub fn paginate<'a, R>(records: &[&'a R], page: NonZeroUsize, page_size: NonZeroUsize) -> Vec<&'a R> {
    let offset = (page.get() - 1).saturating_mul(page_size.get());
    if offset >= records.len() {
        return Vec::new();
    }

    let end = offset.saturating_add(page_size.get()).min(records.len());
    records[offset..end].to_vec()
}

/// Number of pages needed for `total` records. Zero records means zero pages.
pub fn page_count(total: usize, page_size: NonZeroUsize) -> usize {
    total.div_ceil(page_size.get())
}

/// One rendered page of a listing.
#[derive(Debug, Serialize)]
pub struct PageResult<'a, R> {
    /// Records on this page, at most `page_size`.
    pub items: Vec<&'a R>,

    /// Matching records after filtering, before paging.
    pub total_count: usize,

    /// `ceil(total_count / page_size)`.
    pub page_count: usize,

    /// Requested page (1-indexed). May exceed `page_count`.
    pub page: usize,

    pub page_size: usize,

    pub has_next: bool,

    pub has_prev: bool,
}

impl<'a, R> PageResult<'a, R> {
    /// Build a result with paging calculations.
    pub fn new(
        items: Vec<&'a R>,
        total_count: usize,
        page: NonZeroUsize,
        page_size: NonZeroUsize,
    ) -> Self {
        let page_count = page_count(total_count, page_size);
        let page = page.get();

        Self {
            items,
            total_count,
            page_count,
            page,
            page_size: page_size.get(),
            has_next: page < page_count,
            has_prev: page > 1,
        }
    }

    /// True when this page has no records to show.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
