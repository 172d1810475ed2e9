//! Listing pipeline: filter, sort, count, paginate.

use tracing::debug;

use crate::filter::{by_category, by_price};
use crate::page::{PageResult, paginate};
use crate::query::QuerySpec;
use crate::record::CatalogRecord;
use crate::sort::sort_records;

/// Run a listing query over records fetched from a store.
///
/// The stage order is fixed. Filtering comes first so the counts describe the
/// filtered set. Sorting comes before paging so page boundaries fall on
/// globally sorted positions.
pub fn run<'a, R: CatalogRecord>(records: &'a [R], spec: &QuerySpec) -> PageResult<'a, R> {
    let fetched = records.len();

    let matching = by_category(records.iter().collect(), spec.categories.as_ref());
    let matching = by_price(matching, spec.price_range.as_ref());
    let ordered = sort_records(matching, spec.sort.as_ref());

    let total_count = ordered.len();
    let items = paginate(&ordered, spec.page, spec.page_size);

    debug!(
        fetched,
        total_count,
        page = spec.page.get(),
        shown = items.len(),
        "catalog query evaluated"
    );

    PageResult::new(items, total_count, spec.page, spec.page_size)
}
