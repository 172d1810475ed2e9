//! Stable record ordering.

use std::cmp::Ordering;

use crate::query::SortSpec;
use crate::record::{CatalogRecord, SortDirection, SortKey};

/// Order records by `sort`, keeping ties in input order.
///
/// `None` returns the list as it arrived. Descending order inverts the
/// comparison rather than the output, so equal keys stay in input order in
/// both directions.
pub fn sort_records<'a, R: CatalogRecord>(
    mut records: Vec<&'a R>,
    sort: Option<&SortSpec>,
) -> Vec<&'a R> {
    let Some(spec) = sort else {
        return records;
    };

    // `sort_by` is a stable merge sort.
    records.sort_by(|a, b| {
        let ord = compare(*a, *b, spec.key);
        match spec.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    records
}

/// Compare two records on one key. Missing string keys order first.
pub fn compare<R: CatalogRecord>(a: &R, b: &R, key: SortKey) -> Ordering {
    match key {
        SortKey::Price => a.price().total_cmp(&b.price()),
        SortKey::Category => a.category().cmp(&b.category()),
        SortKey::Name => a.name().cmp(&b.name()),
    }
}
