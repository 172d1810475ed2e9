//! Category and price filters.
//!
//! Both filters keep the relative order of the records they retain.

use std::collections::BTreeSet;

use crate::query::PriceRange;
use crate::record::CatalogRecord;

/// Keep records whose category exactly matches one of `categories`.
///
/// `None` or an empty set leaves the list untouched. Records without a
/// category never match a non-empty request.
pub fn by_category<'a, R: CatalogRecord>(
    mut records: Vec<&'a R>,
    categories: Option<&BTreeSet<String>>,
) -> Vec<&'a R> {
    let Some(categories) = categories.filter(|c| !c.is_empty()) else {
        return records;
    };

    records.retain(|r| r.category().is_some_and(|c| categories.contains(c)));
    records
}

/// Keep records priced within `range` (inclusive). `None` is a no-op.
pub fn by_price<'a, R: CatalogRecord>(
    mut records: Vec<&'a R>,
    range: Option<&PriceRange>,
) -> Vec<&'a R> {
    if let Some(range) = range {
        records.retain(|r| range.contains(r.price()));
    }
    records
}
