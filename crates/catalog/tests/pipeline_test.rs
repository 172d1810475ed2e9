#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Listing pipeline integration tests.
//!
//! Exercise the full filter → sort → count → paginate chain through the
//! public API, starting from raw query-string values.

use std::num::NonZeroUsize;

use copsewood_catalog::{
    CatalogRecord, ListingParams, PageResult, PriceRange, QuerySpec, SortDirection, SortKey, run,
};

#[derive(Debug, Clone, PartialEq)]
struct Listing {
    id: usize,
    category: Option<String>,
    price: f64,
}

impl CatalogRecord for Listing {
    const SORT_KEYS: &'static [SortKey] = &[SortKey::Price, SortKey::Category];

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn price(&self) -> f64 {
        self.price
    }
}

fn listing(id: usize, category: Option<&str>, price: f64) -> Listing {
    Listing {
        id,
        category: category.map(str::to_string),
        price,
    }
}

fn ids(page: &PageResult<'_, Listing>) -> Vec<usize> {
    page.items.iter().map(|l| l.id).collect()
}

fn nz(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

// -------------------------------------------------------------------------
// Scenarios
// -------------------------------------------------------------------------

#[test]
fn price_window_leaves_a_single_page() {
    // Prices 5, 10, ..., 60.
    let records: Vec<Listing> = (1..=12).map(|i| listing(i, None, 5.0 * i as f64)).collect();

    let params = ListingParams {
        price: Some("10 40".to_string()),
        sortby: Some("price asc".to_string()),
        page: Some("2".to_string()),
        ..Default::default()
    };
    let spec = QuerySpec::from_params::<Listing>(&params).unwrap();
    let page = run(&records, &spec);

    assert_eq!(page.total_count, 7);
    assert_eq!(page.page_count, 1);
    assert!(page.items.is_empty());
    assert!(!page.has_next);
    assert!(page.has_prev);

    let first = run(&records, &spec.clone().with_page(nz(1)));
    let prices: Vec<f64> = first.items.iter().map(|l| l.price).collect();
    assert_eq!(prices, vec![10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0]);
}

#[test]
fn category_request_preserves_input_order() {
    let records = vec![
        listing(1, Some("A"), 1.0),
        listing(2, Some("A"), 2.0),
        listing(3, Some("B"), 3.0),
        listing(4, Some("B"), 4.0),
        listing(5, Some("C"), 5.0),
    ];

    let params = ListingParams {
        categories: Some("A,C".to_string()),
        ..Default::default()
    };
    let spec = QuerySpec::from_params::<Listing>(&params).unwrap();
    let page = run(&records, &spec);

    assert_eq!(page.total_count, 3);
    assert_eq!(ids(&page), vec![1, 2, 5]);
}

#[test]
fn empty_catalog_yields_empty_pages() {
    let records: Vec<Listing> = Vec::new();

    for p in [1, 2, 50] {
        let spec = QuerySpec::default().with_page(nz(p));
        let page = run(&records, &spec);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.page_count, 0);
        assert!(page.items.is_empty());
    }
}

// -------------------------------------------------------------------------
// Composition order
// -------------------------------------------------------------------------

#[test]
fn counts_reflect_filtered_set() {
    let records: Vec<Listing> = (0..35)
        .map(|i| listing(i, Some(if i % 2 == 0 { "Even" } else { "Odd" }), i as f64))
        .collect();

    let spec = QuerySpec::default().with_categories(["Even"]);
    let page = run(&records, &spec);

    assert_eq!(page.total_count, 18);
    assert_eq!(page.page_count, 2);
    assert_eq!(page.items.len(), 10);
}

#[test]
fn page_boundaries_follow_global_sort() {
    // Input is descending by price; the second page of an ascending sort must
    // hold the 11th..20th cheapest records, not a locally sorted slice.
    let records: Vec<Listing> = (0..25).rev().map(|i| listing(i, None, i as f64)).collect();

    let spec = QuerySpec::default()
        .with_sort(SortKey::Price, SortDirection::Asc)
        .with_page(nz(2));
    let page = run(&records, &spec);

    assert_eq!(ids(&page), (10..20).collect::<Vec<_>>());
}

#[test]
fn all_pages_concatenate_to_filtered_sorted_list() {
    let records: Vec<Listing> = (0..47)
        .map(|i| listing(i, Some("X"), ((i * 37) % 50) as f64))
        .collect();

    let base = QuerySpec::default()
        .with_price_range(PriceRange::new(Some(5.0), Some(45.0)))
        .with_sort(SortKey::Price, SortDirection::Desc)
        .with_page_size(nz(7));

    let first = run(&records, &base);
    let mut collected = Vec::new();
    for p in 1..=first.page_count {
        let page = run(&records, &base.clone().with_page(nz(p)));
        collected.extend(page.items);
    }

    assert_eq!(collected.len(), first.total_count);
    assert!(collected.windows(2).all(|w| w[0].price >= w[1].price));
    assert!(collected.iter().all(|l| (5.0..=45.0).contains(&l.price)));

    let beyond = run(&records, &base.clone().with_page(nz(first.page_count + 1)));
    assert!(beyond.items.is_empty());
}
