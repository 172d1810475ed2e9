//! Listing request parsing.
//!
//! Raw query-string values arrive as [`ListingParams`] and are validated into
//! a [`QuerySpec`]. Malformed values are rejected here with a [`QueryError`];
//! nothing is silently coerced, so the pipeline stages only ever see
//! well-formed input.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::page::DEFAULT_PAGE_SIZE;
use crate::record::{CatalogRecord, SortDirection, SortKey};

/// Token that leaves a price bound open (`price=* 40`).
pub const OPEN_BOUND: &str = "*";

/// Errors produced while parsing listing parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("invalid price bound: {0:?}")]
    InvalidPrice(String),

    #[error("price range minimum {min} exceeds maximum {max}")]
    InvertedPriceRange { min: f64, max: f64 },

    #[error("invalid page number: {0:?}")]
    InvalidPage(String),

    #[error("unknown sort field: {0:?}")]
    UnknownSortKey(String),

    #[error("this listing cannot be sorted by {0}")]
    UnsupportedSortKey(SortKey),

    #[error("invalid sort direction: {0:?}")]
    InvalidSortDirection(String),

    #[error("too many values for {param}: {value:?}")]
    TooManyTokens { param: &'static str, value: String },
}

/// Raw listing parameters as they appear in the query string.
///
/// `categories`: comma- or whitespace-delimited labels.
/// `price`: `"min max"`, either bound may be `*`; a single token is a minimum.
/// `sortby`: `"field"` or `"field direction"`.
/// `page`: 1-based decimal page number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingParams {
    pub categories: Option<String>,
    pub price: Option<String>,
    pub sortby: Option<String>,
    pub page: Option<String>,
}

/// Inclusive price bounds. `None` leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Whether `price` lies within the bounds.
    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price <= max)
    }
}

/// Requested ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// Validated listing request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    /// Match-any category set. `None` disables the filter.
    pub categories: Option<BTreeSet<String>>,
    pub price_range: Option<PriceRange>,
    pub sort: Option<SortSpec>,
    pub page: NonZeroUsize,
    pub page_size: NonZeroUsize,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            categories: None,
            price_range: None,
            sort: None,
            page: NonZeroUsize::MIN,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QuerySpec {
    /// Parse and validate raw parameters for a listing of `R` records.
    ///
    /// Sort keys are checked against `R::SORT_KEYS`. Empty parameters are
    /// treated as absent.
    pub fn from_params<R: CatalogRecord>(params: &ListingParams) -> Result<Self, QueryError> {
        let categories = params.categories.as_deref().and_then(parse_categories);

        let price_range = match params.price.as_deref() {
            Some(raw) => parse_price(raw)?,
            None => None,
        };

        let sort = match params.sortby.as_deref() {
            Some(raw) => parse_sort::<R>(raw)?,
            None => None,
        };

        let page = match params.page.as_deref() {
            Some(raw) => parse_page(raw)?,
            None => NonZeroUsize::MIN,
        };

        Ok(Self {
            categories,
            price_range,
            sort,
            page,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = categories.into_iter().map(Into::into).collect();
        self.categories = (!set.is_empty()).then_some(set);
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn with_sort(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec::new(key, direction));
        self
    }

    pub fn with_page(mut self, page: NonZeroUsize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }
}

fn parse_categories(raw: &str) -> Option<BTreeSet<String>> {
    let set: BTreeSet<String> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    (!set.is_empty()).then_some(set)
}

fn parse_price(raw: &str) -> Result<Option<PriceRange>, QueryError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    let (min, max) = match tokens.as_slice() {
        [] => return Ok(None),
        [min] => (parse_bound(min)?, None),
        [min, max] => (parse_bound(min)?, parse_bound(max)?),
        _ => {
            return Err(QueryError::TooManyTokens {
                param: "price",
                value: raw.to_string(),
            });
        }
    };

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(QueryError::InvertedPriceRange { min, max });
        }
    }

    if min.is_none() && max.is_none() {
        return Ok(None);
    }

    Ok(Some(PriceRange::new(min, max)))
}

fn parse_bound(token: &str) -> Result<Option<f64>, QueryError> {
    if token == OPEN_BOUND {
        return Ok(None);
    }

    // `f64::from_str` accepts "NaN" and "inf"; neither is a usable bound.
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(QueryError::InvalidPrice(token.to_string())),
    }
}

fn parse_sort<R: CatalogRecord>(raw: &str) -> Result<Option<SortSpec>, QueryError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();

    let (field, direction) = match tokens.as_slice() {
        [] => return Ok(None),
        [field] => (*field, None),
        [field, direction] => (*field, Some(*direction)),
        _ => {
            return Err(QueryError::TooManyTokens {
                param: "sortby",
                value: raw.to_string(),
            });
        }
    };

    let key: SortKey = field.parse()?;

    if !R::SORT_KEYS.contains(&key) {
        return Err(QueryError::UnsupportedSortKey(key));
    }

    let direction = match direction {
        Some(d) => d.parse()?,
        None => SortDirection::Asc,
    };

    Ok(Some(SortSpec::new(key, direction)))
}

fn parse_page(raw: &str) -> Result<NonZeroUsize, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(NonZeroUsize::MIN);
    }

    trimmed
        .parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| QueryError::InvalidPage(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    struct Bird;

    impl CatalogRecord for Bird {
        const SORT_KEYS: &'static [SortKey] = &[SortKey::Price, SortKey::Category];

        fn category(&self) -> Option<&str> {
            None
        }

        fn price(&self) -> f64 {
            0.0
        }
    }

    fn params(categories: &str, price: &str, sortby: &str, page: &str) -> ListingParams {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ListingParams {
            categories: opt(categories),
            price: opt(price),
            sortby: opt(sortby),
            page: opt(page),
        }
    }

    #[test]
    fn empty_params_yield_defaults() {
        let spec = QuerySpec::from_params::<Bird>(&ListingParams::default()).unwrap();
        assert_eq!(spec, QuerySpec::default());
        assert_eq!(spec.page.get(), 1);
        assert_eq!(spec.page_size.get(), 10);
    }

    #[test]
    fn categories_split_on_commas_and_spaces() {
        let spec = QuerySpec::from_params::<Bird>(&params("Budgie, Canary  Finch", "", "", ""))
            .unwrap();
        let cats: Vec<_> = spec.categories.unwrap().into_iter().collect();
        assert_eq!(cats, vec!["Budgie", "Canary", "Finch"]);
    }

    #[test]
    fn blank_categories_disable_the_filter() {
        let spec = QuerySpec::from_params::<Bird>(&params(" , ", "", "", "")).unwrap();
        assert!(spec.categories.is_none());
    }

    #[test]
    fn price_range_with_both_bounds() {
        let spec = QuerySpec::from_params::<Bird>(&params("", "10 40", "", "")).unwrap();
        assert_eq!(spec.price_range, Some(PriceRange::new(Some(10.0), Some(40.0))));
    }

    #[test]
    fn price_range_open_bounds() {
        let spec = QuerySpec::from_params::<Bird>(&params("", "* 40", "", "")).unwrap();
        assert_eq!(spec.price_range, Some(PriceRange::new(None, Some(40.0))));

        let spec = QuerySpec::from_params::<Bird>(&params("", "25", "", "")).unwrap();
        assert_eq!(spec.price_range, Some(PriceRange::new(Some(25.0), None)));

        let spec = QuerySpec::from_params::<Bird>(&params("", "* *", "", "")).unwrap();
        assert_eq!(spec.price_range, None);
    }

    #[test]
    fn price_rejects_non_numeric_tokens() {
        let err = QuerySpec::from_params::<Bird>(&params("", "ten 40", "", "")).unwrap_err();
        assert_eq!(err, QueryError::InvalidPrice("ten".to_string()));

        let err = QuerySpec::from_params::<Bird>(&params("", "NaN 40", "", "")).unwrap_err();
        assert_eq!(err, QueryError::InvalidPrice("NaN".to_string()));
    }

    #[test]
    fn price_rejects_inverted_and_overlong_ranges() {
        let err = QuerySpec::from_params::<Bird>(&params("", "50 10", "", "")).unwrap_err();
        assert_eq!(err, QueryError::InvertedPriceRange { min: 50.0, max: 10.0 });

        let err = QuerySpec::from_params::<Bird>(&params("", "1 2 3", "", "")).unwrap_err();
        assert!(matches!(err, QueryError::TooManyTokens { param: "price", .. }));
    }

    #[test]
    fn sortby_defaults_to_ascending() {
        let spec = QuerySpec::from_params::<Bird>(&params("", "", "price", "")).unwrap();
        assert_eq!(spec.sort, Some(SortSpec::new(SortKey::Price, SortDirection::Asc)));

        let spec = QuerySpec::from_params::<Bird>(&params("", "", "breed desc", "")).unwrap();
        assert_eq!(spec.sort, Some(SortSpec::new(SortKey::Category, SortDirection::Desc)));
    }

    #[test]
    fn sortby_rejects_keys_the_entity_lacks() {
        let err = QuerySpec::from_params::<Bird>(&params("", "", "name", "")).unwrap_err();
        assert_eq!(err, QueryError::UnsupportedSortKey(SortKey::Name));

        let err = QuerySpec::from_params::<Bird>(&params("", "", "colour", "")).unwrap_err();
        assert_eq!(err, QueryError::UnknownSortKey("colour".to_string()));

        let err = QuerySpec::from_params::<Bird>(&params("", "", "price sideways", "")).unwrap_err();
        assert_eq!(err, QueryError::InvalidSortDirection("sideways".to_string()));
    }

    #[test]
    fn page_must_be_positive_integer() {
        let spec = QuerySpec::from_params::<Bird>(&params("", "", "", "3")).unwrap();
        assert_eq!(spec.page.get(), 3);

        for bad in ["0", "-1", "two", "1.5"] {
            let err = QuerySpec::from_params::<Bird>(&params("", "", "", bad)).unwrap_err();
            assert_eq!(err, QueryError::InvalidPage(bad.to_string()));
        }
    }

    #[test]
    fn price_range_contains_is_inclusive() {
        let range = PriceRange::new(Some(10.0), Some(40.0));
        assert!(range.contains(10.0));
        assert!(range.contains(40.0));
        assert!(!range.contains(9.99));
        assert!(!range.contains(40.01));
        assert!(PriceRange::default().contains(1_000_000.0));
    }
}
