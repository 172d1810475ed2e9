//! Catalog record abstraction and sort vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::query::QueryError;

/// A listable catalog entry (a bird, a product).
///
/// The pipeline only reads these accessors; identity and every other
/// attribute stay opaque.
pub trait CatalogRecord {
    /// Sort keys this entity exposes, in the order shown to users.
    const SORT_KEYS: &'static [SortKey];

    /// Category label (breed, product category). Absent on some records.
    fn category(&self) -> Option<&str>;

    /// Non-negative price.
    fn price(&self) -> f64;

    /// Display name, when the entity has one.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Record attribute a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Price,
    Category,
    Name,
}

impl SortKey {
    /// Canonical query-string spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Category => "category",
            SortKey::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = QueryError;

    /// `breed` is the bird-facing name of the category key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "category" | "breed" => Ok(SortKey::Category),
            "name" => Ok(SortKey::Name),
            _ => Err(QueryError::UnknownSortKey(s.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(QueryError::InvalidSortDirection(s.to_string())),
        }
    }
}
