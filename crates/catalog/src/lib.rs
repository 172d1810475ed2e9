//! Copsewood catalog listing pipeline.
//!
//! Turns an unordered list of catalog records fetched from a store into one
//! rendered page:
//!
//! 1. [`filter::by_category`] keeps records in the requested categories
//! 2. [`filter::by_price`] keeps records inside the requested price range
//! 3. [`sort::sort_records`] orders the survivors (stable)
//! 4. [`page::paginate`] slices out the requested page
//!
//! [`pipeline::run`] wires the stages together in that order. Request
//! parameters are parsed and validated into a [`QuerySpec`] before the
//! pipeline runs; the stages themselves cannot fail.

pub mod filter;
pub mod page;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod sort;

pub use page::{DEFAULT_PAGE_SIZE, PageResult};
pub use pipeline::run;
pub use query::{ListingParams, PriceRange, QueryError, QuerySpec, SortSpec};
pub use record::{CatalogRecord, SortDirection, SortKey};
