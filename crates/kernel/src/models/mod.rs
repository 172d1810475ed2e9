//! Catalog records and administrator accounts.

pub mod admin;
pub mod bird;
pub mod product;
pub mod validation;

pub use admin::{Admin, AdminFields, AdminInput};
pub use bird::{Bird, BirdFields, BirdInput};
pub use product::{Product, ProductFields, ProductInput};
pub use validation::ValidationErrors;
