//! Product catalog record (feed, cages, accessories).

use copsewood_catalog::{CatalogRecord, SortKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{ValidationErrors, optional, parse_price};

/// A product offered for sale.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    pub name: String,

    /// Product category, when assigned.
    pub category: Option<String>,

    pub price: f64,

    pub description: String,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

impl CatalogRecord for Product {
    const SORT_KEYS: &'static [SortKey] = &[SortKey::Price, SortKey::Name, SortKey::Category];

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Raw product form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

/// Validated product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    pub description: String,
}

impl ProductInput {
    pub fn validate(&self) -> Result<ProductFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(&self.name, "Name is Required");
        let price = parse_price(&self.price, &mut errors);

        errors.finish(ProductFields {
            name: self.name.trim().to_string(),
            category: optional(self.category.as_deref()),
            price,
            description: self.description.trim().to_string(),
        })
    }
}

impl Product {
    pub fn new(fields: ProductFields) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Uuid::now_v7(),
            name: fields.name,
            category: fields.category,
            price: fields.price,
            description: fields.description,
            created: now,
            changed: now,
        }
    }

    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.category = fields.category;
        self.price = fields.price;
        self.description = fields.description;
        self.changed = chrono::Utc::now().timestamp();
    }
}
