//! Bird catalog record.

use copsewood_catalog::{CatalogRecord, SortKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{ValidationErrors, optional, parse_price};

/// A bird offered for sale.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bird {
    /// Unique identifier (UUIDv7).
    pub id: Uuid,

    /// Breed; the listing category.
    pub breed: String,

    /// Optional pet name.
    pub name: Option<String>,

    pub price: f64,

    pub description: String,

    /// Storage URIs of uploaded photos, in upload order.
    pub images: Vec<String>,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

impl CatalogRecord for Bird {
    const SORT_KEYS: &'static [SortKey] = &[SortKey::Price, SortKey::Category, SortKey::Name];

    fn category(&self) -> Option<&str> {
        Some(&self.breed)
    }

    fn price(&self) -> f64 {
        self.price
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Raw bird form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BirdInput {
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub description: String,
}

/// Validated bird fields.
#[derive(Debug, Clone, PartialEq)]
pub struct BirdFields {
    pub breed: String,
    pub name: Option<String>,
    pub price: f64,
    pub description: String,
}

impl BirdInput {
    pub fn validate(&self) -> Result<BirdFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require(&self.breed, "Breed is Required");
        let price = parse_price(&self.price, &mut errors);

        errors.finish(BirdFields {
            breed: self.breed.trim().to_string(),
            name: optional(self.name.as_deref()),
            price,
            description: self.description.trim().to_string(),
        })
    }
}

impl Bird {
    /// Create a new bird from validated fields.
    pub fn new(fields: BirdFields, images: Vec<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: Uuid::now_v7(),
            breed: fields.breed,
            name: fields.name,
            price: fields.price,
            description: fields.description,
            images,
            created: now,
            changed: now,
        }
    }

    /// Overwrite editable fields.
    pub fn apply(&mut self, fields: BirdFields) {
        self.breed = fields.breed;
        self.name = fields.name;
        self.price = fields.price;
        self.description = fields.description;
        self.changed = chrono::Utc::now().timestamp();
    }

    /// Title for pages: the pet name when set, otherwise the breed.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.breed)
    }
}
