//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;
use super::vocab::{Category, Mood, non_blank};
use crate::store::Document;

/// Fields a caller supplies when adding a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "non_blank")]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub sizes: Vec<String>,
}

/// A stored product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "non_blank")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "non_blank")]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: ProductCreate, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            image_url: input.image_url,
            category: input.category,
            mood: input.mood,
            sizes: input.sizes,
            created_at,
        }
    }
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }
}
