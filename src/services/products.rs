//! Product catalog operations.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Category, Mood, Product, ProductCreate, new_id};
use crate::query::ProductQuery;
use crate::store::{Collection, Filter, Store};

#[derive(Clone)]
pub struct ProductService {
    products: Collection<Product>,
}

impl ProductService {
    pub fn new(store: &Store) -> Self {
        Self {
            products: store.collection(),
        }
    }

    /// Assigns an id and creation time, stores the product and returns it.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` if the write fails.
    pub async fn create(&self, input: ProductCreate) -> Result<Product> {
        let product = Product::new(input, new_id(), Utc::now());
        if let Some(mood) = product.mood.as_ref().filter(|m| !m.is_known()) {
            warn!(%mood, known = ?Mood::KNOWN, "Storing product with unrecognized mood");
        }
        if let Some(category) = product.category.as_ref().filter(|c| !c.is_known()) {
            warn!(%category, known = ?Category::KNOWN, "Storing product with unrecognized category");
        }
        self.products
            .insert(&product)
            .await
            .map_err(Error::storage)?;
        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// # Errors
    ///
    /// `StorageUnavailable` if the read fails.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        let products = self
            .products
            .find(&query.filter(), &query.options())
            .await
            .map_err(Error::storage)?;
        debug!(count = products.len(), "Products listed");
        Ok(products)
    }

    /// # Errors
    ///
    /// `NotFound` if no product has this id, `StorageUnavailable` if the read fails.
    pub async fn get(&self, id: &str) -> Result<Product> {
        self.products
            .find_one(&Filter::by_id(id))
            .await
            .map_err(Error::storage)?
            .ok_or_else(|| Error::not_found("Product"))
    }

    /// Removes a product. Posts referencing it are left as they are.
    ///
    /// # Errors
    ///
    /// `NotFound` if no product has this id, `StorageUnavailable` if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = self
            .products
            .delete_one(&Filter::by_id(id))
            .await
            .map_err(Error::storage)?;
        if removed == 0 {
            return Err(Error::not_found("Product"));
        }
        info!(%id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(name: &str, mood: Option<&str>) -> ProductCreate {
        serde_json::from_value(json!({"name": name, "price": 80.0, "mood": mood})).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let service = ProductService::new(&Store::memory());

        let a = service.create(product("A", None)).await.unwrap();
        let b = service.create(product("B", None)).await.unwrap();

        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert!(a.created_at <= b.created_at);
    }

    #[tokio::test]
    async fn test_get_returns_stored_record() {
        let service = ProductService::new(&Store::memory());
        let created = service.create(product("Oud", Some("woody"))).await.unwrap();

        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_filters_by_mood() {
        let service = ProductService::new(&Store::memory());
        service.create(product("A", Some("Sensual"))).await.unwrap();
        service.create(product("B", Some("Fresh"))).await.unwrap();
        service.create(product("C", None)).await.unwrap();

        let query = ProductQuery {
            mood: Some(Mood::parse("Sensual")),
            category: None,
        };
        let found = service.list(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "A");

        let all = service.list(&ProductQuery::default()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_unrecognized_mood_is_stored_verbatim() {
        let service = ProductService::new(&Store::memory());
        let created = service.create(product("Yuzu", Some("Citrus"))).await.unwrap();

        assert_eq!(created.mood, Some(Mood::Other("Citrus".to_string())));
        assert!(!Mood::KNOWN.contains(&"citrus"));

        let query = ProductQuery {
            mood: Some(Mood::parse("Citrus")),
            category: None,
        };
        let found = service.list(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let service = ProductService::new(&Store::memory());

        assert!(matches!(service.get("missing").await, Err(Error::NotFound { .. })));
        assert!(matches!(service.delete("missing").await, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = ProductService::new(&Store::memory());
        let created = service.create(product("A", None)).await.unwrap();

        service.delete(&created.id).await.unwrap();
        assert!(matches!(service.delete(&created.id).await, Err(Error::NotFound { .. })));
        assert!(matches!(service.get(&created.id).await, Err(Error::NotFound { .. })));
    }
}
