//! Backend trait for the document store.
//!
//! Defines the interface that all document storage backends must implement,
//! enabling pluggable storage (redb, memory, ...).

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::filter::{Filter, FindOptions};

/// Backend trait for document collections.
///
/// Documents are JSON objects addressed by collection name and id. Each
/// collection keeps an insertion sequence so that unsorted finds and sort
/// ties come back in a stable order.
///
/// All backends must be thread-safe (`Send + Sync`) for use with tokio.
#[async_trait]
pub trait DocumentBackend: Send + Sync + 'static {
    /// Stores a new document under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if a document with the same id already exists in the
    /// collection, or if the underlying storage operation fails.
    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<()>;

    /// Stores `document` unless some document in the collection already
    /// matches `guard`. The check and the write happen atomically.
    ///
    /// Returns `Ok(true)` if the document was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn insert_if_absent(
        &self,
        collection: &str,
        guard: &Filter,
        id: &str,
        document: Value,
    ) -> Result<bool>;

    /// Returns all documents matching `filter`, shaped by `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn find(&self, collection: &str, filter: &Filter, options: &FindOptions)
    -> Result<Vec<Value>>;

    /// Returns the first document (in insertion order) matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>> {
        let mut found = self
            .find(collection, filter, &FindOptions::default().limit(1))
            .await?;
        Ok(found.pop())
    }

    /// Removes the first document matching `filter`.
    ///
    /// Returns the number of documents removed (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Counts documents matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64>;

    /// Releases underlying resources. Later calls may fail.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot shut down cleanly.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
