//! Typed view over one collection.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use super::backend::DocumentBackend;
use super::filter::{Filter, FindOptions};
use crate::metrics;

/// A record type stored in its own collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name in the backend.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

/// Typed access to the collection of `T`.
///
/// Converts records to and from their JSON document form, which is where the
/// text encoding of timestamps is applied.
pub struct Collection<T> {
    backend: Arc<dyn DocumentBackend>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub(super) fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            _marker: PhantomData,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or the write fails.
    pub async fn insert(&self, record: &T) -> Result<()> {
        metrics::record_store_operation(T::COLLECTION, "insert");
        let document = encode(record)?;
        self.backend
            .insert(T::COLLECTION, record.id(), document)
            .await
    }

    /// Inserts `record` unless a record matching `guard` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or the write fails.
    pub async fn insert_if_absent(&self, guard: &Filter, record: &T) -> Result<bool> {
        metrics::record_store_operation(T::COLLECTION, "insert_if_absent");
        let document = encode(record)?;
        self.backend
            .insert_if_absent(T::COLLECTION, guard, record.id(), document)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the read fails or a stored document does not decode.
    pub async fn find(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<T>> {
        metrics::record_store_operation(T::COLLECTION, "find");
        self.backend
            .find(T::COLLECTION, filter, options)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// # Errors
    ///
    /// Returns an error if the read fails or the stored document does not decode.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>> {
        metrics::record_store_operation(T::COLLECTION, "find_one");
        self.backend
            .find_one(T::COLLECTION, filter)
            .await?
            .map(decode)
            .transpose()
    }

    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete_one(&self, filter: &Filter) -> Result<u64> {
        metrics::record_store_operation(T::COLLECTION, "delete_one");
        self.backend.delete_one(T::COLLECTION, filter).await
    }

    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        metrics::record_store_operation(T::COLLECTION, "count");
        self.backend.count(T::COLLECTION, filter).await
    }
}

fn encode<T: Document>(record: &T) -> Result<Value> {
    serde_json::to_value(record)
        .with_context(|| format!("Failed to encode {} document", T::COLLECTION))
}

fn decode<T: Document>(document: Value) -> Result<T> {
    serde_json::from_value(document)
        .with_context(|| format!("Failed to decode {} document", T::COLLECTION))
}
