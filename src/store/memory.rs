//! In-memory document backend.
//!
//! Provides a fast, non-persistent document store using DashMap for
//! concurrent access. Ideal for testing, development, and embedded use cases.

use super::backend::DocumentBackend;
use super::filter::{Candidate, Filter, FindOptions, shape};
use anyhow::{Result, bail};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Document stored with its insertion sequence.
#[derive(Clone)]
struct MemoryDocument {
    seq: u64,
    body: Value,
}

type MemoryCollection = HashMap<String, MemoryDocument>;

/// In-memory document backend using DashMap.
///
/// All data is lost when the process exits. Writes to one collection hold
/// that collection's shard lock for the whole check-and-write, which is what
/// makes [`DocumentBackend::insert_if_absent`] atomic here.
#[derive(Default)]
pub struct MemoryBackend {
    collections: DashMap<String, MemoryCollection>,
    next_seq: AtomicU64,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    fn matching(&self, collection: &str, filter: &Filter) -> Vec<Candidate> {
        let Some(documents) = self.collections.get(collection) else {
            return Vec::new();
        };

        if let Some(id) = filter.id_lookup() {
            return documents
                .get(id)
                .map(|doc| Candidate {
                    seq: doc.seq,
                    body: doc.body.clone(),
                })
                .into_iter()
                .collect();
        }

        documents
            .values()
            .filter(|doc| filter.matches(&doc.body))
            .map(|doc| Candidate {
                seq: doc.seq,
                body: doc.body.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        let mut documents = self.collections.entry(collection.to_string()).or_default();
        if documents.contains_key(id) {
            bail!("Duplicate id '{id}' in collection '{collection}'");
        }
        let seq = self.next_seq();
        documents.insert(id.to_string(), MemoryDocument {
            seq,
            body: document,
        });
        Ok(())
    }

    async fn insert_if_absent(
        &self,
        collection: &str,
        guard: &Filter,
        id: &str,
        document: Value,
    ) -> Result<bool> {
        let mut documents = self.collections.entry(collection.to_string()).or_default();
        if documents.values().any(|doc| guard.matches(&doc.body)) {
            return Ok(false);
        }
        if documents.contains_key(id) {
            bail!("Duplicate id '{id}' in collection '{collection}'");
        }
        let seq = self.next_seq();
        documents.insert(id.to_string(), MemoryDocument {
            seq,
            body: document,
        });
        Ok(true)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Value>> {
        Ok(shape(self.matching(collection, filter), options))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let Some(mut documents) = self.collections.get_mut(collection) else {
            return Ok(0);
        };

        let target = match filter.id_lookup() {
            Some(id) => documents.contains_key(id).then(|| id.to_string()),
            None => documents
                .iter()
                .filter(|(_, doc)| filter.matches(&doc.body))
                .min_by_key(|(_, doc)| doc.seq)
                .map(|(id, _)| id.clone()),
        };

        Ok(target.and_then(|id| documents.remove(&id)).map_or(0, |_| 1))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let Some(documents) = self.collections.get(collection) else {
            return Ok(0);
        };
        let count = documents
            .values()
            .filter(|doc| filter.matches(&doc.body))
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::filter::SortOrder;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let backend = MemoryBackend::new();

        backend
            .insert("things", "a", json!({"id": "a", "n": 1}))
            .await
            .unwrap();
        let found = backend.find_one("things", &Filter::by_id("a")).await.unwrap();
        assert_eq!(found, Some(json!({"id": "a", "n": 1})));
    }

    #[tokio::test]
    async fn test_find_missing_collection_is_empty() {
        let backend = MemoryBackend::new();
        let found = backend
            .find("nothing", &Filter::all(), &FindOptions::default())
            .await
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(backend.count("nothing", &Filter::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let backend = MemoryBackend::new();

        backend.insert("things", "a", json!({"id": "a"})).await.unwrap();
        assert!(backend.insert("things", "a", json!({"id": "a"})).await.is_err());
        assert_eq!(backend.len("things"), 1);
    }

    #[tokio::test]
    async fn test_delete_one() {
        let backend = MemoryBackend::new();

        backend.insert("things", "a", json!({"id": "a"})).await.unwrap();
        assert_eq!(backend.delete_one("things", &Filter::by_id("a")).await.unwrap(), 1);
        assert_eq!(backend.delete_one("things", &Filter::by_id("a")).await.unwrap(), 0);
        assert_eq!(backend.delete_one("other", &Filter::by_id("a")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_one_by_field_removes_oldest_match() {
        let backend = MemoryBackend::new();

        backend.insert("things", "a", json!({"id": "a", "k": 1})).await.unwrap();
        backend.insert("things", "b", json!({"id": "b", "k": 1})).await.unwrap();
        let removed = backend
            .delete_one("things", &Filter::all().eq("k", 1))
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let left = backend
            .find("things", &Filter::all(), &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(left, vec![json!({"id": "b", "k": 1})]);
    }

    #[tokio::test]
    async fn test_insert_if_absent_is_idempotent() {
        let backend = MemoryBackend::new();
        let guard = Filter::all().eq("platform", "instagram");

        let first = backend
            .insert_if_absent("accounts", &guard, "1", json!({"id": "1", "platform": "instagram"}))
            .await
            .unwrap();
        let second = backend
            .insert_if_absent("accounts", &guard, "2", json!({"id": "2", "platform": "instagram"}))
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
        assert_eq!(backend.count("accounts", &Filter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_insert_if_absent_writes_once() {
        let backend = std::sync::Arc::new(MemoryBackend::new());
        let mut handles = Vec::new();

        for i in 0..16 {
            let backend = backend.clone();
            handles.push(tokio::spawn(async move {
                let guard = Filter::all().eq("platform", "facebook");
                let id = format!("id-{i}");
                backend
                    .insert_if_absent("accounts", &guard, &id, json!({"id": id, "platform": "facebook"}))
                    .await
                    .unwrap()
            }));
        }

        let mut written = 0;
        for handle in handles {
            if handle.await.unwrap() {
                written += 1;
            }
        }
        assert_eq!(written, 1);
        assert_eq!(backend.len("accounts"), 1);
    }

    #[tokio::test]
    async fn test_sorted_find_with_limit() {
        let backend = MemoryBackend::new();
        for (id, ts) in [("a", "2024-01-01"), ("b", "2024-03-01"), ("c", "2024-02-01")] {
            backend
                .insert("posts", id, json!({"id": id, "created_at": ts}))
                .await
                .unwrap();
        }

        let options = FindOptions::default()
            .sort_by("created_at", SortOrder::Descending)
            .limit(2);
        let found = backend.find("posts", &Filter::all(), &options).await.unwrap();
        let ids: Vec<_> = found.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["b", "c"]);
    }
}
