//! Redb-backed document backend.
//!
//! Provides persistent document storage using redb with ACID guarantees.
//! Each collection is its own table keyed by document id; values are JSON
//! envelopes carrying the insertion sequence next to the document body.

use super::backend::DocumentBackend;
use super::filter::{Candidate, Filter, FindOptions, shape};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use parking_lot::RwLock;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Table holding store-wide counters.
const META_TABLE: TableDefinition<'static, &'static str, u64> = TableDefinition::new("__meta");

const SEQ_KEY: &str = "seq";

fn collection_table(name: &str) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(name)
}

/// On-disk form of a document.
#[derive(Serialize, Deserialize)]
struct Envelope {
    seq: u64,
    body: Value,
}

impl Envelope {
    fn decode(bytes: &[u8], id: &str) -> Result<Self> {
        serde_json::from_slice(bytes)
            .with_context(|| format!("Failed to deserialize document '{id}'"))
    }
}

/// Redb-backed document backend.
///
/// `RedbBackend` is `Clone` and can be shared across threads; clones share
/// one database handle. Closing the backend drops that handle, releasing the
/// file lock, after which every operation fails.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<RwLock<Option<Database>>>,
}

impl RedbBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, disk full, etc.)
    /// - Initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open store database: {}", path.display()))?;

        // Initialize the meta table so reads never see it missing
        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(META_TABLE)
                .context("Failed to initialize meta table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self {
            db: Arc::new(RwLock::new(Some(db))),
        })
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let guard = self.db.read();
        let db = guard.as_ref().context("Store is closed")?;
        f(db)
    }

    fn read_candidates(&self, collection: &str, filter: &Filter) -> Result<Vec<Candidate>> {
        self.with_db(|db| {
            let read_txn = db
                .begin_read()
                .context("Failed to begin read transaction")?;

            let table = match read_txn.open_table(collection_table(collection)) {
                Ok(table) => table,
                Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to open collection '{collection}'"));
                },
            };

            if let Some(id) = filter.id_lookup() {
                let found = table
                    .get(id)
                    .with_context(|| format!("Failed to read document '{id}'"))?;
                return match found {
                    Some(guard) => {
                        let envelope = Envelope::decode(guard.value(), id)?;
                        Ok(vec![Candidate {
                            seq: envelope.seq,
                            body: envelope.body,
                        }])
                    },
                    None => Ok(Vec::new()),
                };
            }

            let mut candidates = Vec::new();
            for item in table
                .iter()
                .with_context(|| format!("Failed to iterate collection '{collection}'"))?
            {
                let (key, value) = item.context("Failed to read document")?;
                let envelope = Envelope::decode(value.value(), key.value())?;
                if filter.matches(&envelope.body) {
                    candidates.push(Candidate {
                        seq: envelope.seq,
                        body: envelope.body,
                    });
                }
            }
            Ok(candidates)
        })
    }

    /// Writes `document` inside one write transaction, optionally refusing
    /// when a document matching `guard` exists.
    fn write_sync(
        &self,
        collection: &str,
        guard: Option<&Filter>,
        id: &str,
        document: Value,
    ) -> Result<bool> {
        self.with_db(|db| {
            let write_txn = db
                .begin_write()
                .context("Failed to begin write transaction")?;

            {
                let mut table = write_txn
                    .open_table(collection_table(collection))
                    .with_context(|| format!("Failed to open collection '{collection}'"))?;

                if let Some(guard) = guard {
                    for item in table.iter().context("Failed to iterate collection")? {
                        let (key, value) = item.context("Failed to read document")?;
                        let envelope = Envelope::decode(value.value(), key.value())?;
                        if guard.matches(&envelope.body) {
                            return Ok(false);
                        }
                    }
                }

                if table
                    .get(id)
                    .with_context(|| format!("Failed to read document '{id}'"))?
                    .is_some()
                {
                    bail!("Duplicate id '{id}' in collection '{collection}'");
                }

                let mut meta = write_txn
                    .open_table(META_TABLE)
                    .context("Failed to open meta table")?;
                let seq = meta
                    .get(SEQ_KEY)
                    .context("Failed to read sequence")?
                    .map_or(0, |v| v.value());
                meta.insert(SEQ_KEY, seq + 1)
                    .context("Failed to advance sequence")?;

                let bytes = serde_json::to_vec(&Envelope {
                    seq,
                    body: document,
                })
                .context("Failed to serialize document")?;
                table
                    .insert(id, bytes.as_slice())
                    .with_context(|| format!("Failed to insert document '{id}'"))?;
            }

            write_txn
                .commit()
                .context("Failed to commit write transaction")?;
            Ok(true)
        })
    }

    fn delete_sync(&self, collection: &str, filter: &Filter) -> Result<u64> {
        self.with_db(|db| {
            let write_txn = db
                .begin_write()
                .context("Failed to begin write transaction")?;

            let removed = {
                let mut table = write_txn
                    .open_table(collection_table(collection))
                    .with_context(|| format!("Failed to open collection '{collection}'"))?;

                let target = match filter.id_lookup() {
                    Some(id) => Some(id.to_string()),
                    None => {
                        let mut oldest: Option<(u64, String)> = None;
                        for item in table.iter().context("Failed to iterate collection")? {
                            let (key, value) = item.context("Failed to read document")?;
                            let envelope = Envelope::decode(value.value(), key.value())?;
                            if filter.matches(&envelope.body)
                                && oldest.as_ref().is_none_or(|(seq, _)| envelope.seq < *seq)
                            {
                                oldest = Some((envelope.seq, key.value().to_string()));
                            }
                        }
                        oldest.map(|(_, id)| id)
                    },
                };

                match target {
                    Some(id) => table
                        .remove(id.as_str())
                        .with_context(|| format!("Failed to remove document '{id}'"))?
                        .is_some(),
                    None => false,
                }
            };

            write_txn
                .commit()
                .context("Failed to commit delete transaction")?;

            Ok(u64::from(removed))
        })
    }
}

#[async_trait]
impl DocumentBackend for RedbBackend {
    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        let backend = self.clone();
        let collection = collection.to_string();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            backend
                .write_sync(&collection, None, &id, document)
                .map(|_| ())
        })
        .await
        .context("Task join error")?
    }

    async fn insert_if_absent(
        &self,
        collection: &str,
        guard: &Filter,
        id: &str,
        document: Value,
    ) -> Result<bool> {
        let backend = self.clone();
        let collection = collection.to_string();
        let guard = guard.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            backend.write_sync(&collection, Some(&guard), &id, document)
        })
        .await
        .context("Task join error")?
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Value>> {
        let backend = self.clone();
        let collection = collection.to_string();
        let filter = filter.clone();
        let candidates =
            tokio::task::spawn_blocking(move || backend.read_candidates(&collection, &filter))
                .await
                .context("Task join error")??;
        Ok(shape(candidates, options))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let backend = self.clone();
        let collection = collection.to_string();
        let filter = filter.clone();
        tokio::task::spawn_blocking(move || backend.delete_sync(&collection, &filter))
            .await
            .context("Task join error")?
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let backend = self.clone();
        let collection = collection.to_string();
        let filter = filter.clone();
        let candidates =
            tokio::task::spawn_blocking(move || backend.read_candidates(&collection, &filter))
                .await
                .context("Task join error")??;
        Ok(candidates.len() as u64)
    }

    async fn close(&self) -> Result<()> {
        // Waits for in-flight operations holding the read lock
        let db = self.db.write().take();
        drop(db);
        Ok(())
    }
}
