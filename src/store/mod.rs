//! Document store with pluggable backends.
//!
//! Records live in named collections of JSON documents addressed by id.
//! Supports multiple backends:
//!
//! - **RedbBackend**: Persistent storage with ACID guarantees (default for serving)
//! - **MemoryBackend**: Fast, non-persistent storage (ideal for testing/embedding)
//!
//! # Example
//!
//! ```ignore
//! use brandhub::store::{Filter, FindOptions, Store};
//! use brandhub::model::Product;
//!
//! let store = Store::memory();
//! let products = store.collection::<Product>();
//! products.insert(&product).await?;
//! let sensual = products
//!     .find(&Filter::all().eq("mood", "sensual"), &FindOptions::default())
//!     .await?;
//! ```

mod backend;
mod collection;
mod filter;
mod memory;
mod redb;

pub use backend::DocumentBackend;
pub use collection::{Collection, Document};
pub use filter::{Filter, FindOptions, Sort, SortOrder};
pub use memory::MemoryBackend;
pub use redb::RedbBackend;

use anyhow::{Result, bail};
use std::path::Path;
use std::sync::Arc;

/// Handle to the document store.
///
/// `Store` is `Clone` and can be shared across tasks; clones share the
/// backend. Services receive it explicitly at construction.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn DocumentBackend>,
}

impl Store {
    /// Opens the store named by a connection string.
    ///
    /// - `memory://` - in-memory backend, `database` is ignored
    /// - `redb://<dir>` - file `<dir>/<database>.redb`
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown scheme, an empty database name, or if
    /// the database file cannot be opened.
    pub fn connect(url: &str, database: &str) -> Result<Self> {
        if url.trim_end_matches('/') == "memory:" {
            return Ok(Self::memory());
        }

        if let Some(dir) = url.strip_prefix("redb://") {
            if database.trim().is_empty() {
                bail!("Database name cannot be empty");
            }
            let dir = if dir.is_empty() { "." } else { dir };
            return Self::file(Path::new(dir).join(format!("{database}.redb")));
        }

        bail!("Unsupported store URL '{url}'. Expected 'memory://' or 'redb://<dir>'")
    }

    /// Creates a store backed by a file-based redb database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = RedbBackend::open(path)?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Creates a store backed by memory. All data is lost when the process exits.
    pub fn memory() -> Self {
        Self {
            backend: Arc::new(MemoryBackend::new()),
        }
    }

    /// Typed access to the collection holding `T`.
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(Arc::clone(&self.backend))
    }

    /// Releases the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot shut down cleanly.
    pub async fn close(&self) -> Result<()> {
        self.backend.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_connect_memory() {
        assert!(Store::connect("memory://", "ignored").is_ok());
    }

    #[test]
    fn test_connect_redb_uses_database_name() {
        let tmp = TempDir::new().unwrap();
        let url = format!("redb://{}", tmp.path().display());

        Store::connect(&url, "brand").unwrap();
        assert!(tmp.path().join("brand.redb").exists());
    }

    #[test]
    fn test_connect_rejects_unknown_scheme() {
        let err = Store::connect("mongodb://localhost:27017", "brand")
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unsupported store URL"));
    }

    #[test]
    fn test_connect_rejects_empty_database() {
        let tmp = TempDir::new().unwrap();
        let url = format!("redb://{}", tmp.path().display());
        assert!(Store::connect(&url, "  ").is_err());
    }
}
