//! Persistent key-value storage
//!
//! The cache keeps exactly two values, each under a fixed key:
//!
//! | Key | Contents |
//! |-----|----------|
//! | `stashdb_backlog_index` | the manifest (record id -> fingerprint entry) |
//! | `stashdb_backlog` | the object cache (`{kind}/{id}` -> data object) |
//!
//! [`KeyValueStore`] is the raw string-valued backend; [`CacheStore`] layers
//! typed access, legacy migration and the write lock on top of it.

mod cache_store;
mod file;
mod memory;

pub use cache_store::{CacheStore, INDEX_KEY, OBJECTS_KEY};
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::BacklogResult;
use async_trait::async_trait;

/// Durable string storage addressed by key
///
/// Implementations:
/// - [`FileStore`]: one JSON file per key in the state directory
/// - [`MemoryStore`]: process-local map, used in tests
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> BacklogResult<Option<String>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &str) -> BacklogResult<()>;

    /// Remove `key`, returning whether it existed
    async fn delete(&self, key: &str) -> BacklogResult<bool>;

    /// Human-readable backend name for diagnostics
    fn backend_name(&self) -> &'static str;
}
