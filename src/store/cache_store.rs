//! Typed access to the two persisted cache values

use crate::cache::manifest::{migrate_legacy, Manifest};
use crate::cache::object::ObjectCache;
use crate::error::{BacklogError, BacklogResult};
use crate::store::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Store key holding the manifest
pub const INDEX_KEY: &str = "stashdb_backlog_index";

/// Store key holding the object cache
pub const OBJECTS_KEY: &str = "stashdb_backlog";

/// Shared cache storage, constructed once and handed to every manager
///
/// Every read goes to the backend so callers always start from the latest
/// persisted state. Read-modify-write sequences must hold [`CacheStore::lock`]
/// for their whole duration; the managers' public entry points do this.
pub struct CacheStore {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl CacheStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    /// Serialize a read-modify-write sequence against other cache operations
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Load the manifest, migrating legacy entries; empty if never stored
    pub async fn load_manifest(&self) -> BacklogResult<Manifest> {
        let Some(mut value) = self.load_json(INDEX_KEY).await? else {
            return Ok(Manifest::default());
        };

        let migrated = migrate_legacy(&mut value);
        if migrated > 0 {
            debug!("Migrated {} legacy index entries", migrated);
        }

        serde_json::from_value(value).map_err(|e| BacklogError::corrupt(INDEX_KEY, e.to_string()))
    }

    pub async fn save_manifest(&self, manifest: &Manifest) -> BacklogResult<()> {
        let content = serde_json::to_string(manifest)?;
        self.backend.set(INDEX_KEY, &content).await
    }

    /// Load the object cache; empty if never stored
    pub async fn load_objects(&self) -> BacklogResult<ObjectCache> {
        let Some(value) = self.load_json(OBJECTS_KEY).await? else {
            return Ok(ObjectCache::default());
        };

        serde_json::from_value(value).map_err(|e| BacklogError::corrupt(OBJECTS_KEY, e.to_string()))
    }

    pub async fn save_objects(&self, objects: &ObjectCache) -> BacklogResult<()> {
        let content = serde_json::to_string(objects)?;
        self.backend.set(OBJECTS_KEY, &content).await
    }

    /// Delete both persisted values; returns (index removed, objects removed)
    pub async fn clear(&self) -> BacklogResult<(bool, bool)> {
        let index = self.backend.delete(INDEX_KEY).await?;
        let objects = self.backend.delete(OBJECTS_KEY).await?;
        Ok((index, objects))
    }

    /// Read a stored JSON object. Anything else under the key is corrupt state.
    async fn load_json(&self, key: &str) -> BacklogResult<Option<Value>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        let value: Value =
            serde_json::from_str(&raw).map_err(|e| BacklogError::corrupt(key, e.to_string()))?;

        if !value.is_object() {
            return Err(BacklogError::corrupt(key, "stored value is not a JSON object"));
        }

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::kind::RecordKind;
    use crate::cache::manifest::FingerprintEntry;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn empty_store_yields_empty_values() {
        let store = CacheStore::new(MemoryStore::new());
        assert!(store.load_manifest().await.unwrap().is_empty());
        assert!(store.load_objects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn manifest_roundtrip() {
        let store = CacheStore::new(MemoryStore::new());
        let mut manifest = Manifest::default();
        manifest.insert(RecordKind::Scene, "s1", FingerprintEntry::new("h", ["title"]));

        store.save_manifest(&manifest).await.unwrap();
        assert_eq!(store.load_manifest().await.unwrap(), manifest);
    }

    #[tokio::test]
    async fn legacy_manifest_is_migrated_on_load() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(INDEX_KEY, r#"{"scenes":{"s1":"title,date"}}"#)
            .await
            .unwrap();
        let store = CacheStore::with_backend(backend);

        let manifest = store.load_manifest().await.unwrap();
        let entry = manifest.entry(RecordKind::Scene, "s1").unwrap();
        assert_eq!(entry.as_slice(), &["", "title", "date"]);
    }

    #[tokio::test]
    async fn corrupt_json_is_an_error() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(INDEX_KEY, "{not json").await.unwrap();
        backend.set(OBJECTS_KEY, "null").await.unwrap();
        let store = CacheStore::with_backend(backend);

        let err = store.load_manifest().await.unwrap_err();
        assert!(matches!(err, BacklogError::CorruptState { ref key, .. } if key == INDEX_KEY));

        let err = store.load_objects().await.unwrap_err();
        assert!(matches!(err, BacklogError::CorruptState { ref key, .. } if key == OBJECTS_KEY));
    }

    #[tokio::test]
    async fn clear_reports_what_existed() {
        let store = CacheStore::new(MemoryStore::new());
        store.save_manifest(&Manifest::default()).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), (true, false));
        assert_eq!(store.clear().await.unwrap(), (false, false));
    }
}
