//! Object cache manager: owns per-record detail payloads
//!
//! A 404 for a record means its pending change was resolved upstream; the
//! record is then evicted from both the manifest and the object cache, which
//! is how stale "still pending" state heals itself. Any other fetch failure
//! leaves both tiers untouched so the next read retries.

use crate::cache::freshness::{is_stale, Staleness};
use crate::cache::index::IndexManager;
use crate::cache::kind::RecordKind;
use crate::cache::manifest::{FingerprintEntry, Manifest};
use crate::cache::object::{DataObject, ObjectCache};
use crate::error::BacklogResult;
use crate::source::DataSource;
use crate::store::CacheStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reads, fetches and evicts cached data objects
pub struct ObjectCacheManager {
    store: Arc<CacheStore>,
    source: Arc<dyn DataSource>,
    index: Arc<IndexManager>,
}

impl ObjectCacheManager {
    pub fn new(
        store: Arc<CacheStore>,
        source: Arc<dyn DataSource>,
        index: Arc<IndexManager>,
    ) -> Self {
        Self {
            store,
            source,
            index,
        }
    }

    /// Detail payload for a record, fetched when missing or outdated
    ///
    /// Uses `manifest` when given (and edits it on reconciliation), otherwise
    /// loads the manifest through the index manager.
    pub async fn get(
        &self,
        kind: RecordKind,
        id: &str,
        manifest: Option<&mut Manifest>,
    ) -> BacklogResult<Option<DataObject>> {
        let _guard = self.store.lock().await;
        self.get_unlocked(kind, id, manifest).await
    }

    /// Fetch a record and store it, bypassing staleness checks
    ///
    /// Must be called while holding [`CacheStore::lock`]. `manifest` and
    /// `objects` are updated in place and persisted.
    pub(crate) async fn fetch_and_store(
        &self,
        kind: RecordKind,
        id: &str,
        manifest: &mut Manifest,
        objects: &mut ObjectCache,
    ) -> BacklogResult<Option<DataObject>> {
        let fields = match self.source.fetch_object(kind, id).await {
            Ok(fields) => fields,
            Err(e) if e.is_not_found() => {
                self.reconcile_resolved(kind, id, manifest, objects).await?;
                return Ok(None);
            }
            Err(e) => {
                warn!(retryable = e.is_retryable(), "Failed to fetch {}/{}: {}", kind, id, e);
                return Ok(None);
            }
        };

        let indexed_hash = manifest
            .entry(kind, id)
            .map(|entry| entry.content_hash().to_string());
        let object = DataObject::fetched(fields, indexed_hash.clone(), Utc::now());

        objects.insert(kind, id, object.clone());
        self.store.save_objects(objects).await?;
        debug!("Stored {}/{}", kind, id);

        if indexed_hash.is_none() {
            let entry = FingerprintEntry::new("", object.change_labels());
            info!(
                "Index was missing {}/{}, added {:?}",
                kind,
                id,
                entry.labels()
            );
            manifest.insert(kind, id, entry);
            self.store.save_manifest(manifest).await?;
        }

        Ok(Some(object))
    }

    /// Remove a record from the stored manifest, returning whether it was there
    pub async fn evict_index_entry(&self, kind: RecordKind, id: &str) -> BacklogResult<bool> {
        self.index.remove_entry(kind, id, None).await
    }

    /// Remove a record from the stored object cache, returning whether it was there
    pub async fn evict_object_entry(&self, kind: RecordKind, id: &str) -> BacklogResult<bool> {
        let _guard = self.store.lock().await;
        let mut objects = self.store.load_objects().await?;
        self.evict_object(kind, id, &mut objects).await
    }

    /// [`Self::get`] without taking the store lock; callers must hold it
    pub(crate) async fn get_unlocked(
        &self,
        kind: RecordKind,
        id: &str,
        manifest: Option<&mut Manifest>,
    ) -> BacklogResult<Option<DataObject>> {
        let mut loaded: Manifest;
        let manifest = match manifest {
            Some(manifest) => manifest,
            None => {
                loaded = self.index.refresh(false).await?;
                &mut loaded
            }
        };

        let mut objects = self.store.load_objects().await?;

        let Some(entry) = manifest.entry(kind, id) else {
            if self.evict_object(kind, id, &mut objects).await? {
                info!("{}/{} is no longer pending, evicted cached object", kind, id);
            }
            return Ok(None);
        };

        let content_hash = entry.content_hash().to_string();
        let cached = objects.get(kind, id);

        // Performers can be flagged by label alone ("split") with no detail file
        if kind == RecordKind::Performer && content_hash.is_empty() && cached.is_none() {
            debug!("{}/{} has no detail payload upstream", kind, id);
            return Ok(None);
        }

        if !is_stale(cached, &Staleness::ContentHash(content_hash)) {
            debug!("Using cached {}/{}", kind, id);
            return Ok(cached.cloned());
        }

        self.fetch_and_store(kind, id, manifest, &mut objects).await
    }

    /// Evict a record the remote source no longer has, from both tiers
    async fn reconcile_resolved(
        &self,
        kind: RecordKind,
        id: &str,
        manifest: &mut Manifest,
        objects: &mut ObjectCache,
    ) -> BacklogResult<()> {
        let from_index = self.index.remove_from(kind, id, manifest).await?;
        let from_objects = self.evict_object(kind, id, objects).await?;

        match (from_index, from_objects) {
            (true, true) => info!("{}/{} resolved upstream, removed from index and objects", kind, id),
            (true, false) => info!("{}/{} resolved upstream, removed from index", kind, id),
            (false, true) => info!("{}/{} resolved upstream, removed from objects", kind, id),
            (false, false) => debug!("{}/{} not found upstream, nothing cached", kind, id),
        }

        Ok(())
    }

    async fn evict_object(
        &self,
        kind: RecordKind,
        id: &str,
        objects: &mut ObjectCache,
    ) -> BacklogResult<bool> {
        if !objects.remove(kind, id) {
            return Ok(false);
        }

        self.store.save_objects(objects).await?;
        Ok(true)
    }
}
