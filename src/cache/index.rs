//! Index manager: owns the persisted manifest
//!
//! Refreshing is a two-step economy. Once the manifest is older than the
//! configured age, one commit-metadata request asks when `index.json` really
//! changed; the full manifest is only downloaded if it changed after the last
//! check. Otherwise the check itself is stamped so it runs at most once per
//! age window. If the metadata request fails the age alone decides.

use crate::cache::freshness::{is_stale, Staleness};
use crate::cache::kind::RecordKind;
use crate::cache::manifest::Manifest;
use crate::error::{BacklogError, BacklogResult};
use crate::source::DataSource;
use crate::store::CacheStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Loads, refreshes and edits the manifest
pub struct IndexManager {
    store: Arc<CacheStore>,
    source: Arc<dyn DataSource>,
    max_age: Staleness,
}

impl IndexManager {
    pub fn new(store: Arc<CacheStore>, source: Arc<dyn DataSource>, max_age_hours: f64) -> Self {
        Self {
            store,
            source,
            max_age: Staleness::max_age_hours(max_age_hours),
        }
    }

    /// Current manifest, refreshed from the remote source when warranted
    ///
    /// With `force_fetch` the manifest is downloaded unconditionally.
    pub async fn get_manifest(&self, force_fetch: bool) -> BacklogResult<Manifest> {
        let _guard = self.store.lock().await;
        self.refresh(force_fetch).await
    }

    /// Remove `id` from the manifest, returning whether it was present
    ///
    /// Edits and persists `manifest` when given, otherwise the stored copy.
    pub async fn remove_entry(
        &self,
        kind: RecordKind,
        id: &str,
        manifest: Option<&mut Manifest>,
    ) -> BacklogResult<bool> {
        let _guard = self.store.lock().await;
        match manifest {
            Some(manifest) => self.remove_from(kind, id, manifest).await,
            None => {
                let mut manifest = self.store.load_manifest().await?;
                self.remove_from(kind, id, &mut manifest).await
            }
        }
    }

    /// Refresh without taking the store lock; callers must hold it
    pub(crate) async fn refresh(&self, force_fetch: bool) -> BacklogResult<Manifest> {
        let mut manifest = self.store.load_manifest().await?;

        if !force_fetch && !self.needs_download(&mut manifest).await? {
            return Ok(manifest);
        }

        self.download(manifest).await
    }

    /// Remove and persist without taking the store lock; callers must hold it
    pub(crate) async fn remove_from(
        &self,
        kind: RecordKind,
        id: &str,
        manifest: &mut Manifest,
    ) -> BacklogResult<bool> {
        if !manifest.remove(kind, id) {
            return Ok(false);
        }

        self.store.save_manifest(manifest).await?;
        debug!("Removed {}/{} from index", kind, id);
        Ok(true)
    }

    async fn needs_download(&self, manifest: &mut Manifest) -> BacklogResult<bool> {
        if !is_stale(Some(&*manifest), &self.max_age) {
            debug!("Index checked recently, using cached copy");
            return Ok(false);
        }

        let changed_at = match self.source.index_last_modified().await {
            Ok(changed_at) => changed_at,
            Err(e) => {
                warn!("Index change check failed, refreshing by age: {}", e);
                return Ok(true);
            }
        };

        if is_stale(Some(&*manifest), &Staleness::UpdatedAt(changed_at)) {
            debug!("Index changed upstream at {}", changed_at);
            return Ok(true);
        }

        debug!("Index unchanged since {}, extending cached copy", changed_at);
        manifest.last_updated = Some(Utc::now());
        self.store.save_manifest(manifest).await?;
        Ok(false)
    }

    /// Download, migrate and persist the manifest; keeps `cached` on failure
    async fn download(&self, cached: Manifest) -> BacklogResult<Manifest> {
        let fetched = self.source.fetch_index().await.and_then(|value| {
            Manifest::from_value(value)
                .map_err(|e| BacklogError::decode(self.source.describe(), e.to_string()))
        });

        let mut manifest = match fetched {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Failed to download index, keeping cached copy: {}", e);
                return Ok(cached);
            }
        };

        manifest.last_updated = Some(Utc::now());
        self.store.save_manifest(&manifest).await?;

        info!(
            "Downloaded index: {} scenes, {} performers",
            manifest.scenes.len(),
            manifest.performers.len()
        );
        Ok(manifest)
    }
}
