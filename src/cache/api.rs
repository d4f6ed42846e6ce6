//! Read API consumed by the presentation layer

use crate::cache::index::IndexManager;
use crate::cache::kind::RecordKind;
use crate::cache::maintenance::{MaintainerGate, Maintenance};
use crate::cache::manifest::Manifest;
use crate::cache::object::DataObject;
use crate::cache::objects::ObjectCacheManager;
use crate::config::{Config, ConfigManager};
use crate::error::BacklogResult;
use crate::source::{DataSource, HttpSource};
use crate::store::{CacheStore, FileStore};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Tunables for a [`BacklogCache`]
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub index_max_age_hours: f64,
    pub maintainers: Vec<String>,
    pub identity: Option<String>,
}

impl CacheSettings {
    /// Settings from config; `identity` overrides `maintenance.identity`
    pub fn from_config(config: &Config, identity: Option<String>) -> Self {
        Self {
            index_max_age_hours: config.cache.index_max_age_hours,
            maintainers: config.maintenance.maintainers.clone(),
            identity: identity.or_else(|| config.maintenance.identity.clone()),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::from_config(&Config::default(), None)
    }
}

/// The backlog cache: one store, one source, the managers built on them
pub struct BacklogCache {
    index: Arc<IndexManager>,
    objects: Arc<ObjectCacheManager>,
    maintenance: Maintenance,
}

impl BacklogCache {
    pub fn new(
        store: Arc<CacheStore>,
        source: Arc<dyn DataSource>,
        settings: CacheSettings,
    ) -> Self {
        let index = Arc::new(IndexManager::new(
            store.clone(),
            source.clone(),
            settings.index_max_age_hours,
        ));
        let objects = Arc::new(ObjectCacheManager::new(
            store.clone(),
            source,
            index.clone(),
        ));
        let gate = MaintainerGate::new(settings.maintainers, settings.identity);
        let maintenance = Maintenance::new(store, index.clone(), objects.clone(), gate);

        Self {
            index,
            objects,
            maintenance,
        }
    }

    /// File-backed cache talking to the configured HTTP source
    pub async fn open(
        config: &Config,
        state_dir: Option<&Path>,
        identity: Option<String>,
    ) -> BacklogResult<Self> {
        let state_dir = ConfigManager::state_dir(config, state_dir);
        debug!("Using state directory {}", state_dir.display());

        let store = Arc::new(CacheStore::new(FileStore::open(state_dir).await?));
        let source = Arc::new(HttpSource::new(&config.source));
        Ok(Self::new(
            store,
            source,
            CacheSettings::from_config(config, identity),
        ))
    }

    /// The manifest, refreshed when stale (or unconditionally with `force_fetch`)
    pub async fn get_manifest(&self, force_fetch: bool) -> BacklogResult<Manifest> {
        self.index.get_manifest(force_fetch).await
    }

    /// Pending changes for one record, or `None` when nothing is pending or
    /// the fetch failed. Errors only surface for unusable persisted state.
    pub async fn get_data_for(
        &self,
        kind: RecordKind,
        id: &str,
        manifest: Option<&mut Manifest>,
    ) -> BacklogResult<Option<DataObject>> {
        self.objects.get(kind, id, manifest).await
    }

    pub fn index(&self) -> &IndexManager {
        &self.index
    }

    pub fn objects(&self) -> &ObjectCacheManager {
        &self.objects
    }

    pub fn maintenance(&self) -> &Maintenance {
        &self.maintenance
    }
}
