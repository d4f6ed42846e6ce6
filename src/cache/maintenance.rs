//! Maintenance operations: clear, forced refetch, introspection
//!
//! Clearing and refetching are restricted to maintainers, identified by the
//! user's displayed name. Reports and status lookups are open to everyone.

use crate::cache::index::IndexManager;
use crate::cache::kind::RecordKind;
use crate::cache::manifest::Manifest;
use crate::cache::object::ObjectCache;
use crate::cache::objects::ObjectCacheManager;
use crate::error::{BacklogError, BacklogResult};
use crate::store::CacheStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// Who may run maintainer-only operations
#[derive(Debug, Clone, Default)]
pub struct MaintainerGate {
    maintainers: Vec<String>,
    identity: Option<String>,
}

impl MaintainerGate {
    pub fn new(maintainers: Vec<String>, identity: Option<String>) -> Self {
        Self {
            maintainers,
            identity,
        }
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn is_maintainer(&self) -> bool {
        self.identity
            .as_deref()
            .is_some_and(|name| self.maintainers.iter().any(|m| m == name))
    }

    /// Refuse `action` unless the current identity is a maintainer
    pub fn authorize(&self, action: &str) -> BacklogResult<()> {
        if self.is_maintainer() {
            return Ok(());
        }

        Err(BacklogError::NotMaintainer {
            action: action.to_string(),
            identity: self.identity.clone().unwrap_or_else(|| "anonymous".to_string()),
        })
    }
}

/// Where a single record stands in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    /// The manifest has never been fetched
    Unknown,
    /// Not in the manifest: nothing pending, or evicted after a 404
    AbsentUpstream,
    /// In the manifest, no detail payload cached
    PendingNoDetail,
    /// In the manifest with a cached detail payload
    PendingWithDetail,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::AbsentUpstream => "absent-upstream",
            Self::PendingNoDetail => "pending-no-detail",
            Self::PendingWithDetail => "pending-with-detail",
        };
        write!(f, "{}", name)
    }
}

/// Snapshot of both persisted stores
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub backend: String,
    pub index: Manifest,
    pub objects: ObjectCache,
}

impl CacheReport {
    /// Manifest entries of one kind
    pub fn indexed(&self, kind: RecordKind) -> usize {
        self.index.entries(kind).len()
    }

    /// Cached objects of one kind
    pub fn cached(&self, kind: RecordKind) -> usize {
        self.objects.count(kind)
    }
}

/// Cache maintenance composed from the index and object managers
pub struct Maintenance {
    store: Arc<CacheStore>,
    index: Arc<IndexManager>,
    objects: Arc<ObjectCacheManager>,
    gate: MaintainerGate,
}

impl Maintenance {
    pub fn new(
        store: Arc<CacheStore>,
        index: Arc<IndexManager>,
        objects: Arc<ObjectCacheManager>,
        gate: MaintainerGate,
    ) -> Self {
        Self {
            store,
            index,
            objects,
            gate,
        }
    }

    pub fn gate(&self) -> &MaintainerGate {
        &self.gate
    }

    /// Delete both persisted stores
    pub async fn clear_all(&self) -> BacklogResult<()> {
        self.gate.authorize("Clearing the cache")?;

        let _guard = self.store.lock().await;
        let (index, objects) = self.store.clear().await?;
        info!(
            "Cache cleared (index: {}, objects: {})",
            if index { "removed" } else { "absent" },
            if objects { "removed" } else { "absent" }
        );
        Ok(())
    }

    /// Re-download the manifest, then refetch one record unconditionally
    ///
    /// Returns whether a payload was stored.
    pub async fn force_refetch(&self, kind: RecordKind, id: &str) -> BacklogResult<bool> {
        self.gate.authorize("Refetching records")?;

        let _guard = self.store.lock().await;
        let mut manifest = self.index.refresh(true).await?;
        let mut objects = self.store.load_objects().await?;

        let stored = self
            .objects
            .fetch_and_store(kind, id, &mut manifest, &mut objects)
            .await?
            .is_some();

        if stored {
            info!("Refetched {}/{}", kind, id);
        } else {
            warn!("Refetch of {}/{} stored nothing", kind, id);
        }
        Ok(stored)
    }

    /// Dump both persisted stores
    pub async fn report(&self) -> BacklogResult<CacheReport> {
        let _guard = self.store.lock().await;
        Ok(CacheReport {
            backend: self.store.backend_name().to_string(),
            index: self.store.load_manifest().await?,
            objects: self.store.load_objects().await?,
        })
    }

    /// Where a record stands, read from the persisted stores without network access
    pub async fn status(&self, kind: RecordKind, id: &str) -> BacklogResult<RecordStatus> {
        let _guard = self.store.lock().await;
        let manifest = self.store.load_manifest().await?;

        if manifest.last_updated.is_none() && manifest.is_empty() {
            return Ok(RecordStatus::Unknown);
        }
        if !manifest.contains(kind, id) {
            return Ok(RecordStatus::AbsentUpstream);
        }

        let objects = self.store.load_objects().await?;
        if objects.contains(kind, id) {
            Ok(RecordStatus::PendingWithDetail)
        } else {
            Ok(RecordStatus::PendingNoDetail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::manifest::FingerprintEntry;
    use crate::store::MemoryStore;
    use crate::testing::{MockSource, Reply};
    use chrono::Utc;
    use serde_json::json;

    fn maintenance(source: MockSource, identity: Option<&str>) -> (Maintenance, Arc<CacheStore>) {
        let store = Arc::new(CacheStore::new(MemoryStore::new()));
        let source = Arc::new(source);
        let index = Arc::new(IndexManager::new(store.clone(), source.clone(), 1.0));
        let objects = Arc::new(ObjectCacheManager::new(
            store.clone(),
            source,
            index.clone(),
        ));
        let gate = MaintainerGate::new(
            vec!["keeper".to_string()],
            identity.map(str::to_string),
        );
        (Maintenance::new(store.clone(), index, objects, gate), store)
    }

    #[test]
    fn gate_checks_identity() {
        let gate = MaintainerGate::new(vec!["keeper".to_string()], Some("keeper".to_string()));
        assert!(gate.is_maintainer());
        assert!(gate.authorize("x").is_ok());

        let gate = MaintainerGate::new(vec!["keeper".to_string()], Some("visitor".to_string()));
        assert!(matches!(
            gate.authorize("x"),
            Err(BacklogError::NotMaintainer { ref identity, .. }) if identity == "visitor"
        ));

        assert!(!MaintainerGate::new(vec!["keeper".to_string()], None).is_maintainer());
    }

    #[tokio::test]
    async fn clear_requires_maintainer() {
        let (maintenance, store) = maintenance(MockSource::new(), Some("visitor"));
        store.save_manifest(&Manifest::default()).await.unwrap();

        assert!(maintenance.clear_all().await.is_err());
        assert!(store.clear().await.unwrap().0);
    }

    #[tokio::test]
    async fn clear_resets_record_status() {
        let (maintenance, store) = maintenance(MockSource::new(), Some("keeper"));
        let mut manifest = Manifest::default();
        manifest.insert(RecordKind::Scene, "s1", FingerprintEntry::new("h", ["title"]));
        manifest.last_updated = Some(Utc::now());
        store.save_manifest(&manifest).await.unwrap();

        assert_eq!(
            maintenance.status(RecordKind::Scene, "s1").await.unwrap(),
            RecordStatus::PendingNoDetail
        );

        maintenance.clear_all().await.unwrap();

        assert_eq!(
            maintenance.status(RecordKind::Scene, "s1").await.unwrap(),
            RecordStatus::Unknown
        );
        let report = maintenance.report().await.unwrap();
        assert!(report.index.is_empty());
        assert!(report.objects.is_empty());
    }

    #[tokio::test]
    async fn force_refetch_bypasses_staleness() {
        let source = MockSource::new()
            .with_index(json!({ "scenes": { "s1": ["h", "title"] } }))
            .with_object(RecordKind::Scene, "s1", Reply::Payload(json!({ "title": "T" })));
        let (maintenance, _store) = maintenance(source, Some("keeper"));

        assert!(maintenance.force_refetch(RecordKind::Scene, "s1").await.unwrap());
        assert!(maintenance.force_refetch(RecordKind::Scene, "s1").await.unwrap());

        let report = maintenance.report().await.unwrap();
        assert_eq!(report.indexed(RecordKind::Scene), 1);
        assert_eq!(report.cached(RecordKind::Scene), 1);
        assert_eq!(report.backend, "memory");
        assert_eq!(
            maintenance.status(RecordKind::Scene, "s1").await.unwrap(),
            RecordStatus::PendingWithDetail
        );
    }

    #[tokio::test]
    async fn force_refetch_of_resolved_record_fails() {
        let source = MockSource::new().with_index(json!({ "scenes": { "s1": ["h", "title"] } }));
        let (maintenance, _store) = maintenance(source, Some("keeper"));

        assert!(!maintenance.force_refetch(RecordKind::Scene, "s1").await.unwrap());
        assert_eq!(
            maintenance.status(RecordKind::Scene, "s1").await.unwrap(),
            RecordStatus::AbsentUpstream
        );
    }

    #[tokio::test]
    async fn force_refetch_requires_maintainer() {
        let (maintenance, _store) = maintenance(MockSource::new(), None);
        let err = maintenance
            .force_refetch(RecordKind::Performer, "p1")
            .await
            .unwrap_err();
        assert!(matches!(err, BacklogError::NotMaintainer { .. }));
    }

    #[tokio::test]
    async fn refetch_and_lookup_do_not_lose_writes() {
        let source = MockSource::new()
            .with_index(json!({ "scenes": { "s1": ["h1", "title"], "s2": ["h2", "date"] } }))
            .with_object(RecordKind::Scene, "s1", Reply::Payload(json!({ "title": "A" })))
            .with_object(RecordKind::Scene, "s2", Reply::Payload(json!({ "date": "2020-01-01" })));
        let store = Arc::new(CacheStore::new(MemoryStore::new()));
        let source = Arc::new(source);
        let index = Arc::new(IndexManager::new(store.clone(), source.clone(), 1.0));
        let objects = Arc::new(ObjectCacheManager::new(
            store.clone(),
            source,
            index.clone(),
        ));
        let gate = MaintainerGate::new(vec!["keeper".to_string()], Some("keeper".to_string()));
        let maintenance = Maintenance::new(store.clone(), index, objects.clone(), gate);

        let (refetched, fetched) = tokio::join!(
            maintenance.force_refetch(RecordKind::Scene, "s1"),
            objects.get(RecordKind::Scene, "s2", None),
        );
        assert!(refetched.unwrap());
        assert!(fetched.unwrap().is_some());

        let stored = store.load_objects().await.unwrap();
        assert!(stored.contains(RecordKind::Scene, "s1"));
        assert!(stored.contains(RecordKind::Scene, "s2"));
    }
}
