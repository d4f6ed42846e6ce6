//! Cached detail payloads
//!
//! A [`DataObject`] keeps the upstream fields verbatim (in upstream order) plus
//! two provenance fields stamped at fetch time. Typed views for presentation
//! are decoded on demand.

use crate::cache::kind::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field names that never count as pending-change labels
const NON_CHANGE_FIELDS: &[&str] = &["contentHash", "lastUpdated", "comments"];

/// Full pending-change payload for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataObject {
    /// Manifest content hash at fetch time; absent for legacy entries
    #[serde(
        rename = "contentHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub content_hash: Option<String>,

    /// When the payload was fetched
    #[serde(
        rename = "lastUpdated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,

    /// Kind-specific change fields as served upstream
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DataObject {
    /// Stamp a freshly fetched payload with its provenance
    pub fn fetched(
        mut fields: Map<String, Value>,
        content_hash: Option<String>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        // retain keeps upstream order; remove would swap
        fields.retain(|key, _| key != "contentHash" && key != "lastUpdated");
        Self {
            content_hash,
            last_updated: Some(fetched_at),
            fields,
        }
    }

    /// Top-level field names describing what is pending, in upstream order
    pub fn change_labels(&self) -> Vec<String> {
        self.fields
            .keys()
            .filter(|key| !NON_CHANGE_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect()
    }

    /// Decode the fields as scene changes
    pub fn scene(&self) -> Result<SceneChanges, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }

    /// Decode the fields as performer changes
    pub fn performer(&self) -> Result<PerformerChanges, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

/// Proposed changes to a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneChanges {
    pub title: Option<String>,
    pub date: Option<String>,
    /// Seconds
    pub duration: Option<u64>,
    pub performers: Option<PerformerEdits>,
    /// `[id, name]`; id is null when the studio does not exist yet
    pub studio: Option<(Option<String>, String)>,
    pub url: Option<String>,
    pub details: Option<String>,
    pub director: Option<String>,
    pub image: Option<String>,
    pub fingerprints: Vec<FingerprintChange>,
    pub comments: Vec<String>,
}

/// Performer add/remove/update lists for a scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformerEdits {
    pub remove: Vec<PerformerRef>,
    pub append: Vec<PerformerRef>,
    pub update: Vec<PerformerRef>,
}

/// A performer mentioned in a scene edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformerRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub disambiguation: Option<String>,
    pub appearance: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A fingerprint reported as wrongly attached
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintChange {
    pub algorithm: String,
    pub hash: String,
    pub correct_scene_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Proposed changes to a performer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformerChanges {
    pub duplicates: Vec<String>,
    pub duplicate_of: Option<String>,
}

/// `{kind}/{id}` -> data object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectCache(BTreeMap<String, DataObject>);

impl ObjectCache {
    /// Cache key for a record
    pub fn key(kind: RecordKind, id: &str) -> String {
        format!("{}/{}", kind, id)
    }

    pub fn get(&self, kind: RecordKind, id: &str) -> Option<&DataObject> {
        self.0.get(&Self::key(kind, id))
    }

    pub fn contains(&self, kind: RecordKind, id: &str) -> bool {
        self.0.contains_key(&Self::key(kind, id))
    }

    pub fn insert(&mut self, kind: RecordKind, id: &str, object: DataObject) {
        self.0.insert(Self::key(kind, id), object);
    }

    /// Remove a record, returning whether it was cached
    pub fn remove(&mut self, kind: RecordKind, id: &str) -> bool {
        self.0.remove(&Self::key(kind, id)).is_some()
    }

    /// Number of cached objects of one kind
    pub fn count(&self, kind: RecordKind) -> usize {
        let prefix = format!("{}/", kind);
        self.0.keys().filter(|key| key.starts_with(&prefix)).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DataObject)> {
        self.0.iter()
    }
}
