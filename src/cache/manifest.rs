//! The backlog manifest (index)
//!
//! Maps record ids to fingerprint entries: `[content_hash, ...labels]`.
//! Older stores held each entry as one comma-joined string of labels; those are
//! rewritten into the sequence shape when the manifest is loaded, so the legacy
//! shape never reaches the rest of the crate.

use crate::cache::kind::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One manifest entry: element 0 is the content hash (possibly empty),
/// the rest name the pending fields (`title`, `fingerprints`, `split`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FingerprintEntry(Vec<String>);

impl FingerprintEntry {
    /// Build an entry from a content hash and change labels
    pub fn new<I, S>(content_hash: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parts = vec![content_hash.into()];
        parts.extend(labels.into_iter().map(Into::into));
        Self(parts)
    }

    /// Convert a legacy comma-joined label string; the hash slot is left empty
    pub fn from_legacy(joined: &str) -> Self {
        Self::new("", joined.split(','))
    }

    /// Content hash, empty when the record has no detail payload
    pub fn content_hash(&self) -> &str {
        &self.0[0]
    }

    /// Change labels following the hash
    pub fn labels(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn has_hash(&self) -> bool {
        !self.content_hash().is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for FingerprintEntry {
    fn from(mut parts: Vec<String>) -> Self {
        if parts.is_empty() {
            parts.push(String::new());
        }
        Self(parts)
    }
}

impl From<FingerprintEntry> for Vec<String> {
    fn from(entry: FingerprintEntry) -> Self {
        entry.0
    }
}

/// Record id -> fingerprint entry, per kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub scenes: BTreeMap<String, FingerprintEntry>,

    #[serde(default)]
    pub performers: BTreeMap<String, FingerprintEntry>,

    /// When the manifest was last downloaded or confirmed unchanged
    #[serde(
        rename = "lastUpdated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Manifest {
    /// Decode a manifest from JSON, migrating legacy string entries first
    pub fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        migrate_legacy(&mut value);
        serde_json::from_value(value)
    }

    pub fn entries(&self, kind: RecordKind) -> &BTreeMap<String, FingerprintEntry> {
        match kind {
            RecordKind::Scene => &self.scenes,
            RecordKind::Performer => &self.performers,
        }
    }

    fn entries_mut(&mut self, kind: RecordKind) -> &mut BTreeMap<String, FingerprintEntry> {
        match kind {
            RecordKind::Scene => &mut self.scenes,
            RecordKind::Performer => &mut self.performers,
        }
    }

    pub fn entry(&self, kind: RecordKind, id: &str) -> Option<&FingerprintEntry> {
        self.entries(kind).get(id)
    }

    pub fn contains(&self, kind: RecordKind, id: &str) -> bool {
        self.entries(kind).contains_key(id)
    }

    pub fn insert(&mut self, kind: RecordKind, id: impl Into<String>, entry: FingerprintEntry) {
        self.entries_mut(kind).insert(id.into(), entry);
    }

    /// Remove an entry, returning whether it was present
    pub fn remove(&mut self, kind: RecordKind, id: &str) -> bool {
        self.entries_mut(kind).remove(id).is_some()
    }

    /// Total number of entries across both kinds
    pub fn len(&self) -> usize {
        self.scenes.len() + self.performers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty() && self.performers.is_empty()
    }
}

/// Rewrite legacy comma-joined entries into `["", label, ...]` in place
///
/// Entries already in sequence form are left alone, so repeated runs are
/// no-ops. Returns the number of entries rewritten.
pub fn migrate_legacy(value: &mut Value) -> usize {
    let mut migrated = 0;

    for kind in RecordKind::all() {
        let Some(section) = value.get_mut(kind.plural()).and_then(Value::as_object_mut) else {
            continue;
        };

        for entry in section.values_mut() {
            if let Value::String(joined) = entry {
                let upgraded = FingerprintEntry::from_legacy(joined);
                *entry = Value::from(Vec::<String>::from(upgraded));
                migrated += 1;
            }
        }
    }

    migrated
}
