//! Remote data source abstraction
//!
//! The backlog data lives in a static file tree:
//! - `{base}/index.json`: the manifest
//! - `{base}/{kind}s/{id[0..2]}/{id}.json`: one payload per record
//!
//! plus a commit-metadata endpoint that reports when `index.json` last
//! changed, so freshness can be checked without downloading the manifest.

mod http;

pub use http::HttpSource;

use crate::cache::kind::RecordKind;
use crate::error::BacklogResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Read-only access to the remote backlog data
///
/// A record that no longer has pending changes is reported as
/// [`BacklogError::SourceNotFound`](crate::error::BacklogError::SourceNotFound).
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Download the raw manifest JSON (legacy shapes are migrated by the caller)
    async fn fetch_index(&self) -> BacklogResult<Value>;

    /// Download one record's change payload
    async fn fetch_object(&self, kind: RecordKind, id: &str) -> BacklogResult<Map<String, Value>>;

    /// When the manifest file last changed upstream
    async fn index_last_modified(&self) -> BacklogResult<DateTime<Utc>>;

    /// Short description for diagnostics
    fn describe(&self) -> String;
}

/// Path of a record payload relative to the data root
pub fn object_path(kind: RecordKind, id: &str) -> String {
    let shard = id.get(..2).unwrap_or(id);
    format!("{}/{}/{}.json", kind.plural(), shard, id)
}
