//! Scripted data source for cache tests

use crate::cache::kind::RecordKind;
use crate::cache::object::ObjectCache;
use crate::error::{BacklogError, BacklogResult};
use crate::source::DataSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted response for one record
#[derive(Clone)]
pub(crate) enum Reply {
    Payload(Value),
    NotFound,
    Unavailable,
}

/// In-memory [`DataSource`] with call counters
#[derive(Default)]
pub(crate) struct MockSource {
    index: Mutex<Option<Value>>,
    last_modified: Mutex<Option<DateTime<Utc>>>,
    objects: Mutex<HashMap<String, Reply>>,
    index_calls: AtomicUsize,
    metadata_calls: AtomicUsize,
    object_calls: AtomicUsize,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `index` from `fetch_index`; without one the download fails
    pub fn with_index(self, index: Value) -> Self {
        *self.index.lock().unwrap() = Some(index);
        self
    }

    /// Report `at` as the last index change; without one the check fails
    pub fn with_last_modified(self, at: DateTime<Utc>) -> Self {
        *self.last_modified.lock().unwrap() = Some(at);
        self
    }

    pub fn with_object(self, kind: RecordKind, id: &str, reply: Reply) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert(ObjectCache::key(kind, id), reply);
        self
    }

    pub fn set_object(&self, kind: RecordKind, id: &str, reply: Reply) {
        self.objects
            .lock()
            .unwrap()
            .insert(ObjectCache::key(kind, id), reply);
    }

    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn object_calls(&self) -> usize {
        self.object_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.index_calls() + self.metadata_calls() + self.object_calls()
    }
}

#[async_trait]
impl DataSource for MockSource {
    async fn fetch_index(&self) -> BacklogResult<Value> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        self.index
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| BacklogError::SourceStatus {
                url: "mock://index.json".to_string(),
                status: 503,
            })
    }

    async fn fetch_object(&self, kind: RecordKind, id: &str) -> BacklogResult<Map<String, Value>> {
        self.object_calls.fetch_add(1, Ordering::SeqCst);
        let url = format!("mock://{}", ObjectCache::key(kind, id));
        let reply = self
            .objects
            .lock()
            .unwrap()
            .get(&ObjectCache::key(kind, id))
            .cloned()
            .unwrap_or(Reply::NotFound);

        match reply {
            Reply::Payload(Value::Object(fields)) => Ok(fields),
            Reply::Payload(_) => Err(BacklogError::decode(url, "not an object")),
            Reply::NotFound => Err(BacklogError::SourceNotFound { url }),
            Reply::Unavailable => Err(BacklogError::SourceTransport {
                url,
                reason: "connection reset".to_string(),
            }),
        }
    }

    async fn index_last_modified(&self) -> BacklogResult<DateTime<Utc>> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        let last_modified = *self.last_modified.lock().unwrap();
        last_modified.ok_or_else(|| BacklogError::SourceStatus {
            url: "mock://commits".to_string(),
            status: 403,
        })
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
