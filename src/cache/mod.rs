//! Two-tier cache of pending StashDB changes
//!
//! The manifest (index) says which records have pending changes and carries
//! a content hash per record; the object cache holds the full payloads.
//! The manifest is the authority on existence, the object cache on detail.
//!
//! # Record states
//!
//! | State | Manifest | Object cache |
//! |-------|----------|--------------|
//! | Unknown | never fetched | - |
//! | AbsentUpstream | no entry | no entry (evicted on read or on 404) |
//! | PendingNoDetail | entry | no entry |
//! | PendingWithDetail | entry | payload stamped with hash + fetch time |
//!
//! Clearing the cache returns every record to Unknown.

pub mod api;
pub mod freshness;
pub mod index;
pub mod kind;
pub mod maintenance;
pub mod manifest;
pub mod object;
pub mod objects;

pub use api::{BacklogCache, CacheSettings};
pub use freshness::{is_stale, is_stale_at, Staleness, Stamped};
pub use index::IndexManager;
pub use kind::RecordKind;
pub use maintenance::{CacheReport, MaintainerGate, Maintenance, RecordStatus};
pub use manifest::{migrate_legacy, FingerprintEntry, Manifest};
pub use object::{DataObject, ObjectCache, PerformerChanges, SceneChanges};
pub use objects::ObjectCacheManager;
