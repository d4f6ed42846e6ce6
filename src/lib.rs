//! Backlog - pending-change cache for StashDB
//!
//! Keeps a local, self-healing copy of the community-curated backlog of
//! proposed scene and performer edits, fetched from a static data source.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod source;
pub mod store;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{BacklogCache, DataObject, Manifest, RecordKind};
pub use error::{BacklogError, BacklogResult};
