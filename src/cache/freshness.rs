//! Staleness decisions for cached values
//!
//! | Signal | Stale when |
//! |--------|------------|
//! | `ContentHash(h)` | no stored hash, or stored hash != `h` |
//! | `UpdatedAt(t)` | no `lastUpdated`, or `t` is strictly later |
//! | `MaxAge(d)` | no `lastUpdated`, or `now >= lastUpdated + d` |
//!
//! A missing cached value is always stale.

use crate::cache::manifest::Manifest;
use crate::cache::object::DataObject;
use chrono::{DateTime, Duration, Utc};

/// Provenance a cached value carries for staleness checks
pub trait Stamped {
    fn content_hash(&self) -> Option<&str>;
    fn last_updated(&self) -> Option<DateTime<Utc>>;
}

impl Stamped for DataObject {
    fn content_hash(&self) -> Option<&str> {
        self.content_hash.as_deref()
    }

    fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

impl Stamped for Manifest {
    fn content_hash(&self) -> Option<&str> {
        None
    }

    fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

/// What a cached value is compared against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// Current upstream content hash
    ContentHash(String),
    /// Instant the upstream value last changed
    UpdatedAt(DateTime<Utc>),
    /// Maximum age since the value was stamped
    MaxAge(Duration),
}

impl Staleness {
    pub fn content_hash(hash: impl Into<String>) -> Self {
        Self::ContentHash(hash.into())
    }

    /// Age threshold in (possibly fractional) hours
    ///
    /// Saturates: thresholds past the representable range never expire,
    /// negative or NaN thresholds always do.
    pub fn max_age_hours(hours: f64) -> Self {
        let millis = (hours * 3_600_000.0).round();
        if millis.is_nan() || millis <= 0.0 {
            return Self::MaxAge(Duration::zero());
        }
        Self::MaxAge(Duration::try_milliseconds(millis as i64).unwrap_or(Duration::MAX))
    }
}

/// Whether `cached` must be refreshed under `signal`, evaluated now
pub fn is_stale<T: Stamped>(cached: Option<&T>, signal: &Staleness) -> bool {
    is_stale_at(cached, signal, Utc::now())
}

/// Whether `cached` must be refreshed under `signal`, evaluated at `now`
pub fn is_stale_at<T: Stamped>(cached: Option<&T>, signal: &Staleness, now: DateTime<Utc>) -> bool {
    let Some(cached) = cached else {
        return true;
    };

    match signal {
        Staleness::ContentHash(hash) => cached.content_hash() != Some(hash.as_str()),
        Staleness::UpdatedAt(updated_at) => match cached.last_updated() {
            Some(last) => *updated_at > last,
            None => true,
        },
        Staleness::MaxAge(max_age) => match cached.last_updated() {
            // Expiry past the end of time never arrives
            Some(last) => last
                .checked_add_signed(*max_age)
                .is_some_and(|expiry| now >= expiry),
            None => true,
        },
    }
}
