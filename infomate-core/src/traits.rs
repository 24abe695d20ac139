//! # Core Traits
//!
//! Seams between the record stores and their collaborators:
//!
//! - [`Payload`]: schema-specific data carried by a record
//! - [`BlobStore`]: where serialized snapshots live
//! - [`Clock`]: source of record timestamps
//! - [`ScoringService`]: remote analysis, URL in, payload out

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::types::{AnalysisData, Timestamp};

/// Schema-specific record data.
///
/// Accessors resolve absent fields to their defaults so comparators and
/// filters never deal with missing values.
pub trait Payload: Clone + Serialize + DeserializeOwned {
    /// Numeric value used by score-ordered views
    fn score(&self) -> f64 {
        0.0
    }

    /// Secondary text searched by metadata queries
    fn metadata_text(&self) -> Option<&str> {
        None
    }
}

/// Key-addressed string storage for store snapshots.
///
/// Values are replaced wholesale on every save.
pub trait BlobStore: Send + Sync {
    /// Read the value stored under `key`, `Ok(None)` if nothing was saved
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Drop the value stored under `key`
    fn remove(&self, key: &str) -> Result<()>;
}

/// Time source for record timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Hand-driven clock, millisecond resolution
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(start_millis),
        }
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set_millis(&self, millis: i64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst))
            .single()
            .unwrap_or_default()
    }
}

/// Remote scoring backend
pub trait ScoringService {
    fn analyze(&self, url: &str) -> Result<AnalysisData>;
}
