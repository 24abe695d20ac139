//! # Record Store
//!
//! Hash-indexed, deduplicating record store over an ordered log.
//!
//! ## Write Path
//!
//! ```text
//!  upsert(url, payload)
//!        │
//!        ▼
//!  HashIndex.get(url) ──hit──> log[pos].touch(payload)      (count += 1)
//!        │
//!       miss
//!        ▼
//!  log.append(Record::new(next_id, ...)) ──> HashIndex.insert(url, pos)
//!        │
//!        ▼
//!  persist: whole log as JSON ──> BlobStore.save(storage_key)   (failure logged, not returned)
//! ```
//!
//! Reads (`get_by_key`, `get_all`, `sorted`, `search`, statistics) only touch
//! memory.
//!
//! ## Consistency
//!
//! Every key in the index maps to the position of the record carrying that
//! key, and every record in the log is indexed. Each public method leaves both
//! structures in that state before returning.
//!
//! ## Threading
//!
//! Mutations take `&mut self`; a store has one owner. Hosts that need to share
//! it across threads wrap the whole store via [`RecordStore::into_shared`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use infomate_core::{
    BlobStore, Clock, IndexConfig, Payload, Record, RecordId, SearchField, SortAlgorithm,
    SortKey, SortOrder, SystemClock,
};
use infomate_index::{binary_search_by, linear_search, merge_sort, sort, HashIndex, IndexStats};

use crate::log::OrderedLog;
use crate::view::{comparator, matches_query, sort_value};

/// A store shared between threads, serialized by one lock around the façade
pub type SharedStore<P> = Arc<Mutex<RecordStore<P>>>;

pub struct RecordStore<P: Payload> {
    storage_key: String,
    blob: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
    index: HashIndex<usize>,
    log: OrderedLog<P>,
    sort_algorithm: SortAlgorithm,
}

impl<P: Payload> RecordStore<P> {
    /// Open the store persisted under `storage_key`.
    ///
    /// A missing, unreadable or unparsable snapshot opens as an empty store.
    pub fn open(
        blob: Arc<dyn BlobStore>,
        storage_key: impl Into<String>,
        config: &IndexConfig,
    ) -> Self {
        Self::open_with_clock(blob, storage_key, config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(
        blob: Arc<dyn BlobStore>,
        storage_key: impl Into<String>,
        config: &IndexConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let storage_key = storage_key.into();
        let records = Self::load_snapshot(blob.as_ref(), &storage_key);

        let mut store = Self {
            storage_key,
            blob,
            clock,
            index: HashIndex::new(config.bucket_count),
            log: OrderedLog::new(),
            sort_algorithm: config.sort_algorithm,
        };
        store.rebuild(records);

        info!(
            "Opened record store '{}' with {} records ({} buckets)",
            store.storage_key,
            store.log.len(),
            store.index.bucket_count()
        );
        store
    }

    fn load_snapshot(blob: &dyn BlobStore, key: &str) -> Vec<Record<P>> {
        let raw = match blob.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to load snapshot '{}', starting empty: {}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Corrupt snapshot '{}', starting empty: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Re-index loaded records. Later duplicates of a key are dropped so the
    /// one-record-per-key invariant holds even for hand-edited snapshots.
    fn rebuild(&mut self, records: Vec<Record<P>>) {
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if self.index.contains_key(&record.url) {
                warn!(
                    "Dropping duplicate record {} for '{}' in snapshot '{}'",
                    record.id, record.url, self.storage_key
                );
                continue;
            }
            self.index.insert(&record.url, kept.len());
            kept.push(record);
        }
        self.log = OrderedLog::from_records(kept);
    }

    fn persist(&self) {
        let snapshot = match serde_json::to_string(self.log.records()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to serialize '{}', keeping in-memory state: {}", self.storage_key, e);
                return;
            }
        };

        if let Err(e) = self.blob.save(&self.storage_key, &snapshot) {
            warn!("Failed to persist '{}', keeping in-memory state: {}", self.storage_key, e);
        }
    }

    /// Insert or update the record for `key` with a payload built from the
    /// current one (if any). Returns a copy of the stored record.
    pub fn upsert_with<F>(&mut self, key: &str, build: F) -> Record<P>
    where
        F: FnOnce(Option<&P>) -> P,
    {
        let now = self.clock.now();
        let position = self.index.get(key).copied();

        let record = match position.and_then(|pos| self.log.get_mut(pos)) {
            Some(existing) => {
                let payload = build(Some(&existing.payload));
                existing.touch(payload, now);
                debug!(
                    "Updated record {} for '{}' (seen {} times)",
                    existing.id, key, existing.occurrence_count
                );
                existing.clone()
            }
            None => {
                let record = Record::new(self.log.allocate_id(), key, build(None), now);
                let position = self.log.append(record.clone());
                self.index.insert(key, position);
                debug!("Inserted record {} for '{}'", record.id, key);
                record
            }
        };

        self.persist();
        record
    }

    /// Insert or update the record for `key`, replacing its payload
    pub fn upsert(&mut self, key: &str, payload: P) -> Record<P> {
        self.upsert_with(key, |_| payload)
    }

    /// Point lookup through the hash index
    pub fn get_by_key(&self, key: &str) -> Option<&Record<P>> {
        let position = *self.index.get(key)?;
        self.log.get(position)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Lookup by id (linear scan)
    pub fn get(&self, id: RecordId) -> Option<&Record<P>> {
        let position = self.log.position_of(id)?;
        self.log.get(position)
    }

    /// All records in insertion order
    pub fn get_all(&self) -> &[Record<P>] {
        self.log.records()
    }

    /// Delete the record with `id`. Returns false, without persisting, when
    /// no such record exists.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let Some(position) = self.log.position_of(id) else {
            debug!("Delete of unknown record {} in '{}'", id, self.storage_key);
            return false;
        };
        let Some(removed) = self.log.remove(position) else {
            return false;
        };

        self.index.remove(&removed.url);
        for (offset, record) in self.log.records()[position..].iter().enumerate() {
            self.index.insert(&record.url, position + offset);
        }

        debug!("Deleted record {} for '{}'", removed.id, removed.url);
        self.persist();
        true
    }

    /// Drop every record and persist the empty state
    pub fn clear(&mut self) {
        let dropped = self.log.len();
        self.log.clear();
        self.index.clear();
        self.persist();
        info!("Cleared {} records from '{}'", dropped, self.storage_key);
    }

    /// Records ordered by `key`, using the configured algorithm
    pub fn sorted(&self, key: SortKey, order: SortOrder) -> Vec<&Record<P>> {
        self.sorted_with(key, order, self.sort_algorithm)
    }

    pub fn sorted_with(
        &self,
        key: SortKey,
        order: SortOrder,
        algorithm: SortAlgorithm,
    ) -> Vec<&Record<P>> {
        let view: Vec<&Record<P>> = self.log.records().iter().collect();
        sort(&view, algorithm, comparator(key, order))
    }

    /// Sorted view from loosely typed selectors. Unknown sort keys order by
    /// date; any order other than `asc` is descending.
    pub fn sorted_by_name(&self, sort_by: &str, order: &str) -> Vec<&Record<P>> {
        self.sorted(SortKey::parse_lenient(sort_by), SortOrder::parse_lenient(order))
    }

    /// Free-text search. A blank query returns every record.
    pub fn search(&self, query: &str, field: SearchField) -> Vec<&Record<P>> {
        let view: Vec<&Record<P>> = self.log.records().iter().collect();
        if query.trim().is_empty() {
            return view;
        }
        linear_search(&view, |record| matches_query(record, query, field))
    }

    /// A record whose `key` value equals `value` exactly, found by binary
    /// search over a stable ascending view.
    pub fn find_exact(&self, key: SortKey, value: f64) -> Option<&Record<P>> {
        let view: Vec<&Record<P>> = self.log.records().iter().collect();
        let sorted = merge_sort(&view, &comparator(key, SortOrder::Asc));
        let position = binary_search_by(&sorted, |record| sort_value(record, key).total_cmp(&value))?;
        Some(sorted[position])
    }

    /// Keys currently held by the hash index
    pub fn index_keys(&self) -> Vec<&str> {
        self.index.keys().collect()
    }

    pub fn index_stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn into_shared(self) -> SharedStore<P> {
        Arc::new(Mutex::new(self))
    }
}

impl<P: Payload> std::fmt::Debug for RecordStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("storage_key", &self.storage_key)
            .field("records", &self.log.len())
            .field("buckets", &self.index.bucket_count())
            .field("sort_algorithm", &self.sort_algorithm)
            .finish()
    }
}
