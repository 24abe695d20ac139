//! # Hash Index
//!
//! Fixed-size chained hash table from string keys to record handles.
//!
//! ## Layout
//!
//! ```text
//!  bucket_of(key) = |h| mod N        h = fold(h * 31 + unit) over UTF-16 units (i32, wrapping)
//!
//!  ┌─────┐
//!  │  0  │ ──> [ ("http://a.com/1", 0) ]
//!  ├─────┤
//!  │  1  │ ──> [ ]
//!  ├─────┤
//!  │  2  │ ──> [ ("http://b.com", 3), ("http://x.org/7", 1) ]   (chain, scanned linearly)
//!  ├─────┤
//!  │ ... │
//!  └─────┘
//! ```
//!
//! The bucket count is fixed at construction. There is no resize, so once the
//! load grows well past the bucket count lookups degrade toward a linear scan
//! of a long chain. That ceiling is accepted for the record volumes a single
//! client accumulates.

/// Bucket count used when none is configured
pub const DEFAULT_BUCKET_COUNT: usize = 100;

/// 32-bit rolling string hash.
///
/// Deterministic across runs and platforms; equal keys always land in the
/// same bucket. Not collision resistant.
#[inline]
pub fn rolling_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

/// Occupancy snapshot of a [`HashIndex`]
#[derive(Debug, Clone, PartialEq)]
pub struct IndexStats {
    pub entries: usize,
    pub bucket_count: usize,
    pub used_buckets: usize,
    pub longest_chain: usize,
    pub load_factor: f64,
}

/// Chained hash index with a fixed bucket count.
///
/// Keys compare by exact, case-sensitive string equality.
#[derive(Debug, Clone)]
pub struct HashIndex<V> {
    buckets: Vec<Vec<Entry<V>>>,
    len: usize,
}

impl<V> Default for HashIndex<V> {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET_COUNT)
    }
}

impl<V> HashIndex<V> {
    /// Create an index with `bucket_count` buckets (at least one)
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Vec::new);
        Self { buckets, len: 0 }
    }

    #[inline]
    fn bucket_of(&self, key: &str) -> usize {
        rolling_hash(key).unsigned_abs() as usize % self.buckets.len()
    }

    /// Insert or overwrite. Returns the previous value when the key existed;
    /// only a new key increases [`len`](Self::len).
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        let idx = self.bucket_of(key);
        let bucket = &mut self.buckets[idx];

        if let Some(entry) = bucket.iter_mut().find(|e| e.key == key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }

        bucket.push(Entry {
            key: key.to_string(),
            value,
        });
        self.len += 1;
        None
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    /// Remove `key`, keeping the rest of its bucket in order
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.bucket_of(key);
        let bucket = &mut self.buckets[idx];
        let pos = bucket.iter().position(|e| e.key == key)?;
        self.len -= 1;
        Some(bucket.remove(pos).value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in bucket order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.iter().flatten().map(|e| e.key.as_str())
    }

    /// Values in bucket order
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.buckets.iter().flatten().map(|e| &e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .map(|e| (e.key.as_str(), &e.value))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Drop every entry, keeping the bucket count
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.len = 0;
    }

    pub fn stats(&self) -> IndexStats {
        let used_buckets = self.buckets.iter().filter(|b| !b.is_empty()).count();
        let longest_chain = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        IndexStats {
            entries: self.len,
            bucket_count: self.buckets.len(),
            used_buckets,
            longest_chain,
            load_factor: self.len as f64 / self.buckets.len() as f64,
        }
    }
}
