//! # InfoMate Index
//!
//! In-memory lookup, ordering and search primitives for record stores.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Index Layer                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ Hash Index  │    │   Sorter    │    │  Searcher   │     │
//! │  │ (key → pos) │    │ (partition, │    │ (linear,    │     │
//! │  │  chained    │    │   merge)    │    │  binary,    │     │
//! │  │             │    │             │    │  substring) │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `hash_index`: fixed-bucket chained hash table keyed by strings
//! - `sort`: non-mutating comparator sorts
//! - `search`: scans, binary search, substring matching, keywords

pub mod hash_index;
pub mod search;
pub mod sort;

pub use hash_index::{rolling_hash, HashIndex, IndexStats, DEFAULT_BUCKET_COUNT};
pub use search::{binary_search_by, extract_keywords, linear_search, string_match};
pub use sort::{merge_sort, partition_sort, sort};
