//! # InfoMate Storage
//!
//! Deduplicating record stores for analysis history, evaluations and reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RecordStore<P>                          │
//! │                                                              │
//! │   upsert / get_by_key / delete / clear / sorted / search     │
//! │                                                              │
//! │  ┌──────────────────┐        ┌──────────────────────────┐   │
//! │  │ HashIndex<usize> │──pos──>│     OrderedLog<P>        │   │
//! │  │   url → position │        │ records in insert order  │   │
//! │  └──────────────────┘        └────────────┬─────────────┘   │
//! │                                           │ JSON snapshot   │
//! └───────────────────────────────────────────┼─────────────────┘
//!                                             ▼
//!                                ┌──────────────────────────┐
//!                                │   BlobStore (memory /    │
//!                                │   one file per key)      │
//!                                └──────────────────────────┘
//! ```
//!
//! ## Instances
//!
//! - [`AnalysisHistory`]: scoring results, with statistics and caching
//! - [`EvaluationStore`]: 1-5 star ratings with feedback
//! - [`ReportStore`]: problem reports

pub mod blob;
pub mod context;
pub mod feedback;
pub mod history;
pub mod log;
pub mod store;
pub mod view;

pub use blob::{FileBlobStore, MemoryBlobStore};
pub use context::InfomateStores;
pub use feedback::{EvaluationStore, ReportStore};
pub use history::{analyze_cached, AnalysisHistory, HistoryStatistics};
pub use log::OrderedLog;
pub use store::{RecordStore, SharedStore};
