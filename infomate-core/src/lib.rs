//! # InfoMate Core
//!
//! Building blocks shared by the InfoMate record stores:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  infomate-core                  │
//! ├─────────────────────────────────────────────────┤
//! │  • types   - Records, payloads, submissions     │
//! │  • traits  - Payload, BlobStore, Clock, Scoring │
//! │  • error   - Error handling                     │
//! │  • config  - Store/index/logging configuration  │
//! │  • url     - URL parsing and normalization      │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use config::{Config, IndexConfig, SortAlgorithm};
pub use error::{Error, Result};
pub use traits::{BlobStore, Clock, ManualClock, Payload, ScoringService, SystemClock};
pub use types::{
    AnalysisData, AnalysisPayload, AnalysisSubmission, ArticleMetadata, EvaluationPayload,
    EvaluationSubmission, Record, RecordId, ReportPayload, ReportSubmission, SearchField,
    SortKey, SortOrder, Timestamp,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
