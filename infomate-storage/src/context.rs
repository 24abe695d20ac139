//! The three InfoMate stores, opened together over one blob store

use std::sync::Arc;

use tracing::info;

use infomate_core::{BlobStore, Clock, Config, SystemClock};

use crate::feedback::{EvaluationStore, ReportStore};
use crate::history::AnalysisHistory;
use crate::store::RecordStore;

/// Explicitly constructed store set handed to front ends
#[derive(Debug)]
pub struct InfomateStores {
    pub history: AnalysisHistory,
    pub evaluations: EvaluationStore,
    pub reports: ReportStore,
}

impl InfomateStores {
    pub fn open(config: &Config, blob: Arc<dyn BlobStore>) -> Self {
        Self::open_with_clock(config, blob, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: &Config, blob: Arc<dyn BlobStore>, clock: Arc<dyn Clock>) -> Self {
        let storage = &config.storage;
        let index = &config.index;

        let stores = Self {
            history: RecordStore::open_with_clock(
                blob.clone(),
                storage.history_key.clone(),
                index,
                clock.clone(),
            ),
            evaluations: RecordStore::open_with_clock(
                blob.clone(),
                storage.evaluation_key.clone(),
                index,
                clock.clone(),
            ),
            reports: RecordStore::open_with_clock(blob, storage.report_key.clone(), index, clock),
        };

        info!(
            "Opened stores: {} analyses, {} evaluations, {} reports",
            stores.history.len(),
            stores.evaluations.len(),
            stores.reports.len()
        );
        stores
    }
}
