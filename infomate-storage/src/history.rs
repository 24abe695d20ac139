//! # Analysis History
//!
//! The record store instance holding scoring results, keyed by article URL,
//! plus the aggregate statistics and the scoring cache built on it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use infomate_core::error::Result;
use infomate_core::{AnalysisData, AnalysisPayload, AnalysisSubmission, Record, ScoringService};

use crate::store::RecordStore;

pub type AnalysisHistory = RecordStore<AnalysisPayload>;

/// Aggregates over the whole history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStatistics {
    pub total: usize,
    /// Mean reliability score, one decimal
    pub avg_score: f64,
    pub fake_count: usize,
    pub real_count: usize,
    /// Share of fake verdicts as a rounded integer percentage
    pub fake_ratio: u32,
}

impl RecordStore<AnalysisPayload> {
    /// Record a scoring result, deduplicating by URL
    pub fn record_analysis(&mut self, submission: AnalysisSubmission) -> Record<AnalysisPayload> {
        let (url, payload) = submission.into_parts();
        self.upsert(&url, payload)
    }

    /// One pass over the log. Missing scores count as 0, missing verdicts as
    /// not fake; an empty history yields all zeros.
    pub fn statistics(&self) -> HistoryStatistics {
        let records = self.get_all();
        let total = records.len();
        if total == 0 {
            return HistoryStatistics::default();
        }

        let (score_sum, fake_count) = records.iter().fold((0.0, 0usize), |(sum, fakes), r| {
            (sum + r.payload.data.score(), fakes + usize::from(r.payload.data.is_fake()))
        });

        let avg_score = (score_sum / total as f64 * 10.0).round() / 10.0;
        let fake_ratio = (fake_count as f64 / total as f64 * 100.0).round() as u32;

        HistoryStatistics {
            total,
            avg_score,
            fake_count,
            real_count: total - fake_count,
            fake_ratio,
        }
    }
}

/// Score `url`, reusing a stored result when `use_cache` is set.
///
/// A cache hit returns the stored data and leaves the history untouched. On a
/// miss the service is called and its result recorded; service errors are
/// returned without touching the history.
pub fn analyze_cached<S>(
    history: &mut AnalysisHistory,
    service: &S,
    url: &str,
    use_cache: bool,
) -> Result<AnalysisData>
where
    S: ScoringService + ?Sized,
{
    if use_cache {
        if let Some(cached) = history.get_by_key(url) {
            debug!("Using cached analysis for '{}'", url);
            return Ok(cached.payload.data.clone());
        }
    }

    debug!("Requesting analysis for '{}'", url);
    let data = service.analyze(url)?;
    history.upsert(url, AnalysisPayload { data: data.clone() });
    Ok(data)
}

