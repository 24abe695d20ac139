//! # Evaluations and Reports
//!
//! User feedback stores. Both deduplicate by URL like the history does: a
//! second evaluation of the same article replaces the first and bumps its
//! occurrence count.

use infomate_core::error::Result;
use infomate_core::{
    EvaluationPayload, EvaluationSubmission, Record, ReportPayload, ReportSubmission,
};

use crate::store::RecordStore;

pub type EvaluationStore = RecordStore<EvaluationPayload>;
pub type ReportStore = RecordStore<ReportPayload>;

impl RecordStore<EvaluationPayload> {
    /// Validate and store an evaluation. Invalid submissions leave the store
    /// untouched.
    pub fn submit_evaluation(
        &mut self,
        submission: EvaluationSubmission,
    ) -> Result<Record<EvaluationPayload>> {
        submission.validate()?;
        let (url, payload) = submission.into_parts();
        Ok(self.upsert(&url, payload))
    }
}

impl RecordStore<ReportPayload> {
    pub fn submit_report(&mut self, submission: ReportSubmission) -> Result<Record<ReportPayload>> {
        submission.validate()?;
        let (url, payload) = submission.into_parts();
        Ok(self.upsert(&url, payload))
    }
}
