//! # Core Types
//!
//! Records and payload schemas shared by every InfoMate store.
//!
//! ## Wire Shape
//!
//! A record serializes as one flat JSON object: the common envelope
//! (`id`, `url`, timestamps, `occurrenceCount`) plus the payload fields.
//!
//! ```text
//! { "id": 3, "url": "https://news.example/a", "data": { "reliability_score": 80.0, ... },
//!   "createdAt": "...", "updatedAt": "...", "occurrenceCount": 2 }
//! ```
//!
//! Snapshots written under the legacy field names (`analyzedAt`,
//! `analyzeCount`, `count`, string ids) still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::traits::Payload;

/// Timestamp type used throughout the system
pub type Timestamp = DateTime<Utc>;

/// Stable record identifier, assigned once from a per-store monotonic counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Ok(RecordId(n)),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map(RecordId)
                .map_err(serde::de::Error::custom),
        }
    }
}

fn default_occurrence_count() -> u32 {
    1
}

/// One stored unit keyed by URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<P> {
    pub id: RecordId,
    pub url: String,
    #[serde(flatten)]
    pub payload: P,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default, alias = "analyzedAt")]
    pub updated_at: Timestamp,
    #[serde(
        default = "default_occurrence_count",
        alias = "analyzeCount",
        alias = "count"
    )]
    pub occurrence_count: u32,
}

impl<P: Payload> Record<P> {
    /// Fresh record as created by a first upsert
    pub fn new(id: RecordId, url: impl Into<String>, payload: P, now: Timestamp) -> Self {
        Self {
            id,
            url: url.into(),
            payload,
            created_at: now,
            updated_at: now,
            occurrence_count: 1,
        }
    }

    /// The dedup key
    pub fn key(&self) -> &str {
        &self.url
    }

    /// Replace the payload wholesale and count the repeated write
    pub fn touch(&mut self, payload: P, now: Timestamp) {
        self.payload = payload;
        self.updated_at = now;
        self.occurrence_count = self.occurrence_count.saturating_add(1);
    }
}

// ============================================================================
// Analysis payload
// ============================================================================

/// Article metadata scraped by the scoring service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_content: Option<String>,
}

/// Analysis result as returned by the scoring service.
///
/// Every field is optional on the wire; [`AnalysisData::score`] and
/// [`AnalysisData::is_fake`] resolve the defaults (0 and "not fake").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reliability_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_fake: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArticleMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_details: Option<serde_json::Value>,
}

impl AnalysisData {
    pub fn scored(reliability_score: f64, is_fake: bool) -> Self {
        Self {
            reliability_score: Some(reliability_score),
            is_fake: Some(is_fake),
            ..Default::default()
        }
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(ArticleMetadata::default)
            .publisher = Some(publisher.into());
        self
    }

    pub fn score(&self) -> f64 {
        self.reliability_score.unwrap_or(0.0)
    }

    pub fn is_fake(&self) -> bool {
        self.is_fake == Some(true)
    }

    pub fn publisher(&self) -> Option<&str> {
        self.metadata.as_ref()?.publisher.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default)]
    pub data: AnalysisData,
}

impl Payload for AnalysisPayload {
    fn score(&self) -> f64 {
        self.data.score()
    }

    fn metadata_text(&self) -> Option<&str> {
        self.data.publisher()
    }
}

// ============================================================================
// Evaluation / report payloads
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPayload {
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub feedback: String,
}

impl Payload for EvaluationPayload {
    fn score(&self) -> f64 {
        f64::from(self.rating)
    }

    fn metadata_text(&self) -> Option<&str> {
        Some(&self.feedback)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub description: String,
}

impl Payload for ReportPayload {
    fn metadata_text(&self) -> Option<&str> {
        Some(&self.reason)
    }
}

// ============================================================================
// Caller submissions
// ============================================================================

/// `{url, data}` as submitted after a scoring run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSubmission {
    pub url: String,
    #[serde(default)]
    pub data: AnalysisData,
}

impl AnalysisSubmission {
    pub fn into_parts(self) -> (String, AnalysisPayload) {
        (self.url, AnalysisPayload { data: self.data })
    }
}

/// `{url, rating, feedback}` from the evaluation form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSubmission {
    pub url: String,
    pub rating: u8,
    #[serde(default)]
    pub feedback: Option<String>,
}

impl EvaluationSubmission {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    pub fn validate(&self) -> Result<()> {
        validate_key(&self.url)?;
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&self.rating) {
            return Err(Error::InvalidInput {
                message: format!(
                    "rating {} outside {}..={}",
                    self.rating,
                    Self::MIN_RATING,
                    Self::MAX_RATING
                ),
            });
        }
        Ok(())
    }

    pub fn into_parts(self) -> (String, EvaluationPayload) {
        let payload = EvaluationPayload {
            rating: self.rating,
            feedback: self.feedback.unwrap_or_default(),
        };
        (self.url, payload)
    }
}

/// `{url, reason, description}` from the report form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
    pub url: String,
    pub reason: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ReportSubmission {
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.url)?;
        if self.reason.trim().is_empty() {
            return Err(Error::InvalidInput {
                message: "report reason must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn into_parts(self) -> (String, ReportPayload) {
        let payload = ReportPayload {
            reason: self.reason,
            description: self.description.unwrap_or_default(),
        };
        (self.url, payload)
    }
}

fn validate_key(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::InvalidUrl { url: url.to_string() });
    }
    Ok(())
}

// ============================================================================
// View selectors
// ============================================================================

/// Field a sorted view is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Date,
    Score,
    Count,
}

impl SortKey {
    /// Unknown names fall back to `Date`
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "score" => SortKey::Score,
            "count" => SortKey::Count,
            _ => SortKey::Date,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Score => "score",
            SortKey::Count => "count",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than `asc` is descending
    pub fn parse_lenient(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// Which fields a free-text search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Url,
    Metadata,
    #[default]
    All,
}

impl SearchField {
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "url" | "key" => SearchField::Url,
            "publisher" | "metadata" => SearchField::Metadata,
            _ => SearchField::All,
        }
    }
}
