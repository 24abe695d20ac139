//! Unit tests for infomate-core

use chrono::{TimeZone, Utc};
use infomate_core::{
    config::{LogFormat, LogLevel},
    AnalysisData, AnalysisPayload, Clock, Config, EvaluationPayload, EvaluationSubmission,
    ManualClock, Payload, Record, RecordId, ReportPayload, ReportSubmission, SearchField,
    SortAlgorithm, SortKey, SortOrder,
};
use tempfile::TempDir;

mod record_tests {
    use super::*;

    fn ts(secs: i64) -> infomate_core::Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_new_record_defaults() {
        let payload = AnalysisPayload { data: AnalysisData::scored(80.0, false) };
        let record = Record::new(RecordId(1), "http://a.com/1", payload, ts(100));
        assert_eq!(record.key(), "http://a.com/1");
        assert_eq!(record.occurrence_count, 1);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_touch_replaces_payload() {
        let payload = AnalysisPayload { data: AnalysisData::scored(80.0, false) };
        let mut record = Record::new(RecordId(1), "http://a.com/1", payload, ts(100));

        record.touch(AnalysisPayload { data: AnalysisData::scored(40.0, true) }, ts(200));

        assert_eq!(record.payload.data.score(), 40.0);
        assert!(record.payload.data.is_fake());
        assert_eq!(record.occurrence_count, 2);
        assert_eq!(record.created_at, ts(100));
        assert_eq!(record.updated_at, ts(200));
    }

    #[test]
    fn test_record_json_shape() {
        let payload = EvaluationPayload { rating: 4, feedback: "solid".into() };
        let record = Record::new(RecordId(7), "http://a.com", payload, ts(0));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["url"], "http://a.com");
        assert_eq!(json["rating"], 4);
        assert_eq!(json["feedback"], "solid");
        assert_eq!(json["occurrenceCount"], 1);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_legacy_analysis_snapshot_loads() {
        let raw = r#"{
            "id": "1700000000000",
            "url": "http://a.com/1",
            "data": { "reliability_score": 80, "is_fake": false,
                      "metadata": { "publisher": "KBS" } },
            "analyzedAt": "2024-01-01T00:00:00.000Z",
            "analyzeCount": 3
        }"#;
        let record: Record<AnalysisPayload> = serde_json::from_str(raw).unwrap();

        assert_eq!(record.id, RecordId(1_700_000_000_000));
        assert_eq!(record.payload.score(), 80.0);
        assert_eq!(record.payload.metadata_text(), Some("KBS"));
        assert_eq!(record.occurrence_count, 3);
        assert_eq!(record.updated_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_legacy_report_count_alias() {
        let raw = r#"{"id": 2, "url": "http://b.com", "reason": "spam",
                      "createdAt": "2024-02-01T00:00:00Z", "count": 4}"#;
        let record: Record<ReportPayload> = serde_json::from_str(raw).unwrap();
        assert_eq!(record.occurrence_count, 4);
        assert_eq!(record.payload.reason, "spam");
        assert_eq!(record.payload.description, "");
    }

    #[test]
    fn test_missing_fields_resolve_to_defaults() {
        let raw = r#"{"id": 3, "url": "http://c.com"}"#;
        let record: Record<AnalysisPayload> = serde_json::from_str(raw).unwrap();
        assert_eq!(record.payload.score(), 0.0);
        assert!(!record.payload.data.is_fake());
        assert_eq!(record.payload.metadata_text(), None);
        assert_eq!(record.occurrence_count, 1);
        assert_eq!(record.updated_at.timestamp(), 0);
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let data = AnalysisData::scored(66.5, true).with_publisher("YTN");
        let mut record = Record::new(RecordId(9), "http://d.com", AnalysisPayload { data }, ts(10));
        record.touch(record.payload.clone(), ts(20));

        let json = serde_json::to_string(&record).unwrap();
        let back: Record<AnalysisPayload> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

mod submission_tests {
    use super::*;

    #[test]
    fn test_evaluation_rating_bounds() {
        let ok = EvaluationSubmission { url: "http://a.com".into(), rating: 5, feedback: None };
        assert!(ok.validate().is_ok());

        let low = EvaluationSubmission { rating: 0, ..ok.clone() };
        assert_eq!(low.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let high = EvaluationSubmission { rating: 6, ..ok.clone() };
        assert!(high.validate().is_err());

        let blank = EvaluationSubmission { url: "  ".into(), ..ok };
        assert_eq!(blank.validate().unwrap_err().error_code(), "INVALID_URL");
    }

    #[test]
    fn test_evaluation_feedback_defaults_empty() {
        let sub = EvaluationSubmission { url: "http://a.com".into(), rating: 3, feedback: None };
        let (url, payload) = sub.into_parts();
        assert_eq!(url, "http://a.com");
        assert_eq!(payload.feedback, "");
        assert_eq!(payload.score(), 3.0);
    }

    #[test]
    fn test_report_requires_reason() {
        let sub = ReportSubmission {
            url: "http://a.com".into(),
            reason: " ".into(),
            description: Some("clickbait".into()),
        };
        assert!(sub.validate().is_err());
    }
}

mod selector_tests {
    use super::*;

    #[test]
    fn test_sort_key_lenient_parse() {
        assert_eq!(SortKey::parse_lenient("score"), SortKey::Score);
        assert_eq!(SortKey::parse_lenient("COUNT"), SortKey::Count);
        assert_eq!(SortKey::parse_lenient("date"), SortKey::Date);
        assert_eq!(SortKey::parse_lenient("popularity"), SortKey::Date);
        assert_eq!(SortKey::default(), SortKey::Date);
    }

    #[test]
    fn test_sort_order_lenient_parse() {
        assert_eq!(SortOrder::parse_lenient("asc"), SortOrder::Asc);
        assert_eq!(SortOrder::parse_lenient("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse_lenient("sideways"), SortOrder::Desc);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn test_search_field_lenient_parse() {
        assert_eq!(SearchField::parse_lenient("url"), SearchField::Url);
        assert_eq!(SearchField::parse_lenient("publisher"), SearchField::Metadata);
        assert_eq!(SearchField::parse_lenient("anything"), SearchField::All);
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.index.bucket_count, 100);
        assert_eq!(config.index.sort_algorithm, SortAlgorithm::Partition);
        assert_eq!(config.storage.history_key, "infomate_analysis_history");
        assert_eq!(config.storage.evaluation_key, "infomate_evaluations");
        assert_eq!(config.storage.report_key, "infomate_reports");
    }

    #[test]
    fn test_load_partial_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("infomate.json");
        std::fs::write(
            &path,
            r#"{ "index": { "bucket_count": 16, "sort_algorithm": "merge" },
                 "logging": { "level": "debug", "format": "json" } }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.index.bucket_count, 16);
        assert_eq!(config.index.sort_algorithm, SortAlgorithm::Merge);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.storage.report_key, "infomate_reports");
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, r#"{ "index": { "bucket_count": 0 } }"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut config = Config::default();
        config.storage.report_key = config.storage.history_key.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::load(tmp.path().join("nope.json")).is_err());
    }
}

mod clock_tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        let t0 = clock.now();
        clock.advance_millis(250);
        let t1 = clock.now();
        assert_eq!((t1 - t0).num_milliseconds(), 250);

        clock.set_millis(0);
        assert_eq!(clock.now().timestamp(), 0);
    }
}
