//! # Persistence Tests
//!
//! Snapshot round trips through memory and file blob stores, recovery from
//! missing or corrupt snapshots, and swallowed save failures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use infomate_core::config::{EVALUATION_STORAGE_KEY, HISTORY_STORAGE_KEY, REPORT_STORAGE_KEY};
use infomate_core::error::{Error, Result};
use infomate_core::{
    AnalysisData, AnalysisPayload, BlobStore, Config, EvaluationPayload, IndexConfig, ManualClock,
    RecordId, SortKey, SortOrder,
};
use infomate_storage::{
    AnalysisHistory, EvaluationStore, FileBlobStore, InfomateStores, MemoryBlobStore, RecordStore,
};

fn analysis(score: f64) -> AnalysisPayload {
    AnalysisPayload {
        data: AnalysisData::scored(score, false),
    }
}

fn open_history(blob: &Arc<MemoryBlobStore>) -> AnalysisHistory {
    RecordStore::open(blob.clone(), HISTORY_STORAGE_KEY, &IndexConfig::default())
}

/// Blob store whose saves always fail
#[derive(Default)]
struct FailingBlobStore {
    save_attempts: AtomicUsize,
}

impl BlobStore for FailingBlobStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn save(&self, key: &str, _value: &str) -> Result<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Error::persistence(
            key,
            "quota exceeded",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        ))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_reload_is_lossless() {
    let blob = Arc::new(MemoryBlobStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));

    {
        let mut store: AnalysisHistory = RecordStore::open_with_clock(
            blob.clone(),
            HISTORY_STORAGE_KEY,
            &IndexConfig::default(),
            clock.clone(),
        );
        store.upsert("https://a.com", analysis(10.0));
        clock.advance_millis(1_000);
        store.upsert("https://b.com", analysis(20.0));
        store.upsert("https://a.com", analysis(30.0));
    }

    let reloaded = open_history(&blob);
    let records = reloaded.get_all();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].url, "https://a.com");
    assert_eq!(records[0].occurrence_count, 2);
    assert_eq!(records[0].payload.data.score(), 30.0);
    assert_eq!(records[0].created_at.timestamp_millis(), 1_700_000_000_000);
    assert_eq!(records[0].updated_at.timestamp_millis(), 1_700_000_001_000);
    assert_eq!(records[1].url, "https://b.com");
    assert!(reloaded.get_by_key("https://b.com").is_some());
}

#[test]
fn test_ids_continue_after_reload() {
    let blob = Arc::new(MemoryBlobStore::new());
    {
        let mut store = open_history(&blob);
        store.upsert("https://a.com", analysis(1.0));
        let b = store.upsert("https://b.com", analysis(1.0));
        assert_eq!(b.id, RecordId(2));
    }

    let mut store = open_history(&blob);
    let c = store.upsert("https://c.com", analysis(1.0));
    assert_eq!(c.id, RecordId(3));
}

#[test]
fn test_missing_and_corrupt_snapshots_open_empty() {
    let blob = Arc::new(MemoryBlobStore::new());
    assert!(open_history(&blob).is_empty());

    blob.save(HISTORY_STORAGE_KEY, "{not json").unwrap();
    let mut store = open_history(&blob);
    assert!(store.is_empty());

    // The next mutation overwrites the corrupt snapshot
    store.upsert("https://a.com", analysis(5.0));
    assert_eq!(open_history(&blob).len(), 1);
}

#[test]
fn test_legacy_snapshot_fields() {
    let blob = Arc::new(MemoryBlobStore::new());
    let legacy = r#"[
        {"id": "7", "url": "https://old.com", "data": {"reliability_score": 42},
         "analyzedAt": "2024-01-02T03:04:05Z", "analyzeCount": 3},
        {"id": 9, "url": "https://older.com"}
    ]"#;
    blob.save(HISTORY_STORAGE_KEY, legacy).unwrap();

    let mut store = open_history(&blob);
    assert_eq!(store.len(), 2);

    let old = store.get_by_key("https://old.com").unwrap();
    assert_eq!(old.id, RecordId(7));
    assert_eq!(old.occurrence_count, 3);
    assert_eq!(old.payload.data.score(), 42.0);
    assert_eq!(old.updated_at.to_rfc3339(), "2024-01-02T03:04:05+00:00");

    let older = store.get_by_key("https://older.com").unwrap();
    assert_eq!(older.occurrence_count, 1);
    assert_eq!(older.updated_at.timestamp_millis(), 0);

    // Oldest (epoch) record sorts last, newest first
    let view = store.sorted(SortKey::Date, SortOrder::Desc);
    assert_eq!(view[1].url, "https://older.com");

    let next = store.upsert("https://new.com", analysis(1.0));
    assert_eq!(next.id, RecordId(10));
}

#[test]
fn test_exhausted_ids_in_snapshot_are_renumbered() {
    let blob = Arc::new(MemoryBlobStore::new());
    let snapshot = format!(
        r#"[{{"id": {}, "url": "https://old.com"}}, {{"id": 5, "url": "https://other.com"}}]"#,
        u64::MAX
    );
    blob.save(HISTORY_STORAGE_KEY, &snapshot).unwrap();

    let mut store = open_history(&blob);
    assert_eq!(store.len(), 2);

    let new = store.upsert("https://new.com", analysis(1.0));
    let again = store.upsert("https://newer.com", analysis(1.0));

    let mut ids: Vec<RecordId> = store.get_all().iter().map(|r| r.id).collect();
    assert!(ids.iter().all(|id| id.value() < u64::MAX));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
    assert!(again.id > new.id);

    // Records keep their keys and positions
    assert_eq!(store.get_all()[0].url, "https://old.com");
    assert!(store.get_by_key("https://other.com").is_some());
    assert!(store.get(new.id).is_some());
}

#[test]
fn test_duplicate_keys_in_snapshot_are_dropped() {
    let blob = Arc::new(MemoryBlobStore::new());
    let snapshot = r#"[
        {"id": 1, "url": "https://dup.com", "data": {"reliability_score": 1}},
        {"id": 2, "url": "https://dup.com", "data": {"reliability_score": 2}},
        {"id": 3, "url": "https://other.com"}
    ]"#;
    blob.save(HISTORY_STORAGE_KEY, snapshot).unwrap();

    let store = open_history(&blob);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get_by_key("https://dup.com").unwrap().id, RecordId(1));
    assert_eq!(store.get_by_key("https://other.com").unwrap().id, RecordId(3));
}

#[test]
fn test_failed_saves_keep_memory_state() {
    let blob = Arc::new(FailingBlobStore::default());
    let mut store: AnalysisHistory =
        RecordStore::open(blob.clone(), HISTORY_STORAGE_KEY, &IndexConfig::default());

    let record = store.upsert("https://a.com", analysis(50.0));
    assert_eq!(store.len(), 1);
    assert!(store.delete(record.id));
    store.clear();
    assert_eq!(blob.save_attempts.load(Ordering::SeqCst), 3);

    // Absent deletes do not persist
    assert!(!store.delete(RecordId(42)));
    assert_eq!(blob.save_attempts.load(Ordering::SeqCst), 3);
}

#[test]
fn test_clear_persists_empty_state() {
    let blob = Arc::new(MemoryBlobStore::new());
    {
        let mut store = open_history(&blob);
        store.upsert("https://a.com", analysis(1.0));
        store.clear();
    }
    assert_eq!(blob.load(HISTORY_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    assert!(open_history(&blob).is_empty());
}

#[test]
fn test_file_blob_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let blob = Arc::new(FileBlobStore::open(temp_dir.path().join("data")).unwrap());

    {
        let mut store: EvaluationStore =
            RecordStore::open(blob.clone(), EVALUATION_STORAGE_KEY, &IndexConfig::default());
        store.upsert(
            "https://a.com",
            EvaluationPayload { rating: 5, feedback: "great".to_string() },
        );
    }

    let path = temp_dir.path().join("data").join("infomate_evaluations.json");
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let store: EvaluationStore =
        RecordStore::open(blob.clone(), EVALUATION_STORAGE_KEY, &IndexConfig::default());
    assert_eq!(store.get_by_key("https://a.com").unwrap().payload.rating, 5);

    blob.remove(EVALUATION_STORAGE_KEY).unwrap();
    assert!(!path.exists());
    blob.remove(EVALUATION_STORAGE_KEY).unwrap();
    assert_eq!(blob.load(EVALUATION_STORAGE_KEY).unwrap(), None);
}

#[test]
fn test_file_blob_store_rejects_path_keys() {
    let temp_dir = TempDir::new().unwrap();
    let blob = FileBlobStore::open(temp_dir.path()).unwrap();

    for key in ["../escape", "a/b", "", "dot.key"] {
        let err = blob.save(key, "[]").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}

#[test]
fn test_failed_file_write_leaves_no_temp_file() {
    let temp_dir = TempDir::new().unwrap();
    let blob = FileBlobStore::open(temp_dir.path()).unwrap();

    // A directory in the target's place makes the final rename fail
    let target = blob.path_for(REPORT_STORAGE_KEY).unwrap();
    std::fs::create_dir(&target).unwrap();

    let err = blob.save(REPORT_STORAGE_KEY, "[]").unwrap_err();
    assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
    assert!(!target.with_extension("json.tmp").exists());
    assert!(target.is_dir());
}

#[test]
fn test_stores_are_isolated_by_key() {
    let blob: Arc<MemoryBlobStore> = Arc::new(MemoryBlobStore::new());

    {
        let mut stores = InfomateStores::open(&Config::default(), blob.clone());
        stores.history.upsert("https://a.com", analysis(70.0));
        stores.evaluations.upsert(
            "https://a.com",
            EvaluationPayload { rating: 3, feedback: String::new() },
        );
    }

    assert!(blob.load(HISTORY_STORAGE_KEY).unwrap().is_some());
    assert!(blob.load(EVALUATION_STORAGE_KEY).unwrap().is_some());
    assert!(blob.load(REPORT_STORAGE_KEY).unwrap().is_none());

    let stores = InfomateStores::open(&Config::default(), blob);
    assert_eq!(stores.history.len(), 1);
    assert_eq!(stores.evaluations.len(), 1);
    assert!(stores.reports.is_empty());
}
