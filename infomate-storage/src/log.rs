//! # Ordered Log
//!
//! Insertion-ordered record storage. The log owns every record and the
//! per-store id counter; the hash index only holds positions into it.

use tracing::warn;

use infomate_core::{Payload, Record, RecordId};

/// Largest id handed out. `u64::MAX` is never used, so advancing the counter
/// past the last id cannot overflow.
pub const MAX_RECORD_ID: u64 = u64::MAX - 1;

/// Append-ordered sequence of records
#[derive(Debug, Clone)]
pub struct OrderedLog<P> {
    records: Vec<Record<P>>,
    next_id: u64,
}

impl<P: Payload> Default for OrderedLog<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> OrderedLog<P> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Adopt previously persisted records; ids resume past the largest one.
    ///
    /// A snapshot whose ids leave no room for another one is renumbered
    /// `1..=n` in log order.
    pub fn from_records(records: Vec<Record<P>>) -> Self {
        let max_id = records.iter().map(|r| r.id.value()).max().unwrap_or(0);
        let mut log = Self {
            records,
            next_id: max_id.saturating_add(1),
        };
        if max_id >= MAX_RECORD_ID {
            log.renumber();
        }
        log
    }

    /// Hand out the next id. Ids are never handed out twice, even after
    /// the record holding one is deleted or the log is cleared, unless the id
    /// space runs out and the live records are renumbered.
    pub fn allocate_id(&mut self) -> RecordId {
        if self.next_id > MAX_RECORD_ID {
            self.renumber();
        }
        let id = RecordId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn renumber(&mut self) {
        warn!(
            "Record ids exhausted at {}, renumbering {} records",
            self.next_id.saturating_sub(1),
            self.records.len()
        );
        for (record, id) in self.records.iter_mut().zip(1u64..) {
            record.id = RecordId(id);
        }
        self.next_id = self.records.len() as u64 + 1;
    }

    pub fn peek_next_id(&self) -> RecordId {
        RecordId(self.next_id)
    }

    /// Append and return the new record's position
    pub fn append(&mut self, record: Record<P>) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn get(&self, position: usize) -> Option<&Record<P>> {
        self.records.get(position)
    }

    pub(crate) fn get_mut(&mut self, position: usize) -> Option<&mut Record<P>> {
        self.records.get_mut(position)
    }

    /// Linear scan for `id`
    pub fn position_of(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Remove the record at `position`; later records shift down by one
    pub fn remove(&mut self, position: usize) -> Option<Record<P>> {
        (position < self.records.len()).then(|| self.records.remove(position))
    }

    pub fn records(&self) -> &[Record<P>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all records. The id counter keeps going.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use infomate_core::ReportPayload;

    fn record(id: u64, url: &str) -> Record<ReportPayload> {
        Record::new(RecordId(id), url, ReportPayload::default(), Utc::now())
    }

    #[test]
    fn test_ids_resume_after_reload() {
        let log = OrderedLog::from_records(vec![record(4, "a"), record(9, "b"), record(2, "c")]);
        assert_eq!(log.peek_next_id(), RecordId(10));

        let empty: OrderedLog<ReportPayload> = OrderedLog::from_records(Vec::new());
        assert_eq!(empty.peek_next_id(), RecordId(1));
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut log = OrderedLog::new();
        let id = log.allocate_id();
        log.append(record(id.value(), "a"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.allocate_id(), RecordId(2));
    }

    #[test]
    fn test_counter_never_passes_ceiling() {
        let mut log = OrderedLog::from_records(vec![record(MAX_RECORD_ID - 1, "a")]);
        assert_eq!(log.allocate_id(), RecordId(MAX_RECORD_ID));
        log.append(record(MAX_RECORD_ID, "b"));

        // Out of ids: live records become 1 and 2, allocation continues at 3
        assert_eq!(log.allocate_id(), RecordId(3));
        let ids: Vec<u64> = log.records().iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_max_id_snapshot_is_renumbered() {
        let log = OrderedLog::from_records(vec![record(u64::MAX, "a"), record(5, "b")]);
        let ids: Vec<u64> = log.records().iter().map(|r| r.id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(log.peek_next_id(), RecordId(3));
    }

    #[test]
    fn test_remove_shifts() {
        let mut log = OrderedLog::from_records(vec![record(1, "a"), record(2, "b"), record(3, "c")]);
        assert_eq!(log.remove(1).map(|r| r.url), Some("b".to_string()));
        assert_eq!(log.position_of(RecordId(3)), Some(1));
        assert!(log.remove(5).is_none());
    }
}
