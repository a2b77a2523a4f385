//! In-memory result store shared by the runner and the playground.
//!
//! An ordered, append/update collection of outcome records keyed by a
//! unique event id. Insertion order is preserved and is the canonical
//! order for display and for batch-analysis indexing. Mutation goes
//! through a mutex so concurrent producers on a multi-threaded runtime
//! cannot corrupt or drop each other's records; the lock is never held
//! across an await point.

use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{EventOutcome, OutcomeStatus};

/// Errors from store misuse
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Outcome id already exists: {0}")]
    DuplicateId(String),
}

/// Ordered collection of outcome records
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Mutex<Vec<EventOutcome>>,
}

impl ResultStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record.
    ///
    /// Append position reflects call order; ids must be unique for the
    /// lifetime of a run.
    pub fn append(&self, outcome: EventOutcome) -> Result<(), StoreError> {
        let mut records = self.records.lock().expect("result store poisoned");
        if records.iter().any(|r| r.id == outcome.id) {
            return Err(StoreError::DuplicateId(outcome.id));
        }
        records.push(outcome);
        Ok(())
    }

    /// Update a record in place without disturbing its position.
    ///
    /// Returns `None` when the id is absent, e.g. a response resolving
    /// after a reset cleared the store. Earlier entries are never
    /// reordered.
    pub fn with_record<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut EventOutcome) -> T,
    ) -> Option<T> {
        let mut records = self.records.lock().expect("result store poisoned");
        records.iter_mut().find(|r| r.id == id).map(f)
    }

    /// Clone a record by id
    pub fn get(&self, id: &str) -> Option<EventOutcome> {
        let records = self.records.lock().expect("result store poisoned");
        records.iter().find(|r| r.id == id).cloned()
    }

    /// Snapshot of all records in insertion order
    pub fn snapshot(&self) -> Vec<EventOutcome> {
        self.records.lock().expect("result store poisoned").clone()
    }

    /// Snapshot of terminal records only, insertion order preserved.
    ///
    /// This is the input shape the batch analysis requester expects:
    /// callers exclude in-flight records.
    pub fn terminal_snapshot(&self) -> Vec<EventOutcome> {
        self.records
            .lock()
            .expect("result store poisoned")
            .iter()
            .filter(|r| r.is_terminal())
            .cloned()
            .collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.lock().expect("result store poisoned").len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records currently in flight
    pub fn running_count(&self) -> usize {
        self.records
            .lock()
            .expect("result store poisoned")
            .iter()
            .filter(|r| r.status == OutcomeStatus::Running)
            .count()
    }

    /// Remove all records
    pub fn clear(&self) {
        self.records.lock().expect("result store poisoned").clear();
    }
}

/// Generate a unique outcome id: `{prefix}-{millis}-{rand8}`.
///
/// The millisecond timestamp keeps ids roughly sortable; the random
/// suffix keeps them unique within a burst.
pub fn generate_outcome_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VerdictResponse;

    fn pending(id: &str) -> EventOutcome {
        EventOutcome::pending_parts(id, "label", "tag", "src")
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let store = ResultStore::new();
        for i in 0..5 {
            store.append(pending(&format!("evt-{i}"))).unwrap();
        }

        let ids: Vec<String> = store.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["evt-0", "evt-1", "evt-2", "evt-3", "evt-4"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = ResultStore::new();
        store.append(pending("evt-1")).unwrap();

        let err = store.append(pending("evt-1"));
        assert!(matches!(err, Err(StoreError::DuplicateId(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_in_place_keeps_position() {
        let store = ResultStore::new();
        store.append(pending("evt-0")).unwrap();
        store.append(pending("evt-1")).unwrap();
        store.append(pending("evt-2")).unwrap();

        store
            .with_record("evt-1", |r| {
                r.mark_running().unwrap();
                r.complete(&VerdictResponse {
                    verdict: "APPROVE".to_string(),
                    ..Default::default()
                })
                .unwrap();
            })
            .unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot[1].id, "evt-1");
        assert_eq!(snapshot[1].status, OutcomeStatus::Approved);
        assert_eq!(snapshot[0].status, OutcomeStatus::Pending);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let store = ResultStore::new();
        assert!(store.with_record("evt-gone", |_| ()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_terminal_snapshot_excludes_in_flight() {
        let store = ResultStore::new();
        store.append(pending("evt-0")).unwrap();
        store.append(pending("evt-1")).unwrap();

        store.with_record("evt-0", |r| {
            r.mark_running().unwrap();
            r.fail("boom").unwrap();
        });
        store.with_record("evt-1", |r| r.mark_running().unwrap());

        let terminal = store.terminal_snapshot();
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].id, "evt-0");
        assert_eq!(store.running_count(), 1);
    }

    #[test]
    fn test_clear_empties_store() {
        let store = ResultStore::new();
        store.append(pending("evt-0")).unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_generated_ids_carry_prefix_and_differ() {
        let a = generate_outcome_id("evt");
        let b = generate_outcome_id("evt");
        let c = generate_outcome_id("pg");

        assert!(a.starts_with("evt-"));
        assert!(c.starts_with("pg-"));
        assert_ne!(a, b);
    }
}
