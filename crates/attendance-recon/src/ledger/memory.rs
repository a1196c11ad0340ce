use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use super::{
    AttendanceRecord, AttendanceStatus, AttendanceStore, LedgerBatch, NewAttendanceRecord,
    RecordId, StoreError,
};
use crate::directory::PersonId;

#[derive(Default)]
struct Ledger {
    records: BTreeMap<(PersonId, NaiveDate), AttendanceRecord>,
    next_id: u64,
}

/// In-memory attendance store used by the offline CLI, the demo service, and
/// tests.
///
/// `commit` stages the whole batch against a copy of the ledger and swaps it
/// in only if every insert and update applies, giving the same all-or-nothing
/// behavior a database transaction would.
#[derive(Default, Clone)]
pub struct InMemoryAttendanceStore {
    inner: Arc<Mutex<Ledger>>,
}

impl InMemoryAttendanceStore {
    /// Inserts a record directly, bypassing the merge policy. Used to load
    /// pre-existing (manually entered) ledger state.
    pub fn seed(
        &self,
        person_id: PersonId,
        date: NaiveDate,
        status: AttendanceStatus,
        observation: impl Into<String>,
    ) -> RecordId {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.next_id += 1;
        let id = RecordId(guard.next_id);
        guard.records.insert(
            (person_id.clone(), date),
            AttendanceRecord {
                id,
                person_id,
                date,
                status,
                observation: observation.into(),
            },
        );
        id
    }

    /// Full ledger contents in `(person_id, date)` order.
    pub fn records(&self) -> Vec<AttendanceRecord> {
        let guard = self.inner.lock().expect("ledger mutex poisoned");
        guard.records.values().cloned().collect()
    }
}

impl AttendanceStore for InMemoryAttendanceStore {
    fn existing(
        &self,
        keys: &[(PersonId, NaiveDate)],
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let guard = self.inner.lock().expect("ledger mutex poisoned");
        Ok(keys
            .iter()
            .filter_map(|key| guard.records.get(key).cloned())
            .collect())
    }

    fn commit(&self, batch: LedgerBatch) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().expect("ledger mutex poisoned");
        let mut staged = guard.records.clone();
        let mut next_id = guard.next_id;

        for update in batch.updates {
            let key = (update.person_id.clone(), update.date);
            match staged.get_mut(&key) {
                Some(record) if record.id == update.id => *record = update,
                _ => return Err(StoreError::UnknownRecord(update.id)),
            }
        }

        for insert in batch.inserts {
            let NewAttendanceRecord {
                person_id,
                date,
                status,
                observation,
            } = insert;
            let key = (person_id.clone(), date);
            if staged.contains_key(&key) {
                return Err(StoreError::Duplicate { person_id, date });
            }
            next_id += 1;
            staged.insert(
                key,
                AttendanceRecord {
                    id: RecordId(next_id),
                    person_id,
                    date,
                    status,
                    observation,
                },
            );
        }

        guard.records = staged;
        guard.next_id = next_id;
        Ok(())
    }
}
