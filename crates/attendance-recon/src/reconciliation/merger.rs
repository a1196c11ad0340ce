use std::collections::HashMap;

use chrono::NaiveDate;

use super::absences::{AbsenceCandidate, SYNTHETIC_OBSERVATION};
use super::aggregator::{DayBook, OBSERVATION_SEPARATOR};
use crate::directory::PersonId;
use crate::ledger::{
    AttendanceRecord, AttendanceStatus, AttendanceStore, LedgerBatch, NewAttendanceRecord,
    StoreError,
};

/// The batch a run wants committed, plus how each candidate resolved.
#[derive(Debug, Default)]
pub(crate) struct MergePlan {
    pub(crate) batch: LedgerBatch,
    pub(crate) present_inserted: usize,
    pub(crate) present_updated: usize,
    pub(crate) present_unchanged: usize,
    pub(crate) absences_inserted: usize,
    pub(crate) absences_suppressed: usize,
}

/// Reconciles candidates against the existing ledger rows for the touched
/// keys.
///
/// Present candidates upsert: an existing record keeps its identity, moves to
/// Present, and gains only the observation fragments its text does not
/// already contain. Absent candidates are insert-only: any pre-existing
/// record, whatever its status, suppresses the synthetic absence. Nothing is
/// ever deleted.
pub(crate) fn plan(
    book: &DayBook,
    absences: &[AbsenceCandidate],
    store: &dyn AttendanceStore,
) -> Result<MergePlan, StoreError> {
    let mut keys: Vec<(PersonId, NaiveDate)> =
        book.presences().map(|(key, _)| key.clone()).collect();
    keys.extend(
        absences
            .iter()
            .map(|candidate| (candidate.person_id.clone(), candidate.date)),
    );

    let existing: HashMap<(PersonId, NaiveDate), AttendanceRecord> = store
        .existing(&keys)?
        .into_iter()
        .map(|record| ((record.person_id.clone(), record.date), record))
        .collect();

    let mut plan = MergePlan::default();

    for (key, draft) in book.presences() {
        match existing.get(key) {
            None => {
                plan.batch.inserts.push(NewAttendanceRecord {
                    person_id: key.0.clone(),
                    date: key.1,
                    status: AttendanceStatus::Present,
                    observation: draft.render(),
                });
                plan.present_inserted += 1;
            }
            Some(record) => {
                let mut observation = record.observation.clone();
                let mut changed = record.status != AttendanceStatus::Present;
                for fragment in draft.rendered_fragments() {
                    if !observation.contains(&fragment) {
                        if !observation.is_empty() {
                            observation.push_str(OBSERVATION_SEPARATOR);
                        }
                        observation.push_str(&fragment);
                        changed = true;
                    }
                }
                if changed {
                    plan.batch.updates.push(AttendanceRecord {
                        id: record.id,
                        person_id: record.person_id.clone(),
                        date: record.date,
                        status: AttendanceStatus::Present,
                        observation,
                    });
                    plan.present_updated += 1;
                } else {
                    plan.present_unchanged += 1;
                }
            }
        }
    }

    for candidate in absences {
        let key = (candidate.person_id.clone(), candidate.date);
        if existing.contains_key(&key) {
            plan.absences_suppressed += 1;
        } else {
            plan.batch.inserts.push(NewAttendanceRecord {
                person_id: candidate.person_id.clone(),
                date: candidate.date,
                status: AttendanceStatus::Absent,
                observation: SYNTHETIC_OBSERVATION.to_string(),
            });
            plan.absences_inserted += 1;
        }
    }

    Ok(plan)
}
