use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::directory::PersonId;

mod memory;

pub use memory::InMemoryAttendanceStore;

/// Identity of a persisted attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Only ever entered manually; the engine respects but never writes it.
    Excused,
}

impl AttendanceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Excused => "Excused",
        }
    }
}

/// One persisted daily status. Unique on `(person_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub person_id: PersonId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub observation: String,
}

/// A record the engine wants inserted; the store assigns its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendanceRecord {
    pub person_id: PersonId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub observation: String,
}

/// Everything one reconciliation run wants to persist.
#[derive(Debug, Clone, Default)]
pub struct LedgerBatch {
    pub inserts: Vec<NewAttendanceRecord>,
    pub updates: Vec<AttendanceRecord>,
}

impl LedgerBatch {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }
}

/// Attendance persistence seam.
///
/// `commit` is all-or-nothing: implementations must apply the whole batch as
/// one transaction or leave the ledger untouched. The engine never deletes
/// records through this trait.
pub trait AttendanceStore: Send + Sync {
    fn existing(
        &self,
        keys: &[(PersonId, NaiveDate)],
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    fn commit(&self, batch: LedgerBatch) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("attendance store unavailable: {0}")]
    Unavailable(String),
    #[error("update targets unknown record {0}")]
    UnknownRecord(RecordId),
    #[error("attendance already recorded for {person_id} on {date}")]
    Duplicate { person_id: PersonId, date: NaiveDate },
}
