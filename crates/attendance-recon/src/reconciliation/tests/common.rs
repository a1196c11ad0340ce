use std::io::Cursor;

use chrono::NaiveDate;

use crate::directory::{InMemoryPersonDirectory, PersonId, PersonRecord, Shift};
use crate::ledger::InMemoryAttendanceStore;
use crate::reconciliation::{ReconciliationRun, RunOptions, RunReport};

pub(super) fn person(id: &str, registration: &str, shift: Shift) -> PersonRecord {
    PersonRecord {
        id: PersonId(id.to_string()),
        registration: registration.to_string(),
        shift,
    }
}

/// `n` morning people with ids `m01..` and registrations `1001..`.
pub(super) fn morning_roster(n: usize) -> Vec<PersonRecord> {
    (1..=n)
        .map(|i| person(&format!("m{i:02}"), &format!("{}", 1000 + i), Shift::Morning))
        .collect()
}

pub(super) fn may_third() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 3).expect("valid date")
}

/// One raw log line: `anyId;registration;deviceCode;date;time`.
pub(super) fn line(registration: &str, device: &str, date: &str, time: &str) -> String {
    format!("0;{registration};{device};{date};{time}")
}

pub(super) fn run(
    log: &str,
    directory: &InMemoryPersonDirectory,
    store: &InMemoryAttendanceStore,
    options: &RunOptions,
) -> RunReport {
    ReconciliationRun::from_reader(Cursor::new(log.to_string()), directory, store, options)
        .expect("run succeeds")
}
