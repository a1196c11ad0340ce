use super::common::*;
use crate::directory::{InMemoryPersonDirectory, PersonId, Shift};
use crate::ledger::{AttendanceStatus, InMemoryAttendanceStore};
use crate::reconciliation::RunOptions;

#[test]
fn present_upsert_keeps_identity_and_appends_fragments() {
    let directory = InMemoryPersonDirectory::with_people(morning_roster(1));
    let store = InMemoryAttendanceStore::default();
    let id = store.seed(
        PersonId("m01".to_string()),
        may_third(),
        AttendanceStatus::Present,
        "gate-a 08:00",
    );

    let log = line("1001", "gate-b", "03/05/2024", "1015");
    let report = run(&log, &directory, &store, &RunOptions::default());

    assert_eq!(report.present_updated, 1);
    assert_eq!(report.present_inserted, 0);

    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].observation, "gate-a 08:00 | gate-b 10:15");
}

#[test]
fn present_upsert_skips_fragments_already_on_file() {
    let directory = InMemoryPersonDirectory::with_people(morning_roster(1));
    let store = InMemoryAttendanceStore::default();
    store.seed(
        PersonId("m01".to_string()),
        may_third(),
        AttendanceStatus::Present,
        "gate-a 08:00",
    );

    let log = line("1001", "gate-a", "03/05/2024", "0800");
    let report = run(&log, &directory, &store, &RunOptions::default());

    assert_eq!(report.present_updated, 0);
    assert_eq!(report.present_unchanged, 1);
    assert_eq!(store.records()[0].observation, "gate-a 08:00");
}

#[test]
fn present_punch_flips_a_prior_synthetic_absence() {
    let directory = InMemoryPersonDirectory::with_people(morning_roster(1));
    let store = InMemoryAttendanceStore::default();
    store.seed(
        PersonId("m01".to_string()),
        may_third(),
        AttendanceStatus::Absent,
        "automatic absence - device log",
    );

    let log = line("1001", "gate-a", "03/05/2024", "0800");
    let report = run(&log, &directory, &store, &RunOptions::default());

    assert_eq!(report.present_updated, 1);
    let record = &store.records()[0];
    assert_eq!(record.status, AttendanceStatus::Present);
    assert!(record.observation.contains("gate-a 08:00"));
}

#[test]
fn synthetic_absence_never_overwrites_any_existing_record() {
    for status in [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Excused,
    ] {
        let directory = InMemoryPersonDirectory::with_people(morning_roster(2));
        let store = InMemoryAttendanceStore::default();
        store.seed(
            PersonId("m02".to_string()),
            may_third(),
            status,
            "entered by hand",
        );

        // m01 punches, activating the morning; m02 has no punch.
        let log = line("1001", "gate-a", "03/05/2024", "0800");
        let report = run(&log, &directory, &store, &RunOptions::default());

        assert_eq!(report.absences_synthesized, 0);
        assert_eq!(report.absences_suppressed, 1);

        let kept = store
            .records()
            .into_iter()
            .find(|record| record.person_id == PersonId("m02".to_string()))
            .expect("manual record kept");
        assert_eq!(kept.status, status);
        assert_eq!(kept.observation, "entered by hand");
    }
}

#[test]
fn excused_record_survives_an_active_morning() {
    let directory = InMemoryPersonDirectory::with_people(morning_roster(2));
    let store = InMemoryAttendanceStore::default();
    let id = store.seed(
        PersonId("m02".to_string()),
        may_third(),
        AttendanceStatus::Excused,
        "medical leave",
    );

    let log = line("1001", "gate-a", "03/05/2024", "0800");
    run(&log, &directory, &store, &RunOptions::default());

    let kept = store
        .records()
        .into_iter()
        .find(|record| record.id == id)
        .expect("excused record still present");
    assert_eq!(kept.status, AttendanceStatus::Excused);
    assert_eq!(kept.observation, "medical leave");
}
