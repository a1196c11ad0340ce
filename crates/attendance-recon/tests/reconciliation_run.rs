use std::io::Cursor;

use attendance_recon::directory::{InMemoryPersonDirectory, PersonId, PersonRecord, Shift};
use attendance_recon::ledger::{AttendanceStatus, InMemoryAttendanceStore};
use attendance_recon::reconciliation::{ReconciliationRun, RunOptions};
use chrono::NaiveDate;

fn person(id: &str, registration: &str, shift: Shift) -> PersonRecord {
    PersonRecord {
        id: PersonId(id.to_string()),
        registration: registration.to_string(),
        shift,
    }
}

fn school() -> InMemoryPersonDirectory {
    InMemoryPersonDirectory::with_people(vec![
        person("s-ana", "1018", Shift::Morning),
        person("s-bia", "1019", Shift::Morning),
        person("s-carla", "1020", Shift::Morning),
        person("s-davi", "2044", Shift::Afternoon),
        person("s-edu", "2045", Shift::Afternoon),
    ])
}

#[test]
fn one_run_reconciles_a_mixed_day() {
    let directory = school();
    let store = InMemoryAttendanceStore::default();
    // Carla was excused by hand before the device log arrived.
    store.seed(
        PersonId("s-carla".to_string()),
        NaiveDate::from_ymd_opt(2024, 5, 3).expect("valid date"),
        AttendanceStatus::Excused,
        "family trip",
    );

    let log = "\
0;00001018;gate-a;03/05/2024;07:58
0;1018;gate-a;03052024;1015
0;1019;gate-b;03/05/2024;0802
garbage line
0;7777;gate-a;03/05/2024;0803
0;2044;gate-a;03/05/2024;1310
";

    let report = ReconciliationRun::from_reader(
        Cursor::new(log),
        &directory,
        &store,
        &RunOptions::default(),
    )
    .expect("run succeeds");

    assert_eq!(report.lines_read, 6);
    assert_eq!(report.malformed, 1);
    assert_eq!(report.unmatched, 1);
    assert_eq!(report.punches_matched, 4);
    // Ana (merged punches), Bia, Davi.
    assert_eq!(report.present_inserted, 3);
    // Morning active with Carla excused: no synthetic absence for her.
    // Afternoon active with Edu missing: one synthetic absence.
    assert_eq!(report.absences_synthesized, 1);
    assert_eq!(report.absences_suppressed, 1);

    let records = store.records();
    let ana = records
        .iter()
        .find(|record| record.person_id == PersonId("s-ana".to_string()))
        .expect("ana present");
    assert_eq!(ana.status, AttendanceStatus::Present);
    assert_eq!(ana.observation, "gate-a 07:58 | gate-a 10:15");

    let carla = records
        .iter()
        .find(|record| record.person_id == PersonId("s-carla".to_string()))
        .expect("carla kept");
    assert_eq!(carla.status, AttendanceStatus::Excused);
    assert_eq!(carla.observation, "family trip");

    let edu = records
        .iter()
        .find(|record| record.person_id == PersonId("s-edu".to_string()))
        .expect("edu marked absent");
    assert_eq!(edu.status, AttendanceStatus::Absent);
    assert_eq!(edu.observation, "automatic absence - device log");
}

#[test]
fn rerunning_the_same_log_is_a_no_op() {
    let directory = school();
    let store = InMemoryAttendanceStore::default();

    let log = "\
0;1018;gate-a;03/05/2024;0758
0;1019;gate-b;03/05/2024;0802
";

    ReconciliationRun::from_reader(Cursor::new(log), &directory, &store, &RunOptions::default())
        .expect("first run succeeds");
    let first = store.records();

    let report = ReconciliationRun::from_reader(
        Cursor::new(log),
        &directory,
        &store,
        &RunOptions::default(),
    )
    .expect("second run succeeds");

    assert_eq!(store.records(), first);
    assert_eq!(report.present_unchanged, 2);
    assert_eq!(report.absences_synthesized, 0);
    assert_eq!(report.absences_suppressed, 1, "carla's absence already on file");
}

#[test]
fn empty_log_touches_nothing() {
    let directory = school();
    let store = InMemoryAttendanceStore::default();

    let report = ReconciliationRun::from_reader(
        Cursor::new(""),
        &directory,
        &store,
        &RunOptions::default(),
    )
    .expect("empty run succeeds");

    assert_eq!(report.lines_read, 0);
    assert_eq!(report.absences_synthesized, 0);
    assert!(report.dates.is_empty());
    assert!(store.records().is_empty());
    assert_eq!(
        report.summary(),
        "processed 0, present 0, auto-absent 0, unmatched 0, malformed 0"
    );
}
