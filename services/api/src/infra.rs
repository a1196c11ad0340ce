use attendance_recon::directory::{PersonDirectory, PersonRecord};
use attendance_recon::error::AppError;
use attendance_recon::ledger::{AttendanceStatus, AttendanceStore, InMemoryAttendanceStore};
use attendance_recon::reconciliation::MinuteRange;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Collaborators one reconciliation endpoint run needs.
pub(crate) struct ReconcileState<D, S>
where
    D: PersonDirectory,
    S: AttendanceStore,
{
    pub(crate) directory: D,
    pub(crate) store: S,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_range(raw: &str) -> Result<MinuteRange, String> {
    MinuteRange::parse(raw.trim()).map_err(|err| err.to_string())
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) fn deserialize_optional_range<'de, D>(
    deserializer: D,
) -> Result<Option<MinuteRange>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_range(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Loads a person directory snapshot. Columns: `id,registration,shift` with
/// shift one of `morning`/`afternoon`.
pub(crate) fn load_people<P: AsRef<Path>>(path: P) -> Result<Vec<PersonRecord>, AppError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut people = Vec::new();
    for record in reader.deserialize::<PersonRecord>() {
        people.push(record?);
    }
    Ok(people)
}

#[derive(Debug, Deserialize)]
struct LedgerRow {
    person_id: String,
    date: NaiveDate,
    status: AttendanceStatus,
    #[serde(default)]
    observation: String,
}

/// Loads pre-existing ledger rows into the in-memory store. Columns:
/// `person_id,date,status,observation`.
pub(crate) fn load_ledger<P: AsRef<Path>>(
    path: P,
    store: &InMemoryAttendanceStore,
) -> Result<usize, AppError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut seeded = 0;
    for record in reader.deserialize::<LedgerRow>() {
        let row = record?;
        store.seed(
            attendance_recon::directory::PersonId(row.person_id),
            row.date,
            row.status,
            row.observation,
        );
        seeded += 1;
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_accepts_clock_pairs() {
        let range = parse_range("06:00-12:40").expect("valid range");
        assert_eq!(range, MinuteRange { start: 360, end: 760 });
        assert!(parse_range("6am-noon").is_err());
    }

    #[test]
    fn parse_date_is_iso_only() {
        assert!(parse_date("2024-05-03").is_ok());
        assert!(parse_date("03/05/2024").is_err());
    }
}
