use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::aggregator::DayBook;
use super::matcher::RegistrationIndex;
use super::options::RunOptions;
use super::report::RunReport;
use super::{absences, merger, parser};
use crate::directory::{DirectoryError, PersonDirectory};
use crate::ledger::{AttendanceStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("failed to read punch log: {0}")]
    Io(#[from] std::io::Error),
    #[error("punch log unreadable: {0}")]
    Log(csv::Error),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One end-to-end reconciliation over one punch-log file.
///
/// The run is a linear pipeline: snapshot the directory, fold the line
/// stream into a day book, synthesize absences for covered shifts, then
/// merge everything into the store as a single atomic commit. A failure
/// before or during the commit leaves the ledger exactly as it was.
pub struct ReconciliationRun;

impl ReconciliationRun {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        directory: &dyn PersonDirectory,
        store: &dyn AttendanceStore,
        options: &RunOptions,
    ) -> Result<RunReport, ReconcileError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, directory, store, options)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        directory: &dyn PersonDirectory,
        store: &dyn AttendanceStore,
        options: &RunOptions,
    ) -> Result<RunReport, ReconcileError> {
        let people = directory.snapshot()?;
        let index = RegistrationIndex::build(&people);

        let mut report = RunReport::default();
        let mut book = DayBook::default();

        let mut log = csv::ReaderBuilder::new()
            .delimiter(parser::FIELD_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for record in log.records() {
            let record = match record {
                Ok(record) => record,
                Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                    return Err(ReconcileError::Log(err));
                }
                Err(err) => {
                    report.lines_read += 1;
                    report.malformed += 1;
                    debug!(%err, "unreadable punch record");
                    continue;
                }
            };

            report.lines_read += 1;
            let Some(event) = parser::parse_record(&record) else {
                report.malformed += 1;
                debug!(line = ?record, "malformed punch line");
                continue;
            };

            if !options.date_scope.admits(event.date) {
                report.skipped += 1;
                continue;
            }
            if let (Some(filter), Some(minute)) = (options.time_filter, event.minute_of_day) {
                if !filter.contains(minute) {
                    report.skipped += 1;
                    continue;
                }
            }

            let Some(person_id) = index.resolve(&event.registration) else {
                report.unmatched += 1;
                debug!(registration = %event.registration, "punch matched no enrolled person");
                continue;
            };

            book.record(person_id.clone(), &event, &options.windows);
            report.punches_matched += 1;
        }

        let absences = absences::synthesize(&book, &people);

        let plan = merger::plan(&book, &absences, store)?;
        store.commit(plan.batch)?;

        report.present_inserted = plan.present_inserted;
        report.present_updated = plan.present_updated;
        report.present_unchanged = plan.present_unchanged;
        report.absences_synthesized = plan.absences_inserted;
        report.absences_suppressed = plan.absences_suppressed;
        report.dates = book.dates().into_iter().collect();
        report.registration_collisions = index.collisions().to_vec();

        info!(
            lines = report.lines_read,
            present = report.present_total(),
            absent = report.absences_synthesized,
            unmatched = report.unmatched,
            dates = report.dates.len(),
            "reconciliation run complete"
        );
        Ok(report)
    }
}
