use chrono::NaiveDate;
use serde::Serialize;

use super::matcher::RegistrationCollision;

/// Counters accumulated across one reconciliation run. Pure value object;
/// rendering and storage are the caller's concern.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Records read from the file, malformed ones included.
    pub lines_read: u64,
    /// Records dropped before matching: too few fields or a bad date.
    pub malformed: u64,
    /// Punches excluded by the time filter or the date scope.
    pub skipped: u64,
    /// Punches whose registration resolved to no enrolled person.
    pub unmatched: u64,
    /// Punches that reached the day book.
    pub punches_matched: u64,
    pub present_inserted: usize,
    pub present_updated: usize,
    /// Person-days already recorded Present with every fragment on file.
    pub present_unchanged: usize,
    /// Synthetic absences written to the ledger.
    pub absences_synthesized: usize,
    /// Synthetic absences discarded because any record already existed.
    pub absences_suppressed: usize,
    /// Distinct calendar dates touched, ascending.
    pub dates: Vec<NaiveDate>,
    pub registration_collisions: Vec<RegistrationCollision>,
}

impl RunReport {
    /// Person-days the log showed present, however they merged.
    pub fn present_total(&self) -> usize {
        self.present_inserted + self.present_updated + self.present_unchanged
    }

    /// One-line human summary for operator-facing output.
    pub fn summary(&self) -> String {
        format!(
            "processed {}, present {}, auto-absent {}, unmatched {}, malformed {}",
            self.lines_read,
            self.present_total(),
            self.absences_synthesized,
            self.unmatched,
            self.malformed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_operator_counts() {
        let report = RunReport {
            lines_read: 12,
            malformed: 2,
            unmatched: 1,
            present_inserted: 5,
            present_updated: 1,
            absences_synthesized: 3,
            ..RunReport::default()
        };
        assert_eq!(
            report.summary(),
            "processed 12, present 6, auto-absent 3, unmatched 1, malformed 2"
        );
    }
}
