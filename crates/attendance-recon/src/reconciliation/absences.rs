use chrono::NaiveDate;

use super::aggregator::DayBook;
use crate::directory::{PersonId, PersonRecord};

/// Observation written on every synthesized absence.
pub(crate) const SYNTHETIC_OBSERVATION: &str = "automatic absence - device log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AbsenceCandidate {
    pub(crate) person_id: PersonId,
    pub(crate) date: NaiveDate,
}

/// Runs once the whole file has been folded into the day book: for every
/// date whose shift window saw activity, every person declared on that shift
/// with no presence draft becomes an absence candidate. Shifts the log never
/// touched produce nothing, so a half-day device outage cannot mark the
/// other shift absent.
pub(crate) fn synthesize(book: &DayBook, people: &[PersonRecord]) -> Vec<AbsenceCandidate> {
    let mut candidates = Vec::new();
    for (date, activity) in book.activity() {
        for person in people {
            if activity.covers(person.shift) && !book.has_presence(&person.id, date) {
                candidates.push(AbsenceCandidate {
                    person_id: person.id.clone(),
                    date,
                });
            }
        }
    }
    candidates
}
