use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::options::{format_minute, MinuteOfDay, ShiftWindows};
use super::parser::PunchEvent;
use crate::directory::{PersonId, Shift};

pub(crate) const OBSERVATION_SEPARATOR: &str = " | ";

/// One device/time pair observed for a person-day. Drafts hold these
/// structurally so reprocessing the same file cannot grow the observation;
/// they render to text only when the ledger is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ObservationFragment {
    device_code: String,
    minute_of_day: Option<MinuteOfDay>,
}

impl ObservationFragment {
    pub(crate) fn render(&self) -> String {
        match self.minute_of_day {
            Some(minute) => format!("{} {}", self.device_code, format_minute(minute)),
            None => self.device_code.clone(),
        }
    }
}

/// Present candidate under construction for one `(person, date)` key.
#[derive(Debug, Default)]
pub(crate) struct PresenceDraft {
    fragments: Vec<ObservationFragment>,
}

impl PresenceDraft {
    fn push(&mut self, fragment: ObservationFragment) {
        if !self.fragments.contains(&fragment) {
            self.fragments.push(fragment);
        }
    }

    pub(crate) fn rendered_fragments(&self) -> Vec<String> {
        self.fragments.iter().map(ObservationFragment::render).collect()
    }

    pub(crate) fn render(&self) -> String {
        self.rendered_fragments().join(OBSERVATION_SEPARATOR)
    }
}

/// Which shift windows saw at least one punch on a given date. Determines
/// the blast radius of absence synthesis for that date.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ShiftActivity {
    morning: bool,
    afternoon: bool,
}

impl ShiftActivity {
    fn mark(&mut self, shift: Shift) {
        match shift {
            Shift::Morning => self.morning = true,
            Shift::Afternoon => self.afternoon = true,
        }
    }

    pub(crate) fn covers(self, shift: Shift) -> bool {
        match shift {
            Shift::Morning => self.morning,
            Shift::Afternoon => self.afternoon,
        }
    }
}

/// Accumulates the whole file into per-(person, date) presence drafts plus
/// per-date shift activity. Filled by one sequential fold over the line
/// stream; the directory snapshot it depends on is read-only for the run.
#[derive(Debug, Default)]
pub(crate) struct DayBook {
    presences: BTreeMap<(PersonId, NaiveDate), PresenceDraft>,
    activity: BTreeMap<NaiveDate, ShiftActivity>,
}

impl DayBook {
    pub(crate) fn record(&mut self, person_id: PersonId, event: &PunchEvent, windows: &ShiftWindows) {
        let draft = self.presences.entry((person_id, event.date)).or_default();
        draft.push(ObservationFragment {
            device_code: event.device_code.clone(),
            minute_of_day: event.minute_of_day,
        });

        if let Some(minute) = event.minute_of_day {
            if let Some(shift) = windows.classify(minute) {
                self.activity.entry(event.date).or_default().mark(shift);
            }
        }
    }

    pub(crate) fn presences(
        &self,
    ) -> impl Iterator<Item = (&(PersonId, NaiveDate), &PresenceDraft)> {
        self.presences.iter()
    }

    pub(crate) fn activity(&self) -> impl Iterator<Item = (NaiveDate, ShiftActivity)> + '_ {
        self.activity.iter().map(|(date, activity)| (*date, *activity))
    }

    pub(crate) fn has_presence(&self, person_id: &PersonId, date: NaiveDate) -> bool {
        self.presences.contains_key(&(person_id.clone(), date))
    }

    pub(crate) fn dates(&self) -> BTreeSet<NaiveDate> {
        self.presences.keys().map(|(_, date)| *date).collect()
    }
}
