use chrono::NaiveDate;

use crate::directory::Shift;

/// Minutes since midnight, the engine's time-of-day resolution.
pub type MinuteOfDay = u16;

pub(crate) fn format_minute(minute: MinuteOfDay) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Inclusive time-of-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteRange {
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

impl MinuteRange {
    pub fn new(start: MinuteOfDay, end: MinuteOfDay) -> Result<Self, OptionsError> {
        if start > end {
            return Err(OptionsError::Inverted);
        }
        Ok(Self { start, end })
    }

    pub fn contains(self, minute: MinuteOfDay) -> bool {
        (self.start..=self.end).contains(&minute)
    }

    /// Parses `"HH:MM-HH:MM"`.
    pub fn parse(raw: &str) -> Result<Self, OptionsError> {
        let (start, end) = raw
            .split_once('-')
            .ok_or_else(|| OptionsError::InvalidRange(raw.to_string()))?;
        Self::new(parse_minute(start)?, parse_minute(end)?)
    }
}

fn parse_minute(raw: &str) -> Result<MinuteOfDay, OptionsError> {
    let invalid = || OptionsError::InvalidTime(raw.to_string());
    let (hours, minutes) = raw.trim().split_once(':').ok_or_else(invalid)?;
    let hours: MinuteOfDay = hours.parse().map_err(|_| invalid())?;
    let minutes: MinuteOfDay = minutes.parse().map_err(|_| invalid())?;
    if hours >= 24 || minutes >= 60 {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

/// The morning and afternoon coverage windows for one run.
///
/// Windows must be ordered and non-overlapping so a punch classifies to at
/// most one shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindows {
    pub morning: MinuteRange,
    pub afternoon: MinuteRange,
}

impl Default for ShiftWindows {
    fn default() -> Self {
        // 06:00-12:40 and 12:41-18:40.
        Self {
            morning: MinuteRange {
                start: 6 * 60,
                end: 12 * 60 + 40,
            },
            afternoon: MinuteRange {
                start: 12 * 60 + 41,
                end: 18 * 60 + 40,
            },
        }
    }
}

impl ShiftWindows {
    pub fn new(morning: MinuteRange, afternoon: MinuteRange) -> Result<Self, OptionsError> {
        if morning.end >= afternoon.start {
            return Err(OptionsError::OverlappingWindows);
        }
        Ok(Self { morning, afternoon })
    }

    pub fn window(&self, shift: Shift) -> MinuteRange {
        match shift {
            Shift::Morning => self.morning,
            Shift::Afternoon => self.afternoon,
        }
    }

    pub fn classify(&self, minute: MinuteOfDay) -> Option<Shift> {
        if self.morning.contains(minute) {
            Some(Shift::Morning)
        } else if self.afternoon.contains(minute) {
            Some(Shift::Afternoon)
        } else {
            None
        }
    }
}

/// Which calendar dates a run is allowed to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateScope {
    /// Reconcile every date found in the file.
    #[default]
    AllDates,
    /// Only reconcile punches on this date; everything else is skipped.
    Single(NaiveDate),
}

impl DateScope {
    pub fn admits(self, date: NaiveDate) -> bool {
        match self {
            Self::AllDates => true,
            Self::Single(only) => only == date,
        }
    }
}

/// Explicit per-run configuration; never ambient process state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub windows: ShiftWindows,
    /// Punches outside this range are skipped, which also keeps them from
    /// marking a shift active.
    pub time_filter: Option<MinuteRange>,
    pub date_scope: DateScope,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("invalid time '{0}': expected HH:MM")]
    InvalidTime(String),
    #[error("invalid time range '{0}': expected HH:MM-HH:MM")]
    InvalidRange(String),
    #[error("time range ends before it starts")]
    Inverted,
    #[error("morning window must end before the afternoon window starts")]
    OverlappingWindows,
}
