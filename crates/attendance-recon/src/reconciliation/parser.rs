use chrono::NaiveDate;
use csv::StringRecord;

use super::options::MinuteOfDay;

/// Field separator of the turnstile export format.
pub(crate) const FIELD_DELIMITER: u8 = b';';

/// Layout: `anyId;registration;deviceCode;date;time[;...]`.
const MIN_FIELDS: usize = 5;

/// One punch as read from the device log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PunchEvent {
    pub registration: String,
    pub device_code: String,
    pub date: NaiveDate,
    /// `None` when the time field was unparseable; the punch still counts as
    /// presence for its date but never classifies into a shift window.
    pub minute_of_day: Option<MinuteOfDay>,
}

/// Turns one record into a punch, or `None` when the record is malformed
/// (too few fields or an unparseable date). Never fails.
pub(crate) fn parse_record(record: &StringRecord) -> Option<PunchEvent> {
    if record.len() < MIN_FIELDS {
        return None;
    }

    let date = parse_punch_date(record[3].trim())?;
    Some(PunchEvent {
        registration: record[1].trim().to_string(),
        device_code: record[2].trim().to_string(),
        date,
        minute_of_day: parse_punch_time(record[4].trim()),
    })
}

/// Accepts `DD/MM/YYYY` or the fixed 8-digit `DDMMYYYY` wire form.
fn parse_punch_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%d/%m/%Y") {
        return Some(date);
    }
    if raw.len() == 8 && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        return NaiveDate::parse_from_str(raw, "%d%m%Y").ok();
    }
    None
}

/// Strips an optional colon and reads the remainder as a 3-4 digit 24h clock
/// value (`800`, `0800`, `08:00`).
fn parse_punch_time(raw: &str) -> Option<MinuteOfDay> {
    let digits = raw.replace(':', "");
    if !(3..=4).contains(&digits.len()) || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let value: u32 = digits.parse().ok()?;
    let (hours, minutes) = (value / 100, value % 100);
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some((hours * 60 + minutes) as MinuteOfDay)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn parses_slash_and_compact_dates() {
        let slash = parse_record(&record(&["77", "1018", "gate-a", "03/05/2024", "0800"]))
            .expect("slash date parses");
        let compact = parse_record(&record(&["77", "1018", "gate-a", "03052024", "0800"]))
            .expect("compact date parses");

        let expected = NaiveDate::from_ymd_opt(2024, 5, 3).expect("valid date");
        assert_eq!(slash.date, expected);
        assert_eq!(compact.date, expected);
        assert_eq!(slash.minute_of_day, Some(480));
    }

    #[test]
    fn too_few_fields_is_malformed() {
        assert_eq!(parse_record(&record(&["77", "1018", "gate-a", "03/05/2024"])), None);
    }

    #[test]
    fn unparseable_date_is_malformed() {
        assert_eq!(
            parse_record(&record(&["77", "1018", "gate-a", "2024-05-03", "0800"])),
            None
        );
        assert_eq!(
            parse_record(&record(&["77", "1018", "gate-a", "99999999", "0800"])),
            None
        );
    }

    #[test]
    fn unparseable_time_keeps_the_event() {
        let event = parse_record(&record(&["77", "1018", "gate-a", "03/05/2024", "morning"]))
            .expect("event kept despite bad time");
        assert_eq!(event.minute_of_day, None);

        let late = parse_record(&record(&["77", "1018", "gate-a", "03/05/2024", "2571"]))
            .expect("event kept despite out-of-clock time");
        assert_eq!(late.minute_of_day, None);
    }

    #[test]
    fn time_tolerates_colon_and_three_digits() {
        let colon = parse_record(&record(&["77", "1018", "gate-a", "03/05/2024", "08:00"]))
            .expect("colon time parses");
        let short = parse_record(&record(&["77", "1018", "gate-a", "03/05/2024", "800"]))
            .expect("three-digit time parses");
        assert_eq!(colon.minute_of_day, Some(480));
        assert_eq!(short.minute_of_day, Some(480));
    }

    #[test]
    fn extra_trailing_fields_are_ignored() {
        let event = parse_record(&record(&[
            "77", "1018", "gate-a", "03/05/2024", "1015", "extra", "fields",
        ]))
        .expect("extra fields tolerated");
        assert_eq!(event.registration, "1018");
        assert_eq!(event.device_code, "gate-a");
        assert_eq!(event.minute_of_day, Some(615));
    }
}
