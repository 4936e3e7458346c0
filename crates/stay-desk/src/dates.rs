//! Calendar-date helpers.
//!
//! Every date in the booking desk is a local calendar date (`NaiveDate`). Inputs that
//! carry a time or an offset are reduced to the date they were written with; nothing
//! is converted through UTC, so a check-in typed as `2025-10-03T23:30:00+05:30` stays
//! on the 3rd.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

/// Parses the date formats found in uploaded sheets and configuration files.
pub fn parse_local_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim().trim_start_matches('\u{feff}');
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local().date());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// `YYYY-MM-DD` rendering used as the booking index key in JSON output.
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn deserialize_lenient_dates<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .iter()
        .filter_map(|value| value.as_str().and_then(parse_local_date))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn parses_sheet_formats() {
        assert_eq!(parse_local_date("2025-10-03"), Some(date(2025, 10, 3)));
        assert_eq!(parse_local_date(" 2025/10/03 "), Some(date(2025, 10, 3)));
        assert_eq!(parse_local_date("10/03/2025"), Some(date(2025, 10, 3)));
        assert_eq!(parse_local_date("3 Oct 2025"), Some(date(2025, 10, 3)));
        assert_eq!(parse_local_date("Oct 03, 2025"), Some(date(2025, 10, 3)));
        assert_eq!(parse_local_date("2025-10-03T09:15:00"), Some(date(2025, 10, 3)));
    }

    #[test]
    fn offsets_do_not_shift_the_day() {
        assert_eq!(
            parse_local_date("2025-10-03T23:30:00+05:30"),
            Some(date(2025, 10, 3))
        );
        assert_eq!(
            parse_local_date("2025-10-03T00:30:00-08:00"),
            Some(date(2025, 10, 3))
        );
    }

    #[test]
    fn rejects_blank_and_garbage() {
        assert_eq!(parse_local_date(""), None);
        assert_eq!(parse_local_date("   "), None);
        assert_eq!(parse_local_date("next friday"), None);
        assert_eq!(parse_local_date("2025-02-30"), None);
    }

    #[test]
    fn iso_is_zero_padded() {
        assert_eq!(iso(date(2026, 1, 5)), "2026-01-05");
    }
}
