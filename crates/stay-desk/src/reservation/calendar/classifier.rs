use crate::dates::{deserialize_lenient_dates, parse_local_date};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Inclusive run of dates from `restricted_periods.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every day of the period; empty when `end` precedes `start`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictedPeriods {
    #[serde(
        default,
        alias = "specialPeriods",
        deserialize_with = "deserialize_periods"
    )]
    pub special_periods: Vec<DayPeriod>,
    #[serde(
        default,
        alias = "closedPeriods",
        deserialize_with = "deserialize_periods"
    )]
    pub closed_periods: Vec<DayPeriod>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongWeekends {
    #[serde(default, deserialize_with = "deserialize_lenient_dates")]
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    #[serde(default)]
    start: Option<serde_json::Value>,
    #[serde(default)]
    end: Option<serde_json::Value>,
}

fn deserialize_periods<'de, D>(deserializer: D) -> Result<Vec<DayPeriod>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawPeriod>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|period| {
            let start = period.start.as_ref()?.as_str().and_then(parse_local_date)?;
            let end = period.end.as_ref()?.as_str().and_then(parse_local_date)?;
            Some(DayPeriod { start, end })
        })
        .collect())
}

/// Flags shown on a calendar day and consulted by the tariff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayClass {
    pub is_weekend: bool,
    pub is_special: bool,
    pub is_closed: bool,
}

/// Friday and Saturday nights are billed as weekend nights.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Fri | Weekday::Sat)
}

/// Special and closed date sets, expanded once from the configured periods.
///
/// Closed dates are informational: they colour the calendar but neither block a
/// selection nor remove rooms from availability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayClassifier {
    special: BTreeSet<NaiveDate>,
    closed: BTreeSet<NaiveDate>,
}

impl DayClassifier {
    pub fn new(restricted: &RestrictedPeriods, long_weekends: &LongWeekends) -> Self {
        let mut special: BTreeSet<NaiveDate> = restricted
            .special_periods
            .iter()
            .flat_map(DayPeriod::days)
            .collect();
        special.extend(long_weekends.dates.iter().copied());

        let closed = restricted
            .closed_periods
            .iter()
            .flat_map(DayPeriod::days)
            .collect();

        Self { special, closed }
    }

    pub fn classify(&self, date: NaiveDate) -> DayClass {
        DayClass {
            is_weekend: is_weekend(date),
            is_special: self.special.contains(&date),
            is_closed: self.closed.contains(&date),
        }
    }

    pub fn special_dates(&self) -> &BTreeSet<NaiveDate> {
        &self.special
    }
}
