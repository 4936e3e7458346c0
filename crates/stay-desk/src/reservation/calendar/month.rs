use super::classifier::DayClassifier;
use crate::reservation::index::BookingIndex;
use crate::reservation::selection::SelectionState;
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

const WEEKDAY_SHORT: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub is_weekend: bool,
    pub is_special: bool,
    pub is_closed: bool,
    pub selected: bool,
    pub in_range: bool,
    pub rooms_available: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub days: Vec<CalendarDay>,
}

/// Everything needed to colour a day cell.
pub struct CalendarContext<'a> {
    pub classifier: &'a DayClassifier,
    pub index: &'a BookingIndex,
    pub inventory_len: usize,
    pub selection: &'a SelectionState,
}

impl CalendarContext<'_> {
    pub fn day(&self, date: NaiveDate) -> CalendarDay {
        let class = self.classifier.classify(date);
        CalendarDay {
            date,
            weekday: WEEKDAY_SHORT[date.weekday().num_days_from_monday() as usize],
            is_weekend: class.is_weekend,
            is_special: class.is_special,
            is_closed: class.is_closed,
            selected: self.selection.is_anchor(date),
            in_range: self.selection.covers(date),
            rooms_available: self.index.rooms_free_on(date, self.inventory_len),
        }
    }

    pub fn month(&self, first: NaiveDate) -> CalendarMonth {
        let first = first.with_day(1).unwrap_or(first);
        let days = first
            .iter_days()
            .take_while(|day| day.month() == first.month())
            .map(|day| self.day(day))
            .collect();

        CalendarMonth {
            year: first.year(),
            month: first.month(),
            title: first.format("%B %Y").to_string(),
            days,
        }
    }

    /// `months` consecutive months starting with the one containing `today`.
    pub fn months_from(&self, today: NaiveDate, months: u32) -> Vec<CalendarMonth> {
        let first = today.with_day(1).unwrap_or(today);
        (0..months)
            .filter_map(|offset| first.checked_add_months(Months::new(offset)))
            .map(|start| self.month(start))
            .collect()
    }
}
