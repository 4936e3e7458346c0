mod classifier;
mod month;

pub use classifier::{is_weekend, DayClass, DayClassifier, DayPeriod, LongWeekends, RestrictedPeriods};
pub use month::{CalendarContext, CalendarDay, CalendarMonth};
