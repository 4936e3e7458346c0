use super::domain::StayRange;
use chrono::NaiveDate;
use serde::Serialize;

/// Check-in/check-out picking on the calendar.
///
/// Each pick moves the selection forward:
///
/// * `Empty` or `Complete` + pick `d` → `PartialStart { check_in: d }`
/// * `PartialStart` + pick `d <= check_in` → `PartialStart { check_in: d }`
/// * `PartialStart` + pick `d > check_in` → `Complete`
///
/// so a complete selection always spans at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "SelectionView")]
pub enum SelectionState {
    #[default]
    Empty,
    PartialStart {
        check_in: NaiveDate,
    },
    Complete {
        stay: StayRange,
    },
}

#[derive(Debug, Serialize)]
struct SelectionView {
    state: &'static str,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
}

impl From<SelectionState> for SelectionView {
    fn from(selection: SelectionState) -> Self {
        let state = match selection {
            SelectionState::Empty => "empty",
            SelectionState::PartialStart { .. } => "partial_start",
            SelectionState::Complete { .. } => "complete",
        };
        Self {
            state,
            check_in: selection.check_in(),
            check_out: selection.check_out(),
        }
    }
}

impl SelectionState {
    #[must_use]
    pub fn pick(self, date: NaiveDate) -> Self {
        match self {
            SelectionState::Empty | SelectionState::Complete { .. } => {
                SelectionState::PartialStart { check_in: date }
            }
            SelectionState::PartialStart { check_in } => match StayRange::new(check_in, date) {
                Some(stay) => SelectionState::Complete { stay },
                None => SelectionState::PartialStart { check_in: date },
            },
        }
    }

    pub fn check_in(&self) -> Option<NaiveDate> {
        match self {
            SelectionState::Empty => None,
            SelectionState::PartialStart { check_in } => Some(*check_in),
            SelectionState::Complete { stay } => Some(stay.check_in()),
        }
    }

    pub fn check_out(&self) -> Option<NaiveDate> {
        match self {
            SelectionState::Complete { stay } => Some(stay.check_out()),
            _ => None,
        }
    }

    pub fn stay(&self) -> Option<&StayRange> {
        match self {
            SelectionState::Complete { stay } => Some(stay),
            _ => None,
        }
    }

    /// Whether `date` is the lone anchor of a half-made selection.
    pub fn is_anchor(&self, date: NaiveDate) -> bool {
        matches!(self, SelectionState::PartialStart { check_in } if *check_in == date)
    }

    /// Display range; includes the checkout day.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self {
            SelectionState::Complete { stay } => {
                stay.check_in() <= date && date <= stay.check_out()
            }
            _ => false,
        }
    }
}
