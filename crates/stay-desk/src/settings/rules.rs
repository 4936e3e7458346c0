use crate::reservation::domain::{clamp_occupancy, DEFAULT_OCCUPANCY};
use crate::reservation::pricing::CancellationPolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who is travelling, which decides how far ahead a stay may be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuestCategory {
    Member,
    Group,
    MemberWithTemp,
    TempOnly,
}

impl GuestCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Group => "Group",
            Self::MemberWithTemp => "Member with temporary members",
            Self::TempOnly => "Temporary members only",
        }
    }
}

/// Contents of `rules.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRules {
    pub members_and_groups_days: i64,
    pub members_with_temp_days: i64,
    pub temp_only_days: i64,
    pub default_occupancy: u8,
    pub calendar_months: u32,
    pub cancellation: CancellationPolicy,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            members_and_groups_days: 180,
            members_with_temp_days: 90,
            temp_only_days: 60,
            default_occupancy: DEFAULT_OCCUPANCY,
            calendar_months: 8,
            cancellation: CancellationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdvanceCheck {
    pub category: GuestCategory,
    pub days_ahead: i64,
    pub limit_days: i64,
    pub within_window: bool,
}

impl BookingRules {
    pub fn advance_limit(&self, category: GuestCategory) -> i64 {
        match category {
            GuestCategory::Member | GuestCategory::Group => self.members_and_groups_days,
            GuestCategory::MemberWithTemp => self.members_with_temp_days,
            GuestCategory::TempOnly => self.temp_only_days,
        }
    }

    /// Reports whether `check_in` lies inside the advance-booking window. Informational;
    /// nothing in the engine refuses a selection because of it.
    pub fn check_advance(
        &self,
        category: GuestCategory,
        today: NaiveDate,
        check_in: NaiveDate,
    ) -> AdvanceCheck {
        let days_ahead = (check_in - today).num_days();
        let limit_days = self.advance_limit(category);
        AdvanceCheck {
            category,
            days_ahead,
            limit_days,
            within_window: (0..=limit_days).contains(&days_ahead),
        }
    }

    pub fn default_occupancy(&self) -> u8 {
        clamp_occupancy(self.default_occupancy as i64)
    }
}
