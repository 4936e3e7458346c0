use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_OCCUPANCY: u8 = 1;
pub const MAX_OCCUPANCY: u8 = 4;
pub const DEFAULT_OCCUPANCY: u8 = 2;

/// Identity of a room: block name immediately followed by the room number (`"A1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn new(block: &str, number: &str) -> Self {
        Self(format!("{block}{number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomKey {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub block: String,
    pub number: String,
    pub floor: String,
    pub min_occupants: u8,
    pub max_occupants: u8,
    pub has_ac: bool,
    pub wheelchair_accessible: bool,
    pub pets_allowed: bool,
    pub group_booking_allowed: bool,
}

impl Room {
    pub fn key(&self) -> RoomKey {
        RoomKey::new(&self.block, &self.number)
    }

    pub fn accepts_occupancy(&self, occupants: u8) -> bool {
        (self.min_occupants..=self.max_occupants).contains(&occupants)
    }

    /// Choices offered next to a room: `0` (not selected) followed by its capacity range.
    pub fn occupancy_options(&self) -> Vec<u8> {
        std::iter::once(0)
            .chain(self.min_occupants..=self.max_occupants)
            .collect()
    }

    pub fn clamp_occupants(&self, occupants: u8) -> u8 {
        occupants.clamp(self.min_occupants, self.max_occupants)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub block: String,
    pub room_number: String,
    /// Lower-cased status text from the bookings sheet.
    pub status: String,
}

impl Booking {
    pub fn room_key(&self) -> RoomKey {
        RoomKey::new(&self.block, &self.room_number)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == "cancelled"
    }

    /// Occupied nights, `[check_in, check_out)`.
    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.check_in
            .iter_days()
            .take_while(move |night| *night < self.check_out)
    }

    /// Still relevant to the member: not cancelled and not yet checked out before `today`.
    pub fn is_open_on(&self, today: NaiveDate) -> bool {
        !self.is_cancelled() && self.check_out >= today
    }
}

/// A stay with at least one night: `check_out` is strictly after `check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        (check_out > check_in).then_some(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> {
        let check_out = self.check_out;
        self.check_in
            .iter_days()
            .take_while(move |night| *night < check_out)
    }

    pub fn night_count(&self) -> u32 {
        (self.check_out - self.check_in).num_days() as u32
    }
}

/// Attribute and head-count filters applied to the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FilterInput")]
pub struct Filters {
    pub wheelchair: bool,
    pub pet: bool,
    pub ac: bool,
    pub group: bool,
    occupancy: u8,
}

impl Filters {
    pub fn new(wheelchair: bool, pet: bool, ac: bool, group: bool, occupancy: i64) -> Self {
        Self {
            wheelchair,
            pet,
            ac,
            group,
            occupancy: clamp_occupancy(occupancy),
        }
    }

    pub fn occupancy(&self) -> u8 {
        self.occupancy
    }

    pub fn set_occupancy(&mut self, occupancy: i64) {
        self.occupancy = clamp_occupancy(occupancy);
    }

    pub fn with_occupancy(mut self, occupancy: i64) -> Self {
        self.set_occupancy(occupancy);
        self
    }

    pub(crate) fn admits(&self, room: &Room) -> bool {
        if self.wheelchair && !room.wheelchair_accessible {
            return false;
        }
        if self.pet && !room.pets_allowed {
            return false;
        }
        if self.ac && !room.has_ac {
            return false;
        }
        if self.group && !room.group_booking_allowed {
            return false;
        }
        room.accepts_occupancy(self.occupancy)
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::new(false, false, false, false, DEFAULT_OCCUPANCY as i64)
    }
}

pub fn clamp_occupancy(value: i64) -> u8 {
    value.clamp(MIN_OCCUPANCY as i64, MAX_OCCUPANCY as i64) as u8
}

#[derive(Debug, Deserialize)]
struct FilterInput {
    #[serde(default, alias = "wc")]
    wheelchair: bool,
    #[serde(default)]
    pet: bool,
    #[serde(default)]
    ac: bool,
    #[serde(default)]
    group: bool,
    #[serde(default = "default_occupancy_input", alias = "occ")]
    occupancy: i64,
}

fn default_occupancy_input() -> i64 {
    DEFAULT_OCCUPANCY as i64
}

impl From<FilterInput> for Filters {
    fn from(input: FilterInput) -> Self {
        Filters::new(
            input.wheelchair,
            input.pet,
            input.ac,
            input.group,
            input.occupancy,
        )
    }
}
