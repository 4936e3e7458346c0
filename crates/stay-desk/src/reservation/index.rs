use super::domain::{Booking, RoomKey};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Occupied rooms per night, derived once from the bookings sheet.
///
/// A booking occupies every night in `[check_in, check_out)`; the checkout date itself
/// stays free for the next guest. Cancelled bookings occupy nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingIndex {
    by_night: BTreeMap<NaiveDate, BTreeSet<RoomKey>>,
}

impl BookingIndex {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        let mut by_night: BTreeMap<NaiveDate, BTreeSet<RoomKey>> = BTreeMap::new();

        for booking in bookings.iter().filter(|booking| !booking.is_cancelled()) {
            let key = booking.room_key();
            for night in booking.nights() {
                by_night.entry(night).or_default().insert(key.clone());
            }
        }

        Self { by_night }
    }

    pub fn is_occupied(&self, key: &RoomKey, night: NaiveDate) -> bool {
        self.by_night
            .get(&night)
            .map(|rooms| rooms.contains(key))
            .unwrap_or(false)
    }

    pub fn booked_count(&self, night: NaiveDate) -> usize {
        self.by_night.get(&night).map(BTreeSet::len).unwrap_or(0)
    }

    /// Free rooms on a night, as shown in the calendar cell.
    pub fn rooms_free_on(&self, night: NaiveDate, inventory_len: usize) -> usize {
        inventory_len.saturating_sub(self.booked_count(night))
    }

    pub fn nights(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_night.keys().copied()
    }
}
