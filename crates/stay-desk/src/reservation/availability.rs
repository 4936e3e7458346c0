use super::domain::{Filters, Room, StayRange};
use super::index::BookingIndex;
use std::collections::BTreeMap;

/// Rooms that pass the amenity and head-count filters and are free on every night of
/// `stay`.
///
/// Without a complete stay nothing is excluded for occupancy reasons; the calendar
/// then shows the whole filtered inventory as bookable. Input order is preserved.
pub fn available_rooms<'a>(
    rooms: &'a [Room],
    filters: &Filters,
    index: &BookingIndex,
    stay: Option<&StayRange>,
) -> Vec<&'a Room> {
    rooms
        .iter()
        .filter(|room| filters.admits(room))
        .filter(|room| stay.map_or(true, |stay| is_free_for(room, index, stay)))
        .collect()
}

pub fn is_free_for(room: &Room, index: &BookingIndex, stay: &StayRange) -> bool {
    let key = room.key();
    stay.nights().all(|night| !index.is_occupied(&key, night))
}

/// Groups rooms by block, each block sorted by room number for display.
pub fn rooms_by_block<'a>(rooms: &[&'a Room]) -> BTreeMap<String, Vec<&'a Room>> {
    let mut grouped: BTreeMap<String, Vec<&'a Room>> = BTreeMap::new();
    for room in rooms {
        grouped.entry(room.block.clone()).or_default().push(*room);
    }
    for block_rooms in grouped.values_mut() {
        block_rooms.sort_by(|a, b| a.number.cmp(&b.number));
    }
    grouped
}
