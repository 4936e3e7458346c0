use super::availability::{available_rooms, rooms_by_block};
use super::calendar::{CalendarContext, CalendarMonth, DayClassifier};
use super::domain::{Booking, Filters, Room, RoomKey};
use super::index::BookingIndex;
use super::pricing::{CancellationCharge, PriceBreakdown, PricingEngine};
use super::selection::SelectionState;
use super::summary::BookingSummary;
use crate::config::DataConfig;
use crate::inventory;
use crate::settings::{GuestCategory, PropertySettings};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Immutable view of the property: inventory, bookings and configuration, loaded once.
#[derive(Debug, Clone)]
pub struct BookingSnapshot {
    pub rooms: Vec<Room>,
    pub bookings: Vec<Booking>,
    pub index: BookingIndex,
    pub settings: PropertySettings,
    pub classifier: DayClassifier,
}

impl BookingSnapshot {
    pub fn new(rooms: Vec<Room>, bookings: Vec<Booking>, settings: PropertySettings) -> Self {
        let index = BookingIndex::from_bookings(&bookings);
        let classifier = settings.day_classifier();
        Self {
            rooms,
            bookings,
            index,
            settings,
            classifier,
        }
    }

    pub fn load(data: &DataConfig) -> Self {
        let settings = PropertySettings::load(data);
        let rooms = inventory::load_rooms(data);
        let bookings = inventory::load_bookings(data);
        let snapshot = Self::new(rooms, bookings, settings);
        info!(
            root = %data.root().display(),
            rooms = snapshot.rooms.len(),
            bookings = snapshot.bookings.len(),
            booked_nights = snapshot.index.nights().count(),
            "booking snapshot ready"
        );
        snapshot
    }

    pub fn room(&self, key: &RoomKey) -> Option<&Room> {
        self.rooms.iter().find(|room| &room.key() == key)
    }

    /// Blocks present in the inventory, sorted.
    pub fn blocks(&self) -> BTreeSet<&str> {
        self.rooms.iter().map(|room| room.block.as_str()).collect()
    }

    pub fn pricing(&self) -> PricingEngine<'_> {
        PricingEngine::new(&self.settings.tariff, &self.classifier)
    }

    /// Month views over the configured booking window.
    pub fn calendar(&self, today: NaiveDate, selection: &SelectionState) -> Vec<CalendarMonth> {
        CalendarContext {
            classifier: &self.classifier,
            index: &self.index,
            inventory_len: self.rooms.len(),
            selection,
        }
        .months_from(today, self.settings.rules.calendar_months)
    }

    /// Bookings that are not cancelled and have not checked out before `today`.
    pub fn open_bookings(&self, today: NaiveDate) -> usize {
        self.bookings
            .iter()
            .filter(|booking| booking.is_open_on(today))
            .count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealCounts {
    pub veg: u32,
    pub non_veg: u32,
}

/// Counts the member types in before choosing rooms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    pub rooms: u32,
    pub occupants: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub name: String,
    pub membership_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockOverview {
    pub block: String,
    pub available: usize,
    pub included: bool,
    pub open: bool,
}

/// One member's in-progress booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSession {
    selection: SelectionState,
    filters: Filters,
    rooms_selected: BTreeMap<RoomKey, u8>,
    blocks_included: BTreeSet<String>,
    block_open: Option<String>,
    pub meals: MealCounts,
    pub requirements: Requirements,
    pub member: MemberProfile,
}

impl Default for BookingSession {
    fn default() -> Self {
        Self {
            selection: SelectionState::Empty,
            filters: Filters::default(),
            rooms_selected: BTreeMap::new(),
            blocks_included: BTreeSet::new(),
            block_open: None,
            meals: MealCounts::default(),
            requirements: Requirements::default(),
            member: MemberProfile::default(),
        }
    }
}

impl BookingSession {
    /// A fresh session using the property's default head count.
    pub fn for_snapshot(snapshot: &BookingSnapshot) -> Self {
        let mut session = Self::default();
        session.set_occupancy(snapshot.settings.rules.default_occupancy() as i64);
        session
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn pick_date(&mut self, date: NaiveDate) -> &SelectionState {
        self.selection = self.selection.pick(date);
        &self.selection
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
    }

    pub fn set_occupancy(&mut self, occupancy: i64) {
        self.filters.set_occupancy(occupancy);
    }

    /// Selects a room with the occupancy filter clamped into the room's capacity, or
    /// deselects it.
    /// Returns whether the room is selected afterwards.
    pub fn toggle_room(&mut self, room: &Room) -> bool {
        let key = room.key();
        if self.rooms_selected.remove(&key).is_some() {
            return false;
        }
        let occupants = room.clamp_occupants(self.filters.occupancy());
        self.rooms_selected.insert(key, occupants);
        true
    }

    /// `0` deselects the room; anything else is clamped into the room's capacity.
    pub fn set_room_occupants(&mut self, room: &Room, occupants: u8) {
        let key = room.key();
        if occupants == 0 {
            self.rooms_selected.remove(&key);
        } else {
            self.rooms_selected
                .insert(key, room.clamp_occupants(occupants));
        }
    }

    pub fn rooms_selected(&self) -> &BTreeMap<RoomKey, u8> {
        &self.rooms_selected
    }

    pub fn selected_room_count(&self) -> usize {
        self.rooms_selected.len()
    }

    pub fn selected_occupants(&self) -> u32 {
        self.rooms_selected.values().map(|&count| count as u32).sum()
    }

    /// Every block is included until the member narrows the list.
    fn ensure_blocks(&mut self, snapshot: &BookingSnapshot) {
        if self.blocks_included.is_empty() {
            let blocks = snapshot.blocks();
            self.blocks_included = blocks.iter().map(|block| block.to_string()).collect();
            self.block_open = blocks.first().map(|block| block.to_string());
        }
    }

    /// Flips whether `block` is included and opens it.
    pub fn toggle_block(&mut self, snapshot: &BookingSnapshot, block: &str) {
        self.ensure_blocks(snapshot);
        if !self.blocks_included.remove(block) {
            self.blocks_included.insert(block.to_string());
        }
        self.block_open = Some(block.to_string());
    }

    pub fn open_block(&mut self, block: &str) {
        self.block_open = Some(block.to_string());
    }

    /// The open block, defaulting to the first block of the inventory.
    pub fn current_block<'s>(&'s self, snapshot: &'s BookingSnapshot) -> Option<&'s str> {
        self.block_open
            .as_deref()
            .or_else(|| snapshot.blocks().first().copied())
    }

    pub fn available_rooms<'a>(&self, snapshot: &'a BookingSnapshot) -> Vec<&'a Room> {
        available_rooms(
            &snapshot.rooms,
            &self.filters,
            &snapshot.index,
            self.selection.stay(),
        )
    }

    /// One entry per inventory block with its count of currently available rooms.
    pub fn block_overview(&self, snapshot: &BookingSnapshot) -> Vec<BlockOverview> {
        let available = self.available_rooms(snapshot);
        let grouped = rooms_by_block(&available);
        let open = self.current_block(snapshot);

        snapshot
            .blocks()
            .into_iter()
            .map(|block| BlockOverview {
                block: block.to_string(),
                available: grouped.get(block).map_or(0, Vec::len),
                included: self.blocks_included.is_empty() || self.blocks_included.contains(block),
                open: open == Some(block),
            })
            .collect()
    }

    /// Available rooms of the open block, sorted by room number.
    pub fn open_block_rooms<'a>(&self, snapshot: &'a BookingSnapshot) -> Vec<&'a Room> {
        let Some(open) = self.current_block(snapshot).map(str::to_string) else {
            return Vec::new();
        };
        let available = self.available_rooms(snapshot);
        rooms_by_block(&available).remove(&open).unwrap_or_default()
    }

    /// Prices the selected rooms over the current stay. Keys missing from the
    /// inventory are skipped.
    pub fn quote(&self, snapshot: &BookingSnapshot) -> PriceBreakdown {
        let rooms: Vec<&Room> = self
            .rooms_selected
            .keys()
            .filter_map(|key| snapshot.room(key))
            .collect();
        snapshot.pricing().breakdown(&rooms, self.selection.stay())
    }

    /// Charge for cancelling the current stay on `cancelled_on`; `None` until a stay
    /// is complete.
    pub fn cancellation(
        &self,
        snapshot: &BookingSnapshot,
        cancelled_on: NaiveDate,
    ) -> Option<CancellationCharge> {
        let stay = self.selection.stay()?;
        let quote = self.quote(snapshot);
        Some(snapshot.settings.rules.cancellation.charge(
            &quote,
            stay.check_in(),
            cancelled_on,
            self.filters.group,
        ))
    }

    pub fn summary(
        &self,
        snapshot: &BookingSnapshot,
        today: NaiveDate,
        category: GuestCategory,
    ) -> BookingSummary {
        BookingSummary {
            check_in: self.selection.check_in(),
            check_out: self.selection.check_out(),
            requirements: self.requirements,
            rooms_selected: self.selected_room_count(),
            occupants_selected: self.selected_occupants(),
            meals: self.meals,
            price: self.quote(snapshot),
            open_bookings: snapshot.open_bookings(today),
            member: self.member.clone(),
            advance: self.selection.check_in().map(|check_in| {
                snapshot
                    .settings
                    .rules
                    .check_advance(category, today, check_in)
            }),
        }
    }
}
