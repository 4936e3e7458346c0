mod cells;
mod mapping;
mod parser;

use crate::config::DataConfig;
use crate::reservation::domain::{Booking, Room};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads room and booking sheets exported from the property spreadsheet.
pub struct InventoryImporter;

impl InventoryImporter {
    pub fn rooms_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Room>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::rooms_from_reader(file)
    }

    pub fn rooms_from_reader<R: Read>(reader: R) -> Result<Vec<Room>, ImportError> {
        Ok(parser::parse_rooms(reader)?)
    }

    pub fn bookings_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Booking>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::bookings_from_reader(file)
    }

    pub fn bookings_from_reader<R: Read>(reader: R) -> Result<Vec<Booking>, ImportError> {
        Ok(parser::parse_bookings(reader)?)
    }
}

/// Tries each room sheet in order and keeps the first that yields rooms.
/// When none does, the built-in three-room inventory is used.
pub fn load_rooms(data: &DataConfig) -> Vec<Room> {
    for path in data.room_sources() {
        if !path.exists() {
            continue;
        }
        match InventoryImporter::rooms_from_path(&path) {
            Ok(rooms) if !rooms.is_empty() => {
                info!(path = %path.display(), rooms = rooms.len(), "room inventory loaded");
                return rooms;
            }
            Ok(_) => warn!(path = %path.display(), "room sheet has no usable rows"),
            Err(err) => warn!(path = %path.display(), error = %err, "room sheet unreadable"),
        }
    }

    warn!("no room sheet available, using fallback inventory");
    fallback_rooms()
}

/// Bookings from `uploads/bookings.csv`; a missing or unreadable sheet means no bookings.
pub fn load_bookings(data: &DataConfig) -> Vec<Booking> {
    let path = data.bookings_path();
    if !path.exists() {
        info!(path = %path.display(), "no bookings sheet, starting with an empty calendar");
        return Vec::new();
    }

    match InventoryImporter::bookings_from_path(&path) {
        Ok(bookings) => {
            info!(path = %path.display(), bookings = bookings.len(), "bookings loaded");
            bookings
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "bookings sheet unreadable");
            Vec::new()
        }
    }
}

pub fn fallback_rooms() -> Vec<Room> {
    let room = |block: &str, number: &str, min: u8, max: u8, extras: bool| Room {
        block: block.to_string(),
        number: number.to_string(),
        floor: "0".to_string(),
        min_occupants: min,
        max_occupants: max,
        has_ac: extras,
        wheelchair_accessible: false,
        pets_allowed: extras,
        group_booking_allowed: extras,
    };

    vec![
        room("A", "1", 1, 2, false),
        room("B", "2", 1, 3, false),
        room("C", "3", 2, 4, true),
    ]
}
