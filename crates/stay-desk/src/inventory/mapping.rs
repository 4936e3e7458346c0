use csv::StringRecord;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical columns of the room classification sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RoomColumn {
    Block,
    Number,
    Floor,
    MinOccupants,
    MaxOccupants,
    AirConditioning,
    WheelchairAccess,
    PetsAllowed,
    GroupBooking,
}

/// Canonical columns of the bookings sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum BookingColumn {
    Id,
    CheckIn,
    CheckOut,
    Block,
    RoomNumber,
    Status,
}

/// Accepted headers per column, most preferred first.
const ROOM_ALIASES: &[(RoomColumn, &[&str])] = &[
    (RoomColumn::Block, &["Block", "BLOCK"]),
    (RoomColumn::Number, &["Room No", "Room", "RoomNo"]),
    (RoomColumn::Floor, &["Floor", "FLOOR"]),
    (RoomColumn::MinOccupants, &["Min Person", "Min"]),
    (RoomColumn::MaxOccupants, &["Max Person", "Max"]),
    (RoomColumn::AirConditioning, &["Airconditioning", "AC"]),
    (
        RoomColumn::WheelchairAccess,
        &["Wheel Chair Access", "Wheelchair", "WC"],
    ),
    (
        RoomColumn::PetsAllowed,
        &["Pets Permitted", "Pet Friendly", "Pets"],
    ),
    (
        RoomColumn::GroupBooking,
        &["Group Booking Permitted", "GroupAllowed", "Group"],
    ),
];

const BOOKING_ALIASES: &[(BookingColumn, &[&str])] = &[
    (BookingColumn::Id, &["BookingID", "ID"]),
    (BookingColumn::CheckIn, &["CheckIn", "Check In", "From"]),
    (BookingColumn::CheckOut, &["CheckOut", "Check Out", "To"]),
    (BookingColumn::Block, &["Block"]),
    (BookingColumn::RoomNumber, &["Room No", "Room", "RoomNo"]),
    (BookingColumn::Status, &["Status"]),
];

pub(crate) const REQUIRED_ROOM_COLUMNS: &[RoomColumn] = &[RoomColumn::Block, RoomColumn::Number];

pub(crate) const REQUIRED_BOOKING_COLUMNS: &[BookingColumn] = &[
    BookingColumn::CheckIn,
    BookingColumn::CheckOut,
    BookingColumn::Block,
    BookingColumn::RoomNumber,
];

/// Comparison key for a header cell: letters and digits only, lower-cased, so
/// `Room No`, `RoomNo`, `room_no` and `Room No.` all name the same column.
pub(crate) fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

static ROOM_ALIAS_MAP: OnceLock<Vec<(RoomColumn, Vec<String>)>> = OnceLock::new();
static BOOKING_ALIAS_MAP: OnceLock<Vec<(BookingColumn, Vec<String>)>> = OnceLock::new();

fn normalized_aliases<C: Copy>(table: &[(C, &[&str])]) -> Vec<(C, Vec<String>)> {
    table
        .iter()
        .map(|(column, aliases)| {
            (
                *column,
                aliases.iter().map(|alias| header_key(alias)).collect(),
            )
        })
        .collect()
}

fn room_aliases() -> &'static [(RoomColumn, Vec<String>)] {
    ROOM_ALIAS_MAP.get_or_init(|| normalized_aliases(ROOM_ALIASES))
}

fn booking_aliases() -> &'static [(BookingColumn, Vec<String>)] {
    BOOKING_ALIAS_MAP.get_or_init(|| normalized_aliases(BOOKING_ALIASES))
}

/// Position of each canonical column in one sheet, resolved once from its header row.
#[derive(Debug, Clone)]
pub(crate) struct ColumnMap<C> {
    positions: HashMap<C, usize>,
}

impl<C> ColumnMap<C>
where
    C: Copy + Eq + std::hash::Hash,
{
    fn resolve(headers: &StringRecord, aliases: &[(C, Vec<String>)]) -> Self {
        let normalized: Vec<String> = headers.iter().map(header_key).collect();
        let positions = aliases
            .iter()
            .filter_map(|(column, names)| {
                names
                    .iter()
                    .find_map(|name| normalized.iter().position(|header| header == name))
                    .map(|position| (*column, position))
            })
            .collect();
        Self { positions }
    }

    /// Trimmed cell text; `None` when the column is absent or the cell is blank.
    pub(crate) fn get<'r>(&self, record: &'r StringRecord, column: C) -> Option<&'r str> {
        self.positions
            .get(&column)
            .and_then(|position| record.get(*position))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub(crate) fn missing(&self, required: &[C]) -> Vec<C> {
        required
            .iter()
            .copied()
            .filter(|column| !self.positions.contains_key(column))
            .collect()
    }
}

pub(crate) fn room_columns(headers: &StringRecord) -> ColumnMap<RoomColumn> {
    ColumnMap::resolve(headers, room_aliases())
}

pub(crate) fn booking_columns(headers: &StringRecord) -> ColumnMap<BookingColumn> {
    ColumnMap::resolve(headers, booking_aliases())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_listed_alias_wins() {
        let headers = StringRecord::from(vec!["Room", "Block", "Room No"]);
        let columns = room_columns(&headers);
        let record = StringRecord::from(vec!["99", "A", "1"]);
        assert_eq!(columns.get(&record, RoomColumn::Number), Some("1"));
        assert_eq!(columns.get(&record, RoomColumn::Block), Some("A"));
    }

    #[test]
    fn headers_match_regardless_of_case_and_spacing() {
        let headers = StringRecord::from(vec![" block ", "WHEEL CHAIR  ACCESS", "roomno"]);
        let columns = room_columns(&headers);
        assert!(columns.missing(REQUIRED_ROOM_COLUMNS).is_empty());
        let record = StringRecord::from(vec!["B", "yes", "7"]);
        assert_eq!(columns.get(&record, RoomColumn::WheelchairAccess), Some("yes"));
    }

    #[test]
    fn header_keys_ignore_punctuation_and_invisible_marks() {
        assert_eq!(header_key("\u{feff}Wheel  Chair\tAccess "), "wheelchairaccess");
        assert_eq!(header_key("Room No."), header_key("room_no"));
        assert_ne!(header_key("Room"), header_key("Room No"));

        let headers = StringRecord::from(vec!["check-in", "CHECK_OUT", "Block", "Room No."]);
        assert!(booking_columns(&headers)
            .missing(REQUIRED_BOOKING_COLUMNS)
            .is_empty());
    }

    #[test]
    fn reports_missing_required_columns() {
        let headers = StringRecord::from(vec!["Booking Ref", "From", "Block"]);
        let columns = booking_columns(&headers);
        assert_eq!(
            columns.missing(REQUIRED_BOOKING_COLUMNS),
            vec![BookingColumn::CheckOut, BookingColumn::RoomNumber]
        );
    }

    #[test]
    fn blank_cells_read_as_absent() {
        let headers = StringRecord::from(vec!["Block", "Room No", "Floor"]);
        let columns = room_columns(&headers);
        let record = StringRecord::from(vec!["A", "1", "   "]);
        assert_eq!(columns.get(&record, RoomColumn::Floor), None);
        let short = StringRecord::from(vec!["A"]);
        assert_eq!(columns.get(&short, RoomColumn::Number), None);
    }
}
