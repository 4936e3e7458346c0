use super::cells::{occupant_count, parse_flag};
use super::mapping::{
    booking_columns, room_columns, BookingColumn, RoomColumn, REQUIRED_BOOKING_COLUMNS,
    REQUIRED_ROOM_COLUMNS,
};
use crate::dates::parse_local_date;
use crate::reservation::domain::{Booking, Room};
use csv::StringRecord;
use std::io::Read;
use tracing::{debug, warn};

const DEFAULT_MIN_OCCUPANTS: u8 = 1;
const DEFAULT_MAX_OCCUPANTS: u8 = 4;

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

/// Header row decoded leniently; spreadsheet exports are not always UTF-8.
fn headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<StringRecord, csv::Error> {
    Ok(StringRecord::from_byte_record_lossy(
        reader.byte_headers()?.clone(),
    ))
}

/// Non-blank data rows with their sheet line numbers. Cells that are not valid UTF-8
/// are decoded lossily so one odd character never costs the row. Reading stops at the
/// first row the reader cannot get past, keeping what came before it.
fn data_rows<R: Read>(reader: &mut csv::Reader<R>) -> Vec<(usize, StringRecord)> {
    let mut rows = Vec::new();
    for (index, record) in reader.byte_records().enumerate() {
        let line = index + 2;
        match record {
            Ok(record) => {
                let record = StringRecord::from_byte_record_lossy(record);
                if !is_blank(&record) {
                    rows.push((line, record));
                }
            }
            Err(err) => {
                warn!(line, error = %err, "sheet unreadable from this row on");
                break;
            }
        }
    }
    rows
}

pub(crate) fn parse_rooms<R: Read>(reader: R) -> Result<Vec<Room>, csv::Error> {
    let mut csv_reader = csv_reader(reader);
    let columns = room_columns(&headers(&mut csv_reader)?);

    let missing = columns.missing(REQUIRED_ROOM_COLUMNS);
    if !missing.is_empty() {
        warn!(?missing, "room sheet lacks required columns, no rooms imported");
        return Ok(Vec::new());
    }

    let mut rooms = Vec::new();
    for (line, record) in data_rows(&mut csv_reader) {
        let (Some(block), Some(number)) = (
            columns.get(&record, RoomColumn::Block),
            columns.get(&record, RoomColumn::Number),
        ) else {
            debug!(line, "dropping room row without block or number");
            continue;
        };

        let min_occupants = occupant_count(
            columns.get(&record, RoomColumn::MinOccupants),
            DEFAULT_MIN_OCCUPANTS,
        );
        let max_occupants = occupant_count(
            columns.get(&record, RoomColumn::MaxOccupants),
            DEFAULT_MAX_OCCUPANTS,
        )
        .max(min_occupants);
        let flag = |column| columns.get(&record, column).map(parse_flag).unwrap_or(false);

        rooms.push(Room {
            block: block.to_string(),
            number: number.to_string(),
            floor: columns
                .get(&record, RoomColumn::Floor)
                .unwrap_or_default()
                .to_string(),
            min_occupants,
            max_occupants,
            has_ac: flag(RoomColumn::AirConditioning),
            wheelchair_accessible: flag(RoomColumn::WheelchairAccess),
            pets_allowed: flag(RoomColumn::PetsAllowed),
            group_booking_allowed: flag(RoomColumn::GroupBooking),
        });
    }

    Ok(rooms)
}

pub(crate) fn parse_bookings<R: Read>(reader: R) -> Result<Vec<Booking>, csv::Error> {
    let mut csv_reader = csv_reader(reader);
    let columns = booking_columns(&headers(&mut csv_reader)?);

    let missing = columns.missing(REQUIRED_BOOKING_COLUMNS);
    if !missing.is_empty() {
        warn!(?missing, "bookings sheet lacks required columns, no bookings imported");
        return Ok(Vec::new());
    }

    let mut bookings = Vec::new();
    for (line, record) in data_rows(&mut csv_reader) {
        let check_in = columns
            .get(&record, BookingColumn::CheckIn)
            .and_then(parse_local_date);
        let check_out = columns
            .get(&record, BookingColumn::CheckOut)
            .and_then(parse_local_date);
        let block = columns.get(&record, BookingColumn::Block);
        let room_number = columns.get(&record, BookingColumn::RoomNumber);

        let (Some(check_in), Some(check_out), Some(block), Some(room_number)) =
            (check_in, check_out, block, room_number)
        else {
            debug!(line, "dropping booking row with missing or unreadable fields");
            continue;
        };

        if check_out <= check_in {
            debug!(line, %check_in, %check_out, "dropping booking without a night");
            continue;
        }

        bookings.push(Booking {
            id: columns
                .get(&record, BookingColumn::Id)
                .unwrap_or_default()
                .to_string(),
            check_in,
            check_out,
            block: block.to_string(),
            room_number: room_number.to_string(),
            status: columns
                .get(&record, BookingColumn::Status)
                .unwrap_or_default()
                .to_lowercase(),
        });
    }

    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    #[test]
    fn room_rows_apply_capacity_defaults() {
        let rooms = parse_rooms(Cursor::new(
            "Block,Room No,Floor,Min Person,Max Person,AC\n\
A,1,0,,,yes\n\
A,2,0,3,2,no\n\
A,3,1,0,2 persons,\n",
        ))
        .expect("parse");

        assert_eq!(rooms.len(), 3);
        assert_eq!((rooms[0].min_occupants, rooms[0].max_occupants), (1, 4));
        assert!(rooms[0].has_ac);
        assert_eq!((rooms[1].min_occupants, rooms[1].max_occupants), (3, 3));
        assert_eq!((rooms[2].min_occupants, rooms[2].max_occupants), (1, 2));
        assert_eq!(rooms[2].floor, "1");
    }

    #[test]
    fn rows_without_identity_are_dropped() {
        let rooms = parse_rooms(Cursor::new("Block,Room\nA,\n,4\n,\nB,7\n")).expect("parse");
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].key().as_str(), "B7");
    }

    #[test]
    fn sheet_without_required_columns_imports_nothing() {
        let rooms = parse_rooms(Cursor::new("Wing,Number\nA,1\n")).expect("parse");
        assert!(rooms.is_empty());
    }

    #[test]
    fn booking_rows_need_dates_and_room() {
        let bookings = parse_bookings(Cursor::new(
            "BookingID,Check In,Check Out,Block,Room No,Status\n\
B-1,2025-10-03,2025-10-05,A,1,Confirmed\n\
B-2,someday,2025-10-05,A,1,Confirmed\n\
B-3,2025-10-03,2025-10-05,,1,Confirmed\n\
B-4,2025-10-05,2025-10-05,A,1,Confirmed\n\
B-5,10/06/2025,10/08/2025,A,2,CANCELLED\n",
        ))
        .expect("parse");

        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].id, "B-1");
        assert_eq!(bookings[0].status, "confirmed");
        assert_eq!(
            bookings[1].check_in,
            NaiveDate::from_ymd_opt(2025, 10, 6).expect("valid date")
        );
        assert!(bookings[1].is_cancelled());
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let bookings = parse_bookings(Cursor::new(
            "From,To,Block,Room\n2025-10-03,2025-10-04,A,1,extra\n2025-10-03,2025-10-04\n",
        ))
        .expect("parse");
        assert_eq!(bookings.len(), 1);
        assert!(bookings[0].id.is_empty());
    }

    #[test]
    fn latin1_cells_do_not_cost_neighbouring_bookings() {
        let mut sheet = b"BookingID,Check In,Check Out,Block,Room No,Status\n\
BK-1,2025-10-03,2025-10-05,A,1,Confirmed\n"
            .to_vec();
        // "Confirmé" as exported in Windows-1252.
        sheet.extend_from_slice(b"BK-2,2025-10-06,2025-10-08,A,1,Confirm\xE9\n");
        sheet.extend_from_slice(b"BK-3,2025-10-09,2025-10-10,B,2,Confirmed\n");

        let bookings = parse_bookings(Cursor::new(sheet)).expect("parse");
        let ids: Vec<&str> = bookings.iter().map(|booking| booking.id.as_str()).collect();
        assert_eq!(ids, vec!["BK-1", "BK-2", "BK-3"]);
        assert!(bookings[1].status.starts_with("confirm"));
        assert!(!bookings[1].is_cancelled());
    }

    #[test]
    fn latin1_room_rows_still_import() {
        let mut sheet = b"Block,Room No,Floor\nA,1,Ground\n".to_vec();
        sheet.extend_from_slice(b"A,2,Premi\xE8re\n");
        sheet.extend_from_slice(b"B,1,First\n");

        let rooms = parse_rooms(Cursor::new(sheet)).expect("parse");
        assert_eq!(rooms.len(), 3);
        assert!(rooms[1].floor.starts_with("Premi"));
    }
}
