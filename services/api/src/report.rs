use crate::infra::{parse_date, session_for_dates};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use stay_desk::config::{AppConfig, DataConfig};
use stay_desk::dates::iso;
use stay_desk::error::AppError;
use stay_desk::reservation::calendar::{CalendarContext, CalendarDay, CalendarMonth};
use stay_desk::reservation::pricing::format_rupees;
use stay_desk::reservation::{BookingSession, BookingSnapshot, Filters, MealCounts, RoomKey};
use stay_desk::settings::GuestCategory;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DataArgs {
    /// Property data directory (defaults to STAY_DESK_DATA_DIR or ./data)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

impl DataArgs {
    fn snapshot(&self) -> Result<BookingSnapshot, AppError> {
        let data = match &self.data_dir {
            Some(dir) => DataConfig::new(dir),
            None => AppConfig::load()?.data,
        };
        Ok(BookingSnapshot::load(&data))
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Only wheelchair-accessible rooms
    #[arg(long)]
    pub(crate) wheelchair: bool,
    /// Only pet-friendly rooms
    #[arg(long)]
    pub(crate) pet: bool,
    /// Only air-conditioned rooms
    #[arg(long)]
    pub(crate) ac: bool,
    /// Only rooms open to group bookings
    #[arg(long)]
    pub(crate) group: bool,
    /// Guests per room, clamped to 1..=4 (defaults to the property setting)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) occupancy: Option<i64>,
}

impl FilterArgs {
    fn apply(&self, session: &mut BookingSession) {
        let occupancy = self
            .occupancy
            .unwrap_or(session.filters().occupancy() as i64);
        session.set_filters(Filters::new(
            self.wheelchair,
            self.pet,
            self.ac,
            self.group,
            occupancy,
        ));
    }
}

/// `A1` selects a room at the filter occupancy, `A1=3` with three guests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoomChoice {
    pub(crate) key: RoomKey,
    pub(crate) occupants: Option<u8>,
}

pub(crate) fn parse_room_choice(raw: &str) -> Result<RoomChoice, String> {
    let (key, occupants) = match raw.split_once('=') {
        Some((key, count)) => {
            let count = count
                .trim()
                .parse::<u8>()
                .map_err(|err| format!("invalid occupant count in '{raw}' ({err})"))?;
            (key, Some(count))
        }
        None => (raw, None),
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing room key in '{raw}'"));
    }
    Ok(RoomChoice {
        key: RoomKey::from(key),
        occupants,
    })
}

pub(crate) fn parse_category(raw: &str) -> Result<GuestCategory, String> {
    match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "member" => Ok(GuestCategory::Member),
        "group" => Ok(GuestCategory::Group),
        "member-with-temp" => Ok(GuestCategory::MemberWithTemp),
        "temp-only" => Ok(GuestCategory::TempOnly),
        other => Err(format!(
            "unknown guest category '{other}' (member, group, member-with-temp, temp-only)"
        )),
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct AvailabilityArgs {
    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: Option<NaiveDate>,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_out: Option<NaiveDate>,
    /// Block to list room by room (defaults to the first block)
    #[arg(long)]
    pub(crate) block: Option<String>,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: NaiveDate,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_out: NaiveDate,
    /// Room to include, repeatable: `A1` or `A1=3`
    #[arg(long = "room", value_parser = parse_room_choice)]
    pub(crate) rooms: Vec<RoomChoice>,
    /// Guest category for the advance-booking check
    #[arg(long, value_parser = parse_category, default_value = "member")]
    pub(crate) category: GuestCategory,
    /// Vegetarian meal count
    #[arg(long, default_value_t = 0)]
    pub(crate) veg: u32,
    /// Non-vegetarian meal count
    #[arg(long, default_value_t = 0)]
    pub(crate) non_veg: u32,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CalendarArgs {
    /// First month shown is the one containing this date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of months (defaults to the property setting)
    #[arg(long)]
    pub(crate) months: Option<u32>,
    /// Highlight a selection starting on this date
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: Option<NaiveDate>,
    /// Highlight a selection ending on this date
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_out: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

#[derive(Args, Debug)]
pub(crate) struct CancellationArgs {
    /// Check-in date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_in: NaiveDate,
    /// Check-out date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) check_out: NaiveDate,
    /// Room included in the booking, repeatable
    #[arg(long = "room", value_parser = parse_room_choice)]
    pub(crate) rooms: Vec<RoomChoice>,
    /// Treat the booking as a group booking
    #[arg(long)]
    pub(crate) group: bool,
    /// Date of cancellation (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) cancelled_on: Option<NaiveDate>,
    #[command(flatten)]
    pub(crate) data: DataArgs,
}

fn today_or(value: Option<NaiveDate>) -> NaiveDate {
    value.unwrap_or_else(|| Local::now().date_naive())
}

fn select_rooms(session: &mut BookingSession, snapshot: &BookingSnapshot, rooms: &[RoomChoice]) {
    for choice in rooms {
        let Some(room) = snapshot.room(&choice.key) else {
            println!("  Skipping unknown room {}", choice.key);
            continue;
        };
        match choice.occupants {
            Some(occupants) => session.set_room_occupants(room, occupants),
            None => {
                if !session.rooms_selected().contains_key(&choice.key) {
                    session.toggle_room(room);
                }
            }
        }
    }
}

pub(crate) fn run_availability(args: AvailabilityArgs) -> Result<(), AppError> {
    let snapshot = args.data.snapshot()?;
    let mut session = session_for_dates(&snapshot, args.check_in, args.check_out)?;
    args.filters.apply(&mut session);
    if let Some(block) = args.block.as_deref() {
        session.open_block(block);
    }

    let stay_label = match session.selection().stay() {
        Some(stay) => format!(
            "{} to {} ({} nights)",
            iso(stay.check_in()),
            iso(stay.check_out()),
            stay.night_count()
        ),
        None => "no complete stay selected".to_string(),
    };
    println!("Availability: {stay_label}");
    println!(
        "Filters: occupancy {} | wheelchair {} | pet {} | ac {} | group {}",
        session.filters().occupancy(),
        yes_no(session.filters().wheelchair),
        yes_no(session.filters().pet),
        yes_no(session.filters().ac),
        yes_no(session.filters().group)
    );

    println!("Blocks:");
    for block in session.block_overview(&snapshot) {
        let marker = if block.open { ">" } else { "-" };
        println!("  {marker} {}: {} room(s)", block.block, block.available);
    }

    let rooms = session.open_block_rooms(&snapshot);
    match session.current_block(&snapshot) {
        Some(block) => println!("Rooms available in {block}:"),
        None => println!("Rooms available:"),
    }
    if rooms.is_empty() {
        println!("  None");
    }
    for room in rooms {
        let options: Vec<String> = room
            .occupancy_options()
            .iter()
            .map(u8::to_string)
            .collect();
        println!(
            "  - {} (floor {}) occupants [{}]{}",
            room.key(),
            room.floor,
            options.join(", "),
            amenity_tags(room)
        );
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn amenity_tags(room: &stay_desk::reservation::Room) -> String {
    let tags: Vec<&str> = [
        (room.has_ac, "AC"),
        (room.wheelchair_accessible, "wheelchair"),
        (room.pets_allowed, "pets"),
        (room.group_booking_allowed, "group"),
    ]
    .into_iter()
    .filter_map(|(present, tag)| present.then_some(tag))
    .collect();

    if tags.is_empty() {
        String::new()
    } else {
        format!(" {}", tags.join(" "))
    }
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let snapshot = args.data.snapshot()?;
    let mut session = session_for_dates(&snapshot, Some(args.check_in), Some(args.check_out))?;
    args.filters.apply(&mut session);
    session.meals = MealCounts {
        veg: args.veg,
        non_veg: args.non_veg,
    };
    select_rooms(&mut session, &snapshot, &args.rooms);

    let summary = session.summary(&snapshot, today_or(args.today), args.category);
    println!("Booking summary");
    for line in summary.lines() {
        println!("  {line}");
    }

    for room in &summary.price.rooms {
        let nights: Vec<String> = room
            .nightly
            .iter()
            .map(|night| format!("{} {:?} {}", iso(night.date), night.kind, format_rupees(night.amount)))
            .collect();
        println!("  {} nightly: {}", room.label, nights.join(" | "));
    }

    Ok(())
}

pub(crate) fn run_calendar(args: CalendarArgs) -> Result<(), AppError> {
    let snapshot = args.data.snapshot()?;
    let session = session_for_dates(&snapshot, args.check_in, args.check_out)?;
    let today = today_or(args.today);

    let months = match args.months {
        Some(months) => CalendarContext {
            classifier: &snapshot.classifier,
            index: &snapshot.index,
            inventory_len: snapshot.rooms.len(),
            selection: session.selection(),
        }
        .months_from(today, months),
        None => snapshot.calendar(today, session.selection()),
    };

    println!("Legend: * special  # closed  ^ check-in picked  + selected stay; number = rooms free");
    for month in &months {
        println!();
        for line in month_grid(month) {
            println!("{line}");
        }
    }

    Ok(())
}

const CELL_WIDTH: usize = 7;

fn day_cell(day: &CalendarDay) -> String {
    let marker = if day.is_closed {
        '#'
    } else if day.is_special {
        '*'
    } else {
        ' '
    };
    let selection = if day.selected {
        '^'
    } else if day.in_range {
        '+'
    } else {
        ' '
    };
    format!(
        "{:>2}{marker}{selection}{:<2}",
        day.date.day(),
        day.rooms_available
    )
}

/// Monday-first grid of a month, one line per week.
pub(crate) fn month_grid(month: &CalendarMonth) -> Vec<String> {
    let header: String = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
        .iter()
        .map(|name| format!("{name:<width$}", width = CELL_WIDTH))
        .collect();
    let mut lines = vec![month.title.clone(), header.trim_end().to_string()];

    let mut week = String::new();
    if let Some(first) = month.days.first() {
        let offset = first.date.weekday().num_days_from_monday() as usize;
        week.push_str(&" ".repeat(offset * CELL_WIDTH));
    }
    for day in &month.days {
        week.push_str(&format!("{:<width$}", day_cell(day), width = CELL_WIDTH));
        if day.date.weekday() == chrono::Weekday::Sun {
            lines.push(week.trim_end().to_string());
            week.clear();
        }
    }
    if !week.trim().is_empty() {
        lines.push(week.trim_end().to_string());
    }
    lines
}

pub(crate) fn run_cancellation(args: CancellationArgs) -> Result<(), AppError> {
    let snapshot = args.data.snapshot()?;
    let mut session = session_for_dates(&snapshot, Some(args.check_in), Some(args.check_out))?;
    let mut filters = *session.filters();
    filters.group = args.group;
    session.set_filters(filters);
    select_rooms(&mut session, &snapshot, &args.rooms);

    let cancelled_on = today_or(args.cancelled_on);
    let quote = session.quote(&snapshot);
    let Some(charge) = session.cancellation(&snapshot, cancelled_on) else {
        return Err(AppError::BadRequest("stay is incomplete".to_string()));
    };

    println!(
        "Cancellation on {} for arrival {}",
        iso(cancelled_on),
        iso(args.check_in)
    );
    println!("  Booking total: {}", format_rupees(quote.grand_total));
    println!("  Clear days before arrival: {}", charge.clear_days);
    println!("  Tier: {:?}", charge.tier);
    if args.group {
        println!(
            "  Non-refundable group advance: {}",
            format_rupees(charge.non_refundable_advance)
        );
    }
    println!("  Charge: {}", format_rupees(charge.charge));
    println!("  Refund: {}", format_rupees(charge.refund));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stay_desk::inventory::fallback_rooms;
    use stay_desk::reservation::SelectionState;
    use stay_desk::settings::PropertySettings;

    #[test]
    fn room_choices_accept_optional_occupants() {
        assert_eq!(
            parse_room_choice("A1"),
            Ok(RoomChoice {
                key: RoomKey::from("A1"),
                occupants: None
            })
        );
        assert_eq!(
            parse_room_choice(" C3 = 4 ").map(|choice| choice.occupants),
            Ok(Some(4))
        );
        assert!(parse_room_choice("=2").is_err());
        assert!(parse_room_choice("A1=lots").is_err());
    }

    #[test]
    fn categories_parse_with_either_separator() {
        assert_eq!(parse_category("temp_only"), Ok(GuestCategory::TempOnly));
        assert_eq!(
            parse_category("Member-With-Temp"),
            Ok(GuestCategory::MemberWithTemp)
        );
        assert!(parse_category("vip").is_err());
    }

    #[test]
    fn month_grid_starts_on_the_right_weekday() {
        let snapshot =
            BookingSnapshot::new(fallback_rooms(), Vec::new(), PropertySettings::default());
        let october = NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date");
        let months = CalendarContext {
            classifier: &snapshot.classifier,
            index: &snapshot.index,
            inventory_len: snapshot.rooms.len(),
            selection: &SelectionState::Empty,
        }
        .months_from(october, 1);

        let lines = month_grid(&months[0]);
        assert_eq!(lines[0], "October 2025");
        // 1 October 2025 is a Wednesday.
        assert!(lines[2].starts_with(&" ".repeat(2 * CELL_WIDTH)));
        assert!(lines[2].contains(" 1  3"));
        assert_eq!(lines.len(), 2 + 5);
    }
}
