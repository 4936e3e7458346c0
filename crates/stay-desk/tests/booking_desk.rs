use chrono::NaiveDate;
use rust_decimal_macros::dec;
use stay_desk::config::DataConfig;
use stay_desk::inventory::{fallback_rooms, load_rooms};
use stay_desk::reservation::pricing::CancellationTier;
use stay_desk::reservation::{BookingSession, BookingSnapshot, Filters, RoomKey};
use stay_desk::settings::GuestCategory;
use std::path::PathBuf;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/desk")
}

fn snapshot() -> BookingSnapshot {
    BookingSnapshot::load(&DataConfig::new(fixture_dir()))
}

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).expect("valid date")
}

fn keys(rooms: &[&stay_desk::reservation::Room]) -> Vec<String> {
    rooms.iter().map(|room| room.key().to_string()).collect()
}

#[test]
fn snapshot_reads_classification_sheet_and_bookings() {
    let snapshot = snapshot();

    let rooms: Vec<String> = snapshot.rooms.iter().map(|room| room.key().to_string()).collect();
    assert_eq!(rooms, vec!["A1", "A2", "B1", "B2", "C10"]);

    let b2 = snapshot
        .room(&RoomKey::from("B2"))
        .expect("B2 imported");
    assert_eq!((b2.min_occupants, b2.max_occupants), (1, 4));
    assert!(b2.has_ac);

    assert_eq!(snapshot.bookings.len(), 5);
    assert_eq!(snapshot.index.booked_count(date(10, 4)), 2);
    assert!(snapshot
        .index
        .is_occupied(&RoomKey::from("C10"), date(10, 8)));
    assert!(!snapshot
        .index
        .is_occupied(&RoomKey::from("C10"), date(10, 9)));
    assert_eq!(snapshot.settings.rules.calendar_months, 3);
}

#[test]
fn member_books_two_rooms_over_a_weekend() {
    let snapshot = snapshot();
    let mut session = BookingSession::for_snapshot(&snapshot);

    session.pick_date(date(10, 4));
    session.pick_date(date(10, 6));
    let available = session.available_rooms(&snapshot);
    assert_eq!(keys(&available), vec!["A2", "B2", "C10"]);

    let a2 = available[0].clone();
    let c10 = available[2].clone();
    assert!(session.toggle_room(&a2));
    assert!(session.toggle_room(&c10));
    assert_eq!(session.selected_occupants(), 4);

    let quote = session.quote(&snapshot);
    assert_eq!(quote.nights, 2);
    assert_eq!(quote.tally.weekend, 2);
    assert_eq!(quote.tally.normal, 2);
    assert_eq!(quote.base_rate_sum, dec!(3000));
    assert_eq!(quote.subtotal, dec!(6600));
    assert_eq!(quote.gst, dec!(1188));
    assert_eq!(quote.grand_total, dec!(7788));

    let summary = session.summary(&snapshot, date(10, 1), GuestCategory::Member);
    assert_eq!(summary.open_bookings, 3);
    assert_eq!(summary.rooms_selected, 2);
    assert_eq!(summary.price, quote);
    assert!(summary
        .lines()
        .contains(&"Grand total: ₹7788".to_string()));
}

#[test]
fn special_days_from_both_sources_are_surcharged() {
    let snapshot = snapshot();
    let mut session = BookingSession::default();
    let b2 = snapshot
        .room(&RoomKey::from("B2"))
        .expect("B2 imported")
        .clone();
    session.toggle_room(&b2);

    // Monday 20th and Tuesday 21st fall in a special period.
    session.pick_date(date(10, 20));
    session.pick_date(date(10, 22));
    assert_eq!(session.quote(&snapshot).subtotal, dec!(3300));

    // Thursday 2nd is a listed long weekend; Friday 3rd is a weekend night.
    session.pick_date(date(10, 2));
    session.pick_date(date(10, 4));
    assert_eq!(session.quote(&snapshot).subtotal, dec!(1650) + dec!(1800));
}

#[test]
fn calendar_marks_special_closed_and_free_counts() {
    let snapshot = snapshot();
    let mut session = BookingSession::default();
    session.pick_date(date(10, 4));
    session.pick_date(date(10, 6));

    let months = snapshot.calendar(date(10, 15), session.selection());
    let titles: Vec<&str> = months.iter().map(|month| month.title.as_str()).collect();
    assert_eq!(titles, vec!["October 2025", "November 2025", "December 2025"]);

    let october = &months[0];
    let day = |d: u32| &october.days[d as usize - 1];
    assert!(day(2).is_special);
    assert!(day(3).is_weekend);
    assert_eq!(day(4).rooms_available, 3);
    assert!(day(4).in_range && day(6).in_range);
    assert!(!day(7).in_range);
    assert_eq!(day(8).rooms_available, 4);

    let november = &months[1];
    assert!(november.days[2].is_closed);
    assert!(!november.days[5].is_closed);
}

#[test]
fn closed_days_do_not_block_a_selection() {
    let snapshot = snapshot();
    let mut session = BookingSession::default();
    session.pick_date(date(11, 3));
    session.pick_date(date(11, 5));
    assert!(session.selection().stay().is_some());
    assert_eq!(session.available_rooms(&snapshot).len(), 5);
}

#[test]
fn group_cancellation_forfeits_at_least_the_advance() {
    let snapshot = snapshot();
    let mut session = BookingSession::default();
    session.set_filters(Filters::new(false, false, false, true, 2));
    session.pick_date(date(10, 20));
    session.pick_date(date(10, 22));

    let group_rooms = session.available_rooms(&snapshot);
    assert_eq!(keys(&group_rooms), vec!["A2", "B1", "C10"]);
    let c10 = group_rooms[2].clone();
    session.toggle_room(&c10);

    let charge = session
        .cancellation(&snapshot, date(10, 1))
        .expect("stay is complete");
    assert_eq!(charge.tier, CancellationTier::Early);
    assert_eq!(charge.non_refundable_advance, dec!(5192));
    assert_eq!(charge.charge, dec!(5192));
    assert_eq!(charge.refund, dec!(0));
}

#[test]
fn first_room_source_wins_over_the_classification_sheet() {
    let root = std::env::temp_dir().join(format!("stay-desk-rooms-{}", std::process::id()));
    let uploads = root.join("uploads");
    std::fs::create_dir_all(&uploads).expect("create uploads dir");
    std::fs::write(uploads.join("rooms.csv"), "Block,Room\nQ,1\n").expect("write rooms");
    std::fs::write(
        uploads.join("Room Classification List.csv"),
        "Block,Room\nR,1\n",
    )
    .expect("write classification sheet");

    let rooms = load_rooms(&DataConfig::new(&root));
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].block, "Q");

    std::fs::write(uploads.join("rooms.csv"), "Wing,Number\nQ,1\n").expect("rewrite rooms");
    std::fs::write(uploads.join("Room Classification List.csv"), "").expect("empty sheet");
    assert_eq!(load_rooms(&DataConfig::new(&root)), fallback_rooms());

    std::fs::remove_dir_all(&root).ok();
}
