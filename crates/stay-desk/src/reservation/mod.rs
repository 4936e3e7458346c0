pub mod availability;
pub mod calendar;
pub mod domain;
pub mod index;
pub mod pricing;
pub mod selection;
pub mod session;
pub mod summary;

pub use availability::{available_rooms, rooms_by_block};
pub use domain::{Booking, Filters, Room, RoomKey, StayRange};
pub use index::BookingIndex;
pub use selection::SelectionState;
pub use session::{
    BlockOverview, BookingSession, BookingSnapshot, MealCounts, MemberProfile, Requirements,
};
pub use summary::BookingSummary;
