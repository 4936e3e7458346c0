use super::pricing::{format_rupees, PriceBreakdown};
use super::session::{MealCounts, MemberProfile, Requirements};
use crate::dates::iso;
use crate::settings::AdvanceCheck;
use chrono::NaiveDate;
use serde::Serialize;

/// Everything the member confirms before submitting a booking request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub requirements: Requirements,
    pub rooms_selected: usize,
    pub occupants_selected: u32,
    pub meals: MealCounts,
    pub price: PriceBreakdown,
    /// Bookings on the sheet that are neither cancelled nor checked out.
    pub open_bookings: usize,
    pub member: MemberProfile,
    pub advance: Option<AdvanceCheck>,
}

impl BookingSummary {
    /// Plain-text lines in the order the booking card prints them.
    pub fn lines(&self) -> Vec<String> {
        let show = |date: Option<NaiveDate>| date.map(iso).unwrap_or_else(|| "-".to_string());
        let price = &self.price;

        let mut lines = vec![
            format!(
                "Check-in: ({}) | Check-out: ({})",
                show(self.check_in),
                show(self.check_out)
            ),
            format!(
                "Rooms required: ({})  Occupants: ({})",
                self.requirements.rooms, self.requirements.occupants
            ),
            format!(
                "Selected -> Rooms: ({})  Occupants: ({})",
                self.rooms_selected, self.occupants_selected
            ),
            format!("Veg ({})  Non-veg ({})", self.meals.veg, self.meals.non_veg),
            format!("Amount per night: {}", format_rupees(price.base_rate_sum)),
            format!(
                "Nights: {} (weekend {}, special {}, normal {})",
                price.nights, price.tally.weekend, price.tally.special, price.tally.normal
            ),
        ];

        lines.extend(
            price
                .rooms
                .iter()
                .map(|room| format!("{}: {}", room.label, format_rupees(room.total))),
        );
        lines.push(format!("Subtotal: {}", format_rupees(price.subtotal)));
        lines.push(format!("GST ({}%): {}", price.gst_pct.normalize(), format_rupees(price.gst)));
        lines.push(format!("Grand total: {}", format_rupees(price.grand_total)));
        lines.push(format!("Open bookings: {}", self.open_bookings));

        if !self.member.name.is_empty() || !self.member.membership_number.is_empty() {
            lines.push(format!(
                "Member: {} ({})",
                self.member.name, self.member.membership_number
            ));
        }

        if let Some(advance) = &self.advance {
            let verdict = if advance.within_window {
                "within window"
            } else {
                "outside window"
            };
            lines.push(format!(
                "Advance booking ({}): {} of {} days, {}",
                advance.category.label(),
                advance.days_ahead,
                advance.limit_days,
                verdict
            ));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::pricing::NightTally;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn empty_price() -> PriceBreakdown {
        PriceBreakdown {
            rooms: Vec::new(),
            nights: 0,
            room_nights: 0,
            tally: NightTally::default(),
            base_rate_sum: Decimal::ZERO,
            subtotal: Decimal::ZERO,
            gst_pct: dec!(18.0),
            gst: Decimal::ZERO,
            grand_total: Decimal::ZERO,
        }
    }

    #[test]
    fn lines_show_placeholders_before_dates_are_chosen() {
        let summary = BookingSummary {
            check_in: None,
            check_out: None,
            requirements: Requirements::default(),
            rooms_selected: 0,
            occupants_selected: 0,
            meals: MealCounts::default(),
            price: empty_price(),
            open_bookings: 3,
            member: MemberProfile::default(),
            advance: None,
        };

        let lines = summary.lines();
        assert_eq!(lines[0], "Check-in: (-) | Check-out: (-)");
        assert!(lines.contains(&"GST (18%): ₹0".to_string()));
        assert!(lines.contains(&"Open bookings: 3".to_string()));
        assert!(!lines.iter().any(|line| line.starts_with("Member:")));
    }
}
