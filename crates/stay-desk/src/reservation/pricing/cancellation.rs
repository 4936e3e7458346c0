use super::engine::PriceBreakdown;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationTier {
    /// More than `early_clear_days` clear days before arrival.
    Early,
    /// Between `late_clear_days` and `early_clear_days` clear days.
    Standard,
    /// Fewer than `late_clear_days` clear days, or a no-show.
    Late,
}

/// Cancellation charges printed on the booking card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancellationPolicy {
    pub early_clear_days: i64,
    pub late_clear_days: i64,
    pub early_pct: Decimal,
    pub standard_pct: Decimal,
    /// Nights billed in full on a late cancellation.
    pub late_nights: usize,
    pub group_advance: Decimal,
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self {
            early_clear_days: 7,
            late_clear_days: 2,
            early_pct: Decimal::TEN,
            standard_pct: Decimal::from(20),
            late_nights: 2,
            group_advance: Decimal::from(20_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancellationCharge {
    pub clear_days: i64,
    pub tier: CancellationTier,
    pub charge: Decimal,
    pub refund: Decimal,
    pub non_refundable_advance: Decimal,
}

impl CancellationPolicy {
    /// Whole days strictly between the cancellation date and arrival.
    pub fn clear_days(arrival: NaiveDate, cancelled_on: NaiveDate) -> i64 {
        ((arrival - cancelled_on).num_days() - 1).max(0)
    }

    pub fn tier(&self, clear_days: i64) -> CancellationTier {
        if clear_days > self.early_clear_days {
            CancellationTier::Early
        } else if clear_days >= self.late_clear_days {
            CancellationTier::Standard
        } else {
            CancellationTier::Late
        }
    }

    /// Charge for cancelling a priced stay. A group booking never forfeits less than
    /// its non-refundable advance, capped at the booking total.
    pub fn charge(
        &self,
        quote: &PriceBreakdown,
        arrival: NaiveDate,
        cancelled_on: NaiveDate,
        group_booking: bool,
    ) -> CancellationCharge {
        let clear_days = Self::clear_days(arrival, cancelled_on);
        let tier = self.tier(clear_days);
        let hundred = Decimal::ONE_HUNDRED;

        let tier_charge = match tier {
            CancellationTier::Early => quote.grand_total * self.early_pct / hundred,
            CancellationTier::Standard => quote.grand_total * self.standard_pct / hundred,
            CancellationTier::Late => {
                quote.with_gst(quote.leading_nights_subtotal(self.late_nights))
            }
        };

        let non_refundable_advance = if group_booking {
            self.group_advance.min(quote.grand_total)
        } else {
            Decimal::ZERO
        };
        let charge = tier_charge.max(non_refundable_advance);

        CancellationCharge {
            clear_days,
            tier,
            charge,
            refund: (quote.grand_total - charge).max(Decimal::ZERO),
            non_refundable_advance,
        }
    }
}
