use super::tariff::TariffConfig;
use crate::reservation::calendar::DayClassifier;
use crate::reservation::domain::{Room, RoomKey, StayRange};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// How a night was billed. Weekend takes priority over special, so a holiday that
/// falls on a Friday carries only the weekend surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NightKind {
    Weekend,
    Special,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightCharge {
    pub date: NaiveDate,
    pub kind: NightKind,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomCharge {
    pub key: RoomKey,
    pub label: String,
    pub base_rate: Decimal,
    pub nights: u32,
    pub total: Decimal,
    pub nightly: Vec<NightCharge>,
}

/// Night classifications summed over every priced room, so the counts add up to
/// room-nights rather than calendar nights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NightTally {
    pub weekend: u32,
    pub special: u32,
    pub normal: u32,
}

impl NightTally {
    fn record(&mut self, kind: NightKind) {
        match kind {
            NightKind::Weekend => self.weekend += 1,
            NightKind::Special => self.special += 1,
            NightKind::Normal => self.normal += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBreakdown {
    pub rooms: Vec<RoomCharge>,
    pub nights: u32,
    pub room_nights: u32,
    pub tally: NightTally,
    /// Sum of the base nightly rates of the priced rooms.
    pub base_rate_sum: Decimal,
    pub subtotal: Decimal,
    pub gst_pct: Decimal,
    pub gst: Decimal,
    pub grand_total: Decimal,
}

impl PriceBreakdown {
    /// Charges for the first `count` nights of the stay across all rooms, before tax.
    pub fn leading_nights_subtotal(&self, count: usize) -> Decimal {
        self.rooms
            .iter()
            .flat_map(|room| room.nightly.iter().take(count))
            .map(|night| night.amount)
            .sum()
    }

    pub fn with_gst(&self, amount: Decimal) -> Decimal {
        amount + amount * self.gst_pct / HUNDRED
    }
}

/// Applies a tariff to a set of rooms over a stay.
pub struct PricingEngine<'a> {
    tariff: &'a TariffConfig,
    classifier: &'a DayClassifier,
}

impl<'a> PricingEngine<'a> {
    pub fn new(tariff: &'a TariffConfig, classifier: &'a DayClassifier) -> Self {
        Self { tariff, classifier }
    }

    pub fn night_kind(&self, night: NaiveDate) -> NightKind {
        let class = self.classifier.classify(night);
        if class.is_weekend {
            NightKind::Weekend
        } else if class.is_special {
            NightKind::Special
        } else {
            NightKind::Normal
        }
    }

    pub fn nightly_rate(&self, base_rate: Decimal, kind: NightKind) -> Decimal {
        let surcharge_pct = match kind {
            NightKind::Weekend => self.tariff.weekend_surcharge_pct,
            NightKind::Special => self.tariff.special_surcharge_pct,
            NightKind::Normal => Decimal::ZERO,
        };
        base_rate + base_rate * surcharge_pct / HUNDRED
    }

    /// Prices every room for every night of `stay`.
    ///
    /// Without a stay each room is listed with zero nights and every amount is zero.
    pub fn breakdown(&self, rooms: &[&Room], stay: Option<&StayRange>) -> PriceBreakdown {
        let nights: Vec<(NaiveDate, NightKind)> = stay
            .map(|stay| {
                stay.nights()
                    .map(|night| (night, self.night_kind(night)))
                    .collect()
            })
            .unwrap_or_default();
        let night_count = nights.len() as u32;

        let mut tally = NightTally::default();
        let mut base_rate_sum = Decimal::ZERO;
        let mut charges = Vec::with_capacity(rooms.len());

        for room in rooms {
            let base_rate = self.tariff.base_rate(&room.block);
            let nightly: Vec<NightCharge> = nights
                .iter()
                .map(|(date, kind)| {
                    tally.record(*kind);
                    NightCharge {
                        date: *date,
                        kind: *kind,
                        amount: self.nightly_rate(base_rate, *kind),
                    }
                })
                .collect();
            let total = nightly.iter().map(|night| night.amount).sum();

            base_rate_sum += base_rate;
            charges.push(RoomCharge {
                key: room.key(),
                label: room.key().to_string(),
                base_rate,
                nights: night_count,
                total,
                nightly,
            });
        }

        let subtotal: Decimal = charges.iter().map(|charge| charge.total).sum();
        let gst_pct = self.tariff.gst_pct;
        let gst = subtotal * gst_pct / HUNDRED;

        PriceBreakdown {
            nights: night_count,
            room_nights: night_count * charges.len() as u32,
            rooms: charges,
            tally,
            base_rate_sum,
            subtotal,
            gst_pct,
            gst,
            grand_total: subtotal + gst,
        }
    }
}
