mod amount;
mod cancellation;
mod engine;
mod tariff;

pub use amount::{format_rupees, parse_amount, round_money};
pub use cancellation::{CancellationCharge, CancellationPolicy, CancellationTier};
pub use engine::{NightCharge, NightKind, NightTally, PriceBreakdown, PricingEngine, RoomCharge};
pub use tariff::TariffConfig;
