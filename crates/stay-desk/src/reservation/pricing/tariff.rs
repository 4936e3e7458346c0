use super::amount::RawAmount;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Contents of `tariff.json`.
///
/// Every field is optional; a missing or unreadable value prices as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffConfig {
    #[serde(
        default,
        alias = "rates",
        alias = "ratesByBlock",
        deserialize_with = "deserialize_rates"
    )]
    pub rates_by_block: BTreeMap<String, Decimal>,
    #[serde(
        default,
        alias = "default",
        alias = "defaultRate",
        deserialize_with = "deserialize_optional_amount"
    )]
    pub default_rate: Option<Decimal>,
    #[serde(
        default,
        alias = "weekend_pct",
        alias = "weekendSurchargePct",
        deserialize_with = "deserialize_amount"
    )]
    pub weekend_surcharge_pct: Decimal,
    #[serde(
        default,
        alias = "special_pct",
        alias = "specialSurchargePct",
        deserialize_with = "deserialize_amount"
    )]
    pub special_surcharge_pct: Decimal,
    #[serde(
        default,
        alias = "gstPct",
        deserialize_with = "deserialize_amount"
    )]
    pub gst_pct: Decimal,
}

impl TariffConfig {
    /// Nightly base rate of a block, falling back to the default rate.
    pub fn base_rate(&self, block: &str) -> Decimal {
        self.rates_by_block
            .get(block)
            .copied()
            .or(self.default_rate)
            .unwrap_or(Decimal::ZERO)
    }
}

fn deserialize_rates<'de, D>(deserializer: D) -> Result<BTreeMap<String, Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, RawAmount>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(block, amount)| amount.to_decimal().map(|rate| (block.trim().to_string(), rate)))
        .collect())
}

fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(raw.and_then(|amount| amount.to_decimal()))
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_amount(deserializer)?.unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::pricing::parse_amount;
    use rust_decimal_macros::dec;

    #[test]
    fn reads_sheet_style_keys_and_values() {
        let tariff: TariffConfig = serde_json::from_str(
            r#"{
                "rates": {"A": 1000, "B": "₹ 1,250", "C": "call us"},
                "default": 800,
                "weekend_pct": 20,
                "special_pct": "10",
                "gst_pct": 18
            }"#,
        )
        .expect("tariff parses");

        assert_eq!(tariff.base_rate("A"), dec!(1000));
        assert_eq!(tariff.base_rate("B"), dec!(1250));
        assert_eq!(tariff.base_rate("C"), dec!(800));
        assert_eq!(tariff.base_rate("Z"), dec!(800));
        assert_eq!(tariff.weekend_surcharge_pct, dec!(20));
        assert_eq!(tariff.special_surcharge_pct, dec!(10));
        assert_eq!(tariff.gst_pct, dec!(18));
        assert_eq!(parse_amount("₹ 3,500.50"), Some(dec!(3500.50)));
    }

    #[test]
    fn accepts_camel_case_keys() {
        let tariff: TariffConfig = serde_json::from_str(
            r#"{"ratesByBlock": {"A": 900}, "defaultRate": 700, "gstPct": 12.5}"#,
        )
        .expect("tariff parses");
        assert_eq!(tariff.base_rate("A"), dec!(900));
        assert_eq!(tariff.base_rate("B"), dec!(700));
        assert_eq!(tariff.gst_pct, dec!(12.5));
    }

    #[test]
    fn empty_tariff_prices_at_zero() {
        let tariff: TariffConfig = serde_json::from_str("{}").expect("empty tariff parses");
        assert_eq!(tariff.base_rate("A"), Decimal::ZERO);
        assert_eq!(tariff.weekend_surcharge_pct, Decimal::ZERO);
        assert_eq!(tariff.gst_pct, Decimal::ZERO);
    }

    #[test]
    fn null_values_are_treated_as_missing() {
        let tariff: TariffConfig =
            serde_json::from_str(r#"{"rates": null, "default": null, "gst_pct": null}"#)
                .expect("null tariff parses");
        assert_eq!(tariff, TariffConfig::default());
    }
}
