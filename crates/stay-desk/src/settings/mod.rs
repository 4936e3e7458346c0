mod rules;

pub use rules::{AdvanceCheck, BookingRules, GuestCategory};

use crate::config::DataConfig;
use crate::reservation::calendar::{DayClassifier, LongWeekends, RestrictedPeriods};
use crate::reservation::pricing::TariffConfig;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, warn};

/// Property configuration assembled from the JSON files under `config/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySettings {
    pub rules: BookingRules,
    pub restricted: RestrictedPeriods,
    pub long_weekends: LongWeekends,
    pub tariff: TariffConfig,
}

impl PropertySettings {
    /// Loads each section on its own; a section that cannot be read or parsed falls back
    /// to its empty default so the desk keeps working with what it has.
    pub fn load(data: &DataConfig) -> Self {
        Self {
            rules: load_section(&data.rules_path()),
            restricted: load_section(&data.restricted_periods_path()),
            long_weekends: load_section(&data.long_weekends_path()),
            tariff: load_section(&data.tariff_path()),
        }
    }

    pub fn day_classifier(&self) -> DayClassifier {
        DayClassifier::new(&self.restricted, &self.long_weekends)
    }
}

fn load_section<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "configuration file unavailable, using defaults");
            return T::default();
        }
    };

    match parse_section(&text) {
        Ok(section) => {
            debug!(path = %path.display(), "configuration loaded");
            section
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "configuration file invalid, using defaults");
            T::default()
        }
    }
}

/// An empty file or a bare `null` counts as an empty section.
fn parse_section<T>(text: &str) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str::<Option<T>>(text)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_and_null_sections_are_defaults() {
        let tariff: TariffConfig = parse_section("  ").expect("blank parses");
        assert_eq!(tariff, TariffConfig::default());
        let periods: RestrictedPeriods = parse_section("null").expect("null parses");
        assert_eq!(periods, RestrictedPeriods::default());
    }

    #[test]
    fn malformed_json_is_an_error_for_the_loader_to_absorb() {
        assert!(parse_section::<TariffConfig>("{\"rates\": ").is_err());
    }

    #[test]
    fn missing_directory_loads_defaults() {
        let settings = PropertySettings::load(&DataConfig::new("./no-such-data-dir"));
        assert_eq!(settings, PropertySettings::default());
        assert!(settings.day_classifier().special_dates().is_empty());
    }

    #[test]
    fn sections_parse_independently() {
        let tariff: TariffConfig =
            parse_section(r#"{"rates": {"A": 1000}, "gst_pct": 18}"#).expect("tariff parses");
        assert_eq!(tariff.gst_pct, dec!(18));
    }
}
