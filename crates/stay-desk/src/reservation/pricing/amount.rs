use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::Deserialize;

/// A money or percentage value as it appears in hand-edited JSON.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAmount {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl RawAmount {
    pub(crate) fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawAmount::Number(number) => {
                let text = number.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .ok()
            }
            RawAmount::Text(text) => parse_amount(text),
            RawAmount::Other(_) => None,
        }
    }
}

/// Extracts the first number from text such as `"₹ 3,500"` or `"1200/night"`.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|ch| !matches!(ch, ',' | '₹') && !ch.is_whitespace())
        .collect();

    let start = cleaned.find(|ch: char| ch.is_ascii_digit())?;
    let negative = cleaned[..start].ends_with('-');

    let mut end = start;
    let mut seen_point = false;
    for (offset, ch) in cleaned[start..].char_indices() {
        match ch {
            '0'..='9' => end = start + offset + 1,
            '.' if !seen_point => seen_point = true,
            _ => break,
        }
    }

    let digits = &cleaned[start..end];
    let value = Decimal::from_str(digits).ok()?;
    Some(if negative { -value } else { value })
}

/// Banker's rounding, for display only.
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Whole-rupee rendering used on the summary card.
pub fn format_rupees(amount: Decimal) -> String {
    format!("₹{}", round_money(amount, 0))
}
