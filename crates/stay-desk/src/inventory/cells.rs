/// Sheet checkboxes: `yes`, `y`, `true`, `1`, `x` (any case) are ticked.
pub(crate) fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "x"
    )
}

/// Leading integer of a capacity cell such as `2` or `2 persons`, at least one.
/// A cell that does not start with a digit gives `default`.
pub(crate) fn occupant_count(value: Option<&str>, default: u8) -> u8 {
    let Some(value) = value else {
        return default;
    };
    let digits: String = value
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<u64>() {
        Ok(count) => count.clamp(1, u8::MAX as u64) as u8,
        Err(_) => default,
    }
}
