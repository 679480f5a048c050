use crate::error::{ExtractError, Result};

/// Trailing digit of a memory standard label, `"DDR4"` -> `4`.
pub fn parse_ddr_generation(label: &str) -> Result<u8> {
    label
        .trim()
        .chars()
        .last()
        .and_then(|c| c.to_digit(10))
        .map(|digit| digit as u8)
        .ok_or_else(|| ExtractError::DetailParse {
            field: "memory generation",
            value: label.to_string(),
        })
}

/// Leading integer of a rated speed, `"3200 MHz"` -> `3200`.
pub fn parse_rated_speed(text: &str) -> Result<u32> {
    super::leading_integer(text, "rated memory speed")
}
