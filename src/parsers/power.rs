use crate::error::Result;

/// Leading integer of a power figure, `"65 W"` -> `65`.
pub fn parse_power_rating(text: &str) -> Result<u32> {
    super::leading_integer(text, "TDP")
}
