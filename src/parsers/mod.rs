pub mod document;
pub mod memory;
pub mod pcie;
pub mod power;
pub mod socket;

pub use memory::*;
pub use pcie::*;
pub use power::*;
pub use socket::*;

use std::str::FromStr;

use crate::error::{ExtractError, Result};

/// Listing cell text: embedded newlines removed, outer whitespace trimmed.
/// Inner spacing is left as rendered.
pub fn strip_cell_text(text: &str) -> String {
    text.replace(['\n', '\r'], "").trim().to_string()
}

/// First whitespace-delimited token of `text` parsed as an integer; any unit
/// suffix after it is discarded.
pub(crate) fn leading_integer<T: FromStr>(text: &str, field: &'static str) -> Result<T> {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse::<T>().ok())
        .ok_or_else(|| ExtractError::DetailParse {
            field,
            value: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_drops_newlines_only() {
        assert_eq!(strip_cell_text("\n  Ryzen 5\n 3600  \n"), "Ryzen 5 3600");
        assert_eq!(strip_cell_text("6  /  12"), "6  /  12");
    }
}
