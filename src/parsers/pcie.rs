//! Grammar for the "PCI-Express:" value of a CPU detail page.
//!
//! ```text
//! value   := clauses [ "(" fallback ")" ]
//! clauses := clause { ", " clause }
//! ```
//! The generation is the last decimal token of the first clause; the lane
//! count is the first `x<N>` token of the last clause, or its first token
//! when no such token exists. The parenthesised fallback mode is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ExtractError, Result};
use crate::models::PcieLink;

static LANE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[xX]\d+$").expect("Invalid lane token regex"));

pub fn parse_pcie(text: &str) -> Result<PcieLink> {
    let primary = text.split_once('(').map_or(text, |(head, _)| head);
    let clauses: Vec<&str> = primary
        .split(", ")
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .collect();

    let (Some(first), Some(last)) = (clauses.first(), clauses.last()) else {
        return Err(parse_error("PCI-Express", text));
    };

    Ok(PcieLink {
        generation: parse_generation(first)?,
        lanes: parse_lanes(last)?,
    })
}

/// `"Gen 4.0"` -> `4.0`, `"PCIe 4.0 x16"` -> `4.0`.
pub fn parse_generation(clause: &str) -> Result<f32> {
    clause
        .split_whitespace()
        .filter(|token| !LANE_TOKEN.is_match(token))
        .last()
        .map(strip_leading_non_digits)
        .and_then(|token| token.parse::<f32>().ok())
        .ok_or_else(|| parse_error("PCI-Express generation", clause))
}

/// `"x16"` -> `16`, `"24 Lanes"` -> `24`.
pub fn parse_lanes(clause: &str) -> Result<u32> {
    let tokens: Vec<&str> = clause.split_whitespace().collect();
    tokens
        .iter()
        .find(|token| LANE_TOKEN.is_match(token))
        .or_else(|| tokens.first())
        .map(|token| strip_leading_non_digits(token))
        .and_then(|token| token.parse::<u32>().ok())
        .ok_or_else(|| parse_error("PCI-Express lanes", clause))
}

fn strip_leading_non_digits(token: &str) -> &str {
    token.trim_start_matches(|c: char| !c.is_ascii_digit())
}

fn parse_error(field: &'static str, value: &str) -> ExtractError {
    ExtractError::DetailParse {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_parenthesised_fallback() {
        let link = parse_pcie("PCIe 4.0 x16 (x4 3.0)").unwrap();
        assert_eq!(link.generation, 4.0);
        assert_eq!(link.lanes, 16);
    }

    #[test]
    fn comma_separated_generation_and_lane_count() {
        let link = parse_pcie("Gen 4, 24 Lanes (CPU only)").unwrap();
        assert_eq!(link.generation, 4.0);
        assert_eq!(link.lanes, 24);

        let link = parse_pcie("Gen 5.0, x20").unwrap();
        assert_eq!(link.generation, 5.0);
        assert_eq!(link.lanes, 20);
    }

    #[test]
    fn rejects_text_without_numbers() {
        assert!(matches!(
            parse_pcie("N/A"),
            Err(ExtractError::DetailParse { field: "PCI-Express generation", .. })
        ));
        assert!(parse_pcie("(x4 3.0)").is_err());
        assert!(parse_pcie("Gen 4, many Lanes").is_err());
    }
}
