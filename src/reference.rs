//! Decoder for position-encoded payment-network reference strings.
//!
//! The post office payment network packs the fund and account identity of
//! a payment into an opaque reference string. The positional rules here
//! were reverse-engineered from live network data; several branches hinge
//! on single digits with no documented meaning. Preserve them literally
//! and flag any divergence for human review instead of tidying the logic.

use crate::checkdigit::{self, COUNCIL_TAX, HB_OVERPAYMENT_7, HOUSING_RENTS};

/// Fixed prefix every decodable network reference starts with.
pub const NETWORK_PREFIX: &str = "98265029";

/// Business classification extracted from a network reference.
///
/// Both fields default to empty when the decoding rules do not match;
/// an empty classification is the expected no-match outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedClassification {
    pub fund_code: String,
    pub account_reference: String,
}

/// Decodes a raw network reference into fund code and account reference.
///
/// Total over all string inputs: short, garbage or non-matching references
/// yield an empty classification and nothing ever panics.
pub fn decode(raw: &str) -> DecodedClassification {
    let mut decoded = DecodedClassification::default();

    if raw.len() < NETWORK_PREFIX.len() || !raw.starts_with(NETWORK_PREFIX) {
        return decoded;
    }

    // Positional rules index characters, not bytes; references seen in the
    // wild are ASCII but the decoder must not assume it.
    let chars: Vec<char> = raw.chars().collect();

    let pos12 = slice(&chars, 11, 1);
    let pos16 = slice(&chars, 15, 1);
    let pos1617 = slice(&chars, 15, 2);

    decoded.fund_code = fund_code(&pos12, &pos16, &pos1617);

    if chars.len() >= 22 {
        decoded.account_reference = account_reference(&pos12, &chars);
    }

    decoded
}

/// Returns `len` characters starting at `start`, or empty when the
/// reference is too short to hold them.
fn slice(chars: &[char], start: usize, len: usize) -> String {
    if chars.len() >= start + len {
        chars[start..start + len].iter().collect()
    } else {
        String::new()
    }
}

fn fund_code(pos12: &str, pos16: &str, pos1617: &str) -> String {
    const FUND_1_SUFFIXES: [&str; 5] = ["01", "02", "03", "04", "05"];

    if matches!(pos12, "7" | "6") && (pos16 == "6" || pos1617 == "06") {
        "6".to_string()
    } else if pos12 == "7" && FUND_1_SUFFIXES.contains(&pos1617) {
        "1".to_string()
    } else if let Ok(value) = pos12.parse::<u32>() {
        value.to_string()
    } else {
        String::new()
    }
}

fn account_reference(pos12: &str, chars: &[char]) -> String {
    let appended = match pos12 {
        // Council tax and non-domestic rates share the 6-digit scheme.
        "2" | "5" => checkdigit::append(&COUNCIL_TAX, &digits_at(chars, 16, 6)),
        // Sundry debtors share the 7-digit overpayment scheme.
        "6" | "7" => checkdigit::append(&HB_OVERPAYMENT_7, &digits_at(chars, 15, 7)),
        "8" => checkdigit::append(&HOUSING_RENTS, &digits_at(chars, 14, 8)),
        _ => return String::new(),
    };

    // A reference whose digit mask still holds non-digit residue cannot be
    // given a check digit; the no-match policy applies.
    appended.unwrap_or_default()
}

/// Extracts the account digit mask: `len` characters from `start` with any
/// letter replaced by '0'.
fn digits_at(chars: &[char], start: usize, len: usize) -> String {
    chars[start..start + len]
        .iter()
        .map(|&c| if c.is_alphabetic() { '0' } else { c })
        .collect()
}
