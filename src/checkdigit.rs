//! Weighted-modulus check-digit schemes used by the legacy account systems.
//!
//! Each downstream system verifies account identifiers with a single
//! trailing letter computed from a weighted positional checksum. The
//! weights, modulus and digit-to-letter maps below are wire-format
//! constants of those systems and must not be altered.

use crate::error::{InterchangeError, Result};

/// One weighted-modulus check-digit algorithm.
///
/// # Invariants
///
/// - `weights.len() == mask_length`
/// - `subtract_from` is 0 (use the remainder directly) or 11
#[derive(Debug, Clone, Copy)]
pub struct CheckDigitScheme {
    /// Name used in error reports.
    pub name: &'static str,

    /// Required input length in digits.
    pub mask_length: usize,

    /// One weight per input digit, leftmost first.
    pub weights: &'static [u32],

    /// Checksum modulus (10 or 11).
    pub modulus: u32,

    /// Value the remainder is subtracted from; 0 means no subtraction.
    pub subtract_from: u32,

    /// Check value to letter mapping.
    pub letter_map: &'static [(u32, char)],
}

const MOD10_LETTERS: &[(u32, char)] = &[
    (0, 'A'),
    (1, 'C'),
    (2, 'E'),
    (3, 'F'),
    (4, 'H'),
    (5, 'J'),
    (6, 'K'),
    (7, 'L'),
    (8, 'M'),
    (9, 'P'),
];

const MOD11_LETTERS: &[(u32, char)] = &[
    (1, 'A'),
    (2, 'B'),
    (3, 'C'),
    (4, 'D'),
    (5, 'E'),
    (6, 'F'),
    (7, 'G'),
    (8, 'H'),
    (9, 'I'),
    (10, 'J'),
    (11, 'K'),
];

/// Council tax accounts: 6 digits, modulus 10, no subtraction.
pub const COUNCIL_TAX: CheckDigitScheme = CheckDigitScheme {
    name: "council-tax",
    mask_length: 6,
    weights: &[1, 2, 3, 4, 5, 6],
    modulus: 10,
    subtract_from: 0,
    letter_map: MOD10_LETTERS,
};

/// Non-domestic rates accounts share the council tax algorithm.
pub const NON_DOMESTIC_RATES: CheckDigitScheme = CheckDigitScheme {
    name: "non-domestic-rates",
    mask_length: 6,
    weights: &[1, 2, 3, 4, 5, 6],
    modulus: 10,
    subtract_from: 0,
    letter_map: MOD10_LETTERS,
};

/// Fixed penalty notices: 7 digits, modulus 11, subtract from 11.
pub const FIXED_PENALTY_NOTICE: CheckDigitScheme = CheckDigitScheme {
    name: "fixed-penalty-notice",
    mask_length: 7,
    weights: &[8, 7, 6, 5, 4, 3, 2],
    modulus: 11,
    subtract_from: 11,
    letter_map: MOD11_LETTERS,
};

/// Housing benefit overpayments, 7-digit account variant.
pub const HB_OVERPAYMENT_7: CheckDigitScheme = CheckDigitScheme {
    name: "housing-benefit-overpayment-7",
    mask_length: 7,
    weights: &[8, 7, 6, 5, 4, 3, 2],
    modulus: 11,
    subtract_from: 11,
    letter_map: MOD11_LETTERS,
};

/// Housing benefit overpayments, 6-digit account variant.
pub const HB_OVERPAYMENT_6: CheckDigitScheme = CheckDigitScheme {
    name: "housing-benefit-overpayment-6",
    mask_length: 6,
    weights: &[7, 6, 5, 4, 3, 2],
    modulus: 11,
    subtract_from: 11,
    letter_map: MOD11_LETTERS,
};

/// Housing rents accounts: 8 digits, modulus 11, subtract from 11.
pub const HOUSING_RENTS: CheckDigitScheme = CheckDigitScheme {
    name: "housing-rents",
    mask_length: 8,
    weights: &[9, 8, 7, 6, 5, 4, 3, 2],
    modulus: 11,
    subtract_from: 11,
    letter_map: MOD11_LETTERS,
};

/// Computes the check letter for `digits` under `scheme`.
///
/// `digits` must be exactly `scheme.mask_length` ASCII digits; anything
/// else is reported as [`InterchangeError::InvalidCheckDigitInput`] rather
/// than coerced.
pub fn compute(scheme: &CheckDigitScheme, digits: &str) -> Result<char> {
    if digits.len() != scheme.mask_length || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InterchangeError::InvalidCheckDigitInput {
            scheme: scheme.name,
            expected: scheme.mask_length,
            input: digits.to_string(),
        });
    }

    let sum: u32 = digits
        .bytes()
        .zip(scheme.weights)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();

    let remainder = sum % scheme.modulus;
    let check_value = if scheme.subtract_from == 0 {
        remainder
    } else {
        scheme.subtract_from - remainder
    };

    scheme
        .letter_map
        .iter()
        .find(|(v, _)| *v == check_value)
        .map(|(_, c)| *c)
        .ok_or(InterchangeError::CheckDigitRange {
            scheme: scheme.name,
            value: check_value,
        })
}

/// Appends the computed check letter to `digits`.
pub fn append(scheme: &CheckDigitScheme, digits: &str) -> Result<String> {
    let check = compute(scheme, digits)?;
    Ok(format!("{digits}{check}"))
}
