//! Field-formatting primitives shared by the export encoders.
//!
//! Every downstream layout is built from the same handful of moves:
//! space fillers, left-anchored clipping, zero- or space-padded numerics
//! and pennies conversion. Keeping them here keeps the per-format modules
//! down to their field tables.

use crate::money::Money;

/// A run of `n` spaces.
pub fn filler(n: usize) -> String {
    " ".repeat(n)
}

/// True when the field is empty or whitespace only.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Clips `s` to `width` characters, right-padding with spaces when shorter.
pub fn clip_or_pad_right(s: &str, width: usize) -> String {
    let trimmed = s.trim();
    let mut out: String = trimmed.chars().take(width).collect();
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

/// Left-pads `s` with `pad` to `width`; `s` is returned unchanged when
/// already wide enough.
pub fn pad_left(s: &str, width: usize, pad: char) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(width);
    for _ in 0..width - len {
        out.push(pad);
    }
    out.push_str(s);
    out
}

/// Renders an amount as unsigned minor units (pennies), left-padded with
/// spaces to `width`.
///
/// `None` renders the zero sentinel (spaces ending in '0'); an amount too
/// large for the conversion renders all nines. Neither case raises: a
/// visibly wrong row beats a lost one.
pub fn minor_units(amount: Option<Money>, width: usize) -> String {
    let Some(amount) = amount else {
        return pad_left("0", width, ' ');
    };

    match amount.to_minor_units() {
        Some(pennies) => pad_left(&pennies.to_string(), width, ' '),
        None => "9".repeat(width),
    }
}

/// Renders an amount with two decimal places, left-padded with zeros to
/// `width`. `None` renders zero at the same width.
pub fn decimal_field(amount: Option<Money>, width: usize) -> String {
    pad_left(&amount.unwrap_or(Money::ZERO).to_string(), width, '0')
}

/// Last character of an account reference (its check digit), or empty when
/// the reference is blank.
pub fn check_digit_suffix(account_reference: &str) -> String {
    account_reference
        .trim()
        .chars()
        .last()
        .map(String::from)
        .unwrap_or_default()
}

/// Builds narratives out of labeled sub-fields, each closed by `"; "`.
#[derive(Debug, Default)]
pub struct Narrative(String);

impl Narrative {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `label:value; `.
    pub fn field(mut self, label: &str, value: &str) -> Self {
        self.0.push_str(label);
        self.0.push(':');
        self.0.push_str(value);
        self.0.push_str("; ");
        self
    }

    /// Appends raw text without the terminator.
    pub fn raw(mut self, text: &str) -> Self {
        self.0.push_str(text);
        self
    }

    pub fn finish(self) -> String {
        self.0
    }
}
