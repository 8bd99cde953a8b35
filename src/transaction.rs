//! The normalized transaction record shared by classifiers and encoders.

use crate::money::Money;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One payment event in the canonical, source-agnostic representation.
///
/// Created once by a classifier and never mutated afterwards; encoders
/// borrow it. String fields use the empty string where a source supplied
/// nothing (the decoder's no-match policy), so they are always printable.
///
/// `amount` is signed: positive is a payment received, negative a
/// refund/credit. `None` marks an amount the source failed to supply;
/// encoders render their zero sentinel for it rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    /// Raw reference as supplied by the source (may be a network reference).
    pub reference: String,

    /// Internal 16-character reference, synthesized when the source has none.
    pub internal_reference: String,

    /// Payment service provider reference: source tag + date + sequence.
    pub psp_reference: String,

    /// Originating office code.
    pub office_code: String,

    /// When the record entered the interchange (the run timestamp).
    pub entry_date: NaiveDateTime,

    /// When the payment itself was taken.
    pub transaction_date: NaiveDateTime,

    /// Destination account identifier, check digit included.
    pub account_reference: String,

    /// Municipal revenue stream the payment applies to.
    pub fund_code: String,

    /// Method-of-payment channel code.
    pub mop_code: String,

    /// Amount in currency major units.
    pub amount: Option<Money>,

    pub vat_code: String,

    /// VAT rate as a fraction (0.2 = 20%).
    pub vat_rate: Decimal,

    /// VAT portion of `amount`.
    pub vat_amount: Money,

    /// Free-text narrative composed of labeled sub-fields.
    pub narrative: String,
}

impl NormalizedTransaction {
    /// Net amount with VAT removed, treating a missing amount as zero.
    pub fn net_amount(&self) -> Money {
        self.amount.unwrap_or(Money::ZERO) - self.vat_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn base() -> NormalizedTransaction {
        let date = NaiveDate::from_ymd_opt(2025, 5, 13)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        NormalizedTransaction {
            reference: "521636L".to_string(),
            internal_reference: "ABCDEFGH12345678".to_string(),
            psp_reference: "BLF-250513-1".to_string(),
            office_code: "S".to_string(),
            entry_date: date,
            transaction_date: date,
            account_reference: "521636L".to_string(),
            fund_code: "5".to_string(),
            mop_code: "20".to_string(),
            amount: Some(Money::from_str("1.20").unwrap()),
            vat_code: "3".to_string(),
            vat_rate: Decimal::ZERO,
            vat_amount: Money::ZERO,
            narrative: String::new(),
        }
    }

    #[test]
    fn test_net_amount_subtracts_vat() {
        let mut tx = base();
        tx.vat_amount = Money::from_str("0.20").unwrap();
        assert_eq!(tx.net_amount().to_string(), "1.00");
    }

    #[test]
    fn test_net_amount_treats_missing_amount_as_zero() {
        let mut tx = base();
        tx.amount = None;
        assert_eq!(tx.net_amount(), Money::ZERO);
    }

    #[test]
    fn test_csv_round_trip() {
        let tx = base();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&tx).unwrap();
        let bytes = writer.into_inner().unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let back: NormalizedTransaction = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(back, tx);
    }
}
