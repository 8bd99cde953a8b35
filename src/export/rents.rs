//! Housing rents cash file: fixed-width rows, amounts in pennies.

use super::RowEncoder;
use crate::fields::{is_blank, minor_units};
use crate::lookup::ExportContext;
use crate::transaction::NormalizedTransaction;

pub struct RentsEncoder;

#[derive(Debug, Clone)]
pub struct RentExportRow {
    pub account_number: String,
    pub sub_account_number: String,
    pub trans_date: String,
    pub method_of_payment: String,
    pub week_number: String,
    pub receipt_number: String,
    pub amount: String,
}

impl RowEncoder for RentsEncoder {
    type Row = RentExportRow;

    fn filter(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool {
        // References from 97000000 to 97999999 belong to the lettings
        // system, not the rents ledger.
        tx.fund_code == "8"
            && !is_blank(&tx.account_reference)
            && !tx.account_reference.starts_with("97")
    }

    fn to_row(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row {
        let account_number = account_number(&tx.account_reference);
        RentExportRow {
            receipt_number: account_number.clone(),
            account_number,
            sub_account_number: "0".to_string(),
            trans_date: tx.transaction_date.format("%d.%m.%Y").to_string(),
            method_of_payment: method_of_payment(&tx.mop_code),
            week_number: "00".to_string(),
            amount: minor_units(tx.amount, 10),
        }
    }

    fn serialize(&self, row: &Self::Row) -> String {
        format!(
            "{}{}{}{}{}{}{}",
            row.account_number,
            row.sub_account_number,
            row.trans_date,
            row.method_of_payment,
            row.week_number,
            row.receipt_number,
            row.amount
        )
    }
}

/// First eight characters of the account reference, zero-padded on the
/// right when shorter.
fn account_number(account_reference: &str) -> String {
    if is_blank(account_reference) {
        return "00000000".to_string();
    }
    let trimmed = account_reference.trim();
    let mut out: String = trimmed.chars().take(8).collect();
    while out.chars().count() < 8 {
        out.push('0');
    }
    out
}

fn method_of_payment(mop_code: &str) -> String {
    if is_blank(mop_code) {
        return "00  ".to_string();
    }
    let code = match mop_code {
        "51" => "SA",
        "46" | "47" => "IP",
        "1" => "KS",
        "5" => "ME",
        "22" => "TC",
        "48" => "CO",
        "4" => "CA",
        "19" => "IB",
        "12" => "PP",
        other => other,
    };
    format!("{code:<4}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupTables;
    use crate::money::Money;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn tx() -> NormalizedTransaction {
        let date = NaiveDate::from_ymd_opt(2025, 5, 13)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        NormalizedTransaction {
            reference: String::new(),
            internal_reference: "ABCDEFGH12345678".to_string(),
            psp_reference: "PYD-250516-1".to_string(),
            office_code: "S".to_string(),
            entry_date: date,
            transaction_date: date,
            account_reference: "90000001E".to_string(),
            fund_code: "8".to_string(),
            mop_code: "51".to_string(),
            amount: Some(Money::from_str("1168.94").unwrap()),
            vat_code: "3".to_string(),
            vat_rate: Decimal::ZERO,
            vat_amount: Money::ZERO,
            narrative: String::new(),
        }
    }

    fn ctx_tables() -> LookupTables {
        LookupTables::default()
    }

    #[test]
    fn test_filter_excludes_lettings_references() {
        let tables = ctx_tables();
        let ctx = ExportContext::new(tx().entry_date, &tables);
        let encoder = RentsEncoder;

        assert!(encoder.filter(&ctx, &tx()));

        let mut lettings = tx();
        lettings.account_reference = "97000023E".to_string();
        assert!(!encoder.filter(&ctx, &lettings));

        let mut blank = tx();
        blank.account_reference = "  ".to_string();
        assert!(!encoder.filter(&ctx, &blank));

        let mut wrong_fund = tx();
        wrong_fund.fund_code = "2".to_string();
        assert!(!encoder.filter(&ctx, &wrong_fund));
    }

    #[test]
    fn test_row_layout() {
        let tables = ctx_tables();
        let ctx = ExportContext::new(tx().entry_date, &tables);
        let encoder = RentsEncoder;

        let line = encoder.serialize(&encoder.to_row(&ctx, &tx()));
        assert_eq!(line, "90000001013.05.2025SA  0090000001    116894");
    }

    #[test]
    fn test_account_number_padding() {
        assert_eq!(account_number("90000001E"), "90000001");
        assert_eq!(account_number("1234"), "12340000");
        assert_eq!(account_number(""), "00000000");
    }

    #[test]
    fn test_method_of_payment_table() {
        assert_eq!(method_of_payment("51"), "SA  ");
        assert_eq!(method_of_payment("46"), "IP  ");
        assert_eq!(method_of_payment("47"), "IP  ");
        assert_eq!(method_of_payment("1"), "KS  ");
        assert_eq!(method_of_payment("19"), "IB  ");
        assert_eq!(method_of_payment("99"), "99  ");
        assert_eq!(method_of_payment(""), "00  ");
    }

    #[test]
    fn test_missing_amount_renders_zero_sentinel() {
        let tables = ctx_tables();
        let ctx = ExportContext::new(tx().entry_date, &tables);
        let mut missing = tx();
        missing.amount = None;

        let row = RentsEncoder.to_row(&ctx, &missing);
        assert_eq!(row.amount, "         0");
    }

    #[test]
    fn test_refund_amount_is_rendered_unsigned() {
        let tables = ctx_tables();
        let ctx = ExportContext::new(tx().entry_date, &tables);
        let mut refund = tx();
        refund.amount = Some(Money::from_str("-12.34").unwrap());

        let row = RentsEncoder.to_row(&ctx, &refund);
        assert_eq!(row.amount, "      1234");
    }
}
