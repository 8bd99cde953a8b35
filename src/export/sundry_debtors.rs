//! Sundry debtors export: comma-delimited rows with both the export date
//! and the transaction date.

use super::RowEncoder;
use crate::lookup::ExportContext;
use crate::money::Money;
use crate::transaction::NormalizedTransaction;

pub struct SundryDebtorsEncoder;

#[derive(Debug, Clone)]
pub struct SundryDebtorRow {
    pub icm_ref: String,
    pub method_of_payment: String,
    pub export_date: String,
    pub account_ref_1: String,
    pub trans_date: String,
    pub filler: String,
    pub amount: String,
    pub account_ref_2: String,
    pub transaction_date: String,
}

impl RowEncoder for SundryDebtorsEncoder {
    type Row = SundryDebtorRow;

    fn filter(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool {
        tx.fund_code == "7"
    }

    fn to_row(&self, ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row {
        let account = tx.account_reference.trim().to_string();
        SundryDebtorRow {
            icm_ref: tx.psp_reference.trim().to_string(),
            method_of_payment: tx.mop_code.clone(),
            export_date: ctx.run.format("%d/%m/%Y").to_string(),
            account_ref_1: account.clone(),
            // dd MMM yy plus the literal trailing space the receiver expects
            trans_date: tx.transaction_date.format("%d %b %y ").to_string(),
            filler: " ".to_string(),
            amount: tx.amount.unwrap_or(Money::ZERO).to_string(),
            account_ref_2: account,
            transaction_date: tx.transaction_date.format("%d/%m/%Y").to_string(),
        }
    }

    fn serialize(&self, row: &Self::Row) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{}",
            row.icm_ref,
            row.method_of_payment,
            row.export_date,
            row.account_ref_1,
            row.trans_date,
            row.filler,
            row.amount,
            row.account_ref_2,
            row.transaction_date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupTables;
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
            psp_reference: "PIP-20250516-7".to_string(),
            office_code: "S".to_string(),
            entry_date: date,
            transaction_date: date,
            account_reference: "0635157C".to_string(),
            fund_code: "7".to_string(),
            mop_code: "12".to_string(),
            amount: Some(Money::from_str("75.50").unwrap()),
            vat_code: "3".to_string(),
            vat_rate: Decimal::ZERO,
            vat_amount: Money::ZERO,
            narrative: String::new(),
        }
    }

    #[test]
    fn test_filter_is_fund_seven() {
        let tables = LookupTables::default();
        let ctx = ExportContext::new(tx().entry_date, &tables);
        assert!(SundryDebtorsEncoder.filter(&ctx, &tx()));

        let mut other = tx();
        other.fund_code = "6".to_string();
        assert!(!SundryDebtorsEncoder.filter(&ctx, &other));
    }

    #[test]
    fn test_row_layout() {
        let tables = LookupTables::default();
        let run = NaiveDate::from_ymd_opt(2025, 5, 16)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let ctx = ExportContext::new(run, &tables);
        let encoder = SundryDebtorsEncoder;

        let line = encoder.serialize(&encoder.to_row(&ctx, &tx()));
        assert_eq!(
            line,
            "PIP-20250516-7,12,16/05/2025,0635157C,13 May 25 , ,75.50,0635157C,13/05/2025"
        );
    }
}
