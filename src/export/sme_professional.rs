//! Lettings (SME Professional) export: comma-delimited rows.

use super::RowEncoder;
use crate::fields::is_blank;
use crate::lookup::ExportContext;
use crate::money::Money;
use crate::transaction::NormalizedTransaction;

pub struct SmeProfessionalEncoder;

#[derive(Debug, Clone)]
pub struct SmeProfessionalRow {
    pub account_number: String,
    pub trans_date: String,
    pub amount: String,
}

impl RowEncoder for SmeProfessionalEncoder {
    type Row = SmeProfessionalRow;

    fn filter(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> bool {
        // References from 97000000 to 97999999 are the lettings range of
        // the rents fund.
        tx.fund_code == "8"
            && !is_blank(&tx.account_reference)
            && tx.account_reference.starts_with("97")
    }

    fn to_row(&self, _ctx: &ExportContext<'_>, tx: &NormalizedTransaction) -> Self::Row {
        SmeProfessionalRow {
            account_number: if is_blank(&tx.account_reference) {
                "000000000".to_string()
            } else {
                tx.account_reference.trim().to_string()
            },
            trans_date: tx.transaction_date.format("%d-%b-%y").to_string(),
            amount: tx.amount.unwrap_or(Money::ZERO).to_string(),
        }
    }

    fn serialize(&self, row: &Self::Row) -> String {
        format!(
            "{},{},1,GBP,{}",
            row.trans_date, row.amount, row.account_number
        )
    }
}
